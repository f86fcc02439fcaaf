//! Connector router: orthogonal elbow paths from each match cell to the
//! cell of the match it feeds. Consumes round shapes and layout rectangles
//! only — never match content.

use crate::layout::{LayoutParams, cell_px, grid_placement, grid_placement_final};
use crate::{Half, ROUNDS_PER_HALF, Side};

/// One orthogonal connector: a horizontal leg from the source edge to
/// `x_bend`, a vertical leg to the destination row, and a horizontal leg
/// into the destination edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectorPath {
    pub x1: f32,
    pub y1: f32,
    pub x_bend: f32,
    pub x2: f32,
    pub y2: f32,
}

impl ConnectorPath {
    /// The polyline corner points, in drawing order.
    pub fn points(&self) -> [(f32, f32); 4] {
        [
            (self.x1, self.y1),
            (self.x_bend, self.y1),
            (self.x_bend, self.y2),
            (self.x2, self.y2),
        ]
    }

    /// SVG path data (`M x1 y1 H x_bend V y2 H x2`).
    pub fn svg_path(&self) -> String {
        format!(
            "M {} {} H {} V {} H {}",
            self.x1, self.y1, self.x_bend, self.y2, self.x2
        )
    }
}

/// Bend-point rule: a fraction of the horizontal gap out from the source,
/// floored at `min_bend`. The left half routes rightward off `x_right`,
/// the right half mirrors, routing leftward off `x_left`.
fn elbow(
    src: crate::CellPx,
    dst: crate::CellPx,
    side: Side,
    params: &LayoutParams,
) -> ConnectorPath {
    match side {
        Side::Left => {
            let (x1, x2) = (src.x_right, dst.x_left);
            let x_bend = x1 + params.min_bend.max((x2 - x1) * params.bend_fraction);
            ConnectorPath { x1, y1: src.y_center, x_bend, x2, y2: dst.y_center }
        }
        Side::Right => {
            let (x1, x2) = (src.x_left, dst.x_right);
            let x_bend = x1 - params.min_bend.max((x1 - x2) * params.bend_fraction);
            ConnectorPath { x1, y1: src.y_center, x_bend, x2, y2: dst.y_center }
        }
    }
}

/// Connectors for every non-terminal match of one half: round r match i
/// feeds round r+1 match i/2.
pub fn route_half(half: &Half, side: Side, params: &LayoutParams) -> Vec<ConnectorPath> {
    let mut paths = Vec::new();
    for r in 0..half.rounds.len().saturating_sub(1) {
        for i in 0..half.rounds[r].matches.len() {
            let src = cell_px(grid_placement(side, r, i, params), params);
            let dst = cell_px(grid_placement(side, r + 1, i / 2, params), params);
            paths.push(elbow(src, dst, side, params));
        }
    }
    paths
}

/// The fixed connector joining a half's finalist cell to the center final.
pub fn route_final(side: Side, params: &LayoutParams) -> ConnectorPath {
    let src = cell_px(grid_placement(side, ROUNDS_PER_HALF - 1, 0, params), params);
    let dst = cell_px(grid_placement_final(params), params);
    elbow(src, dst, side, params)
}

/// All connectors for the full diagram: both halves' interior edges plus
/// the two finalist→final joins, in deterministic order (left half, right
/// half, left final, right final).
pub fn route_connectors(left: &Half, right: &Half, params: &LayoutParams) -> Vec<ConnectorPath> {
    let mut paths = route_half(left, Side::Left, params);
    paths.extend(route_half(right, Side::Right, params));
    paths.push(route_final(Side::Left, params));
    paths.push(route_final(Side::Right, params));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::BracketState;

    #[test]
    fn test_connector_counts() {
        let params = LayoutParams::default();
        let state = BracketState::empty();
        let half = route_half(&state.left, Side::Left, &params);
        assert_eq!(half.len(), 16 + 8 + 4 + 2);
        let all = route_connectors(&state.left, &state.right, &params);
        assert_eq!(all.len(), 30 + 30 + 2);
    }

    #[test]
    fn test_paths_are_h_v_h() {
        let params = LayoutParams::default();
        let state = BracketState::empty();
        for path in route_connectors(&state.left, &state.right, &params) {
            let [a, b, c, d] = path.points();
            assert_eq!(a.1, b.1, "leading segment must be horizontal");
            assert_eq!(b.0, c.0, "middle segment must be vertical");
            assert_eq!(c.1, d.1, "trailing segment must be horizontal");
        }
    }

    #[test]
    fn test_left_connectors_leave_trailing_edge_rightward() {
        let params = LayoutParams::default();
        let state = BracketState::empty();
        for path in route_half(&state.left, Side::Left, &params) {
            assert!(path.x_bend > path.x1);
            assert!(path.x2 > path.x_bend);
        }
    }

    #[test]
    fn test_right_connectors_mirror_leftward() {
        let params = LayoutParams::default();
        let state = BracketState::empty();
        for path in route_half(&state.right, Side::Right, &params) {
            assert!(path.x_bend < path.x1);
            assert!(path.x2 < path.x_bend);
        }
    }

    #[test]
    fn test_bend_uses_gap_fraction_when_large_enough() {
        let params = LayoutParams::default();
        let state = BracketState::empty();
        let paths = route_half(&state.left, Side::Left, &params);
        // Gap is one h_gap (adjacent columns): 16 px. 35% of that is under
        // the 8 px floor, so the floor wins.
        assert_eq!(paths[0].x2 - paths[0].x1, params.h_gap);
        assert_eq!(paths[0].x_bend - paths[0].x1, params.min_bend);

        // With a wide gap the fraction wins.
        let wide = LayoutParams { h_gap: 100.0, ..params };
        let paths = route_half(&state.left, Side::Left, &wide);
        assert_eq!(
            paths[0].x_bend - paths[0].x1,
            (paths[0].x2 - paths[0].x1) * wide.bend_fraction
        );
    }

    #[test]
    fn test_sibling_pair_converges_on_parent_row() {
        let params = LayoutParams::default();
        let state = BracketState::empty();
        let paths = route_half(&state.left, Side::Left, &params);
        // Matches 0 and 1 of round 0 both feed round-1 match 0.
        assert_eq!(paths[0].y2, paths[1].y2);
        assert!(paths[0].y1 < paths[0].y2);
        assert!(paths[1].y1 > paths[1].y2);
    }

    #[test]
    fn test_final_connectors_meet_the_center_cell() {
        let params = LayoutParams::default();
        let finale = cell_px(grid_placement_final(&params), &params);
        let left = route_final(Side::Left, &params);
        let right = route_final(Side::Right, &params);
        assert_eq!(left.x2, finale.x_left);
        assert_eq!(right.x2, finale.x_right);
        assert_eq!(left.y2, finale.y_center);
        assert_eq!(left.y1, left.y2, "finalist and final share a row");
    }

    #[test]
    fn test_svg_path_shape() {
        let path = ConnectorPath { x1: 0.0, y1: 1.0, x_bend: 8.0, x2: 16.0, y2: 5.0 };
        assert_eq!(path.svg_path(), "M 0 1 H 8 V 5 H 16");
    }
}
