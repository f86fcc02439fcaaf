//! Layout engine: maps a half-relative `(round, match_index)` coordinate to
//! a grid cell, mirrored for the right half and centered for the final.
//!
//! Column order left → right:
//! `R32 | R16 | QF | SF | Finalist | FINAL | Finalist | SF | QF | R16 | R32`
//!
//! Rows use the binary-tree formula `logical_row = 1 + i * 2^(r+1) + 2^r`,
//! which centers every parent exactly between its two children.

use crate::{ROUND_SIZES, Side};

/// Round columns in one half.
pub const HALF_COLS: u16 = 5;
/// The single center column holding the final.
pub const FINAL_COLS: u16 = 1;
/// Full grid width in columns (1-based, like a CSS grid).
pub const TOTAL_COLS: u16 = HALF_COLS * 2 + FINAL_COLS;

/// Logical row of the final cell — the round-4 row of either half
/// (`1 + 0 * 32 + 16`).
const FINAL_LOGICAL_ROW: u16 = 17;

// ---------------------------------------------------------------------------
// Rendering parameters
// ---------------------------------------------------------------------------

/// Knobs that place the grid on a concrete surface. They shift and scale
/// absolute positions but never affect relative correctness — the centering
/// invariant holds for any values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    /// Width of one match cell.
    pub col_width: f32,
    /// Height of one grid row.
    pub row_height: f32,
    /// Grid rows spanned by one match cell.
    pub match_row_span: u16,
    /// Horizontal gap between adjacent columns.
    pub h_gap: f32,
    /// Grid rows reserved above the tree for round headers.
    pub header_rows: u16,
    /// Grid rows per logical row.
    pub row_step: u16,
    /// Connector bend point as a fraction of the horizontal gap.
    pub bend_fraction: f32,
    /// Minimum bend offset, so adjacent columns never produce a
    /// zero-length leading segment.
    pub min_bend: f32,
}

impl Default for LayoutParams {
    fn default() -> Self {
        Self {
            col_width: 112.0,
            row_height: 18.0,
            match_row_span: 2,
            h_gap: 16.0,
            header_rows: 8,
            row_step: 2,
            bend_fraction: 0.35,
            min_bend: 8.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Grid placement
// ---------------------------------------------------------------------------

/// A match cell's position on the grid (1-based column and row starts).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub col: u16,
    pub row: u16,
}

/// Row of `(round, match_index)` in tree units, before header reserve and
/// row scaling. Parents sit at the mean of their children by construction:
/// `stride = 2^(r+1)`, `offset = 2^r`.
pub fn logical_row(round: usize, match_index: usize) -> u16 {
    let stride = 1usize << (round + 1);
    let offset = 1usize << round;
    (1 + match_index * stride + offset) as u16
}

/// Grid cell for a match within a half. The left half grows rightward from
/// column 1; the right half mirrors, growing leftward from the last column.
pub fn grid_placement(
    side: Side,
    round: usize,
    match_index: usize,
    params: &LayoutParams,
) -> GridCell {
    let row = params.header_rows + logical_row(round, match_index) * params.row_step;
    let col = match side {
        Side::Left => 1 + round as u16,
        Side::Right => TOTAL_COLS - round as u16,
    };
    GridCell { col, row }
}

/// Grid cell for the center final: finalists' row, middle column.
pub fn grid_placement_final(params: &LayoutParams) -> GridCell {
    GridCell {
        col: HALF_COLS + 1,
        row: params.header_rows + FINAL_LOGICAL_ROW * params.row_step,
    }
}

// ---------------------------------------------------------------------------
// Pixel rectangles
// ---------------------------------------------------------------------------

/// Pixel-space edges and centers of a match cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellPx {
    pub x_left: f32,
    pub x_right: f32,
    pub x_center: f32,
    pub y_top: f32,
    pub y_center: f32,
}

pub fn cell_px(cell: GridCell, params: &LayoutParams) -> CellPx {
    let x_left = f32::from(cell.col - 1) * (params.col_width + params.h_gap);
    let y_top = f32::from(cell.row - 1) * params.row_height;
    let height = f32::from(params.match_row_span) * params.row_height;
    CellPx {
        x_left,
        x_right: x_left + params.col_width,
        x_center: x_left + params.col_width / 2.0,
        y_top,
        y_center: y_top + height / 2.0,
    }
}

// ---------------------------------------------------------------------------
// HalfGrid — precomputed cells for one half
// ---------------------------------------------------------------------------

/// All 31 match cells of one half in round-major order: 16 + 8 + 4 + 2 + 1.
/// Compute once, index per frame.
#[derive(Debug, Clone)]
pub struct HalfGrid {
    pub side: Side,
    cells: Vec<GridCell>,
}

impl HalfGrid {
    pub fn compute(side: Side, params: &LayoutParams) -> Self {
        let mut cells = Vec::with_capacity(31);
        for (round, &count) in ROUND_SIZES.iter().enumerate() {
            for i in 0..count {
                cells.push(grid_placement(side, round, i, params));
            }
        }
        Self { side, cells }
    }

    /// Cells for one round (0 = leaves .. 4 = half-final).
    pub fn cells_for_round(&self, round: usize) -> &[GridCell] {
        const OFFSETS: [usize; 6] = [0, 16, 24, 28, 30, 31];
        &self.cells[OFFSETS[round]..OFFSETS[round + 1]]
    }

    pub fn cell(&self, round: usize, match_index: usize) -> GridCell {
        self.cells_for_round(round)[match_index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ROUNDS_PER_HALF;

    #[test]
    fn test_leaf_round_logical_rows() {
        let rows: Vec<u16> = (0..16).map(|i| logical_row(0, i)).collect();
        let expected: Vec<u16> = (0..16).map(|i| 2 * i + 2).collect();
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_parent_row_is_mean_of_children() {
        // The centering invariant, for every interior edge of the tree.
        for r in 0..ROUNDS_PER_HALF - 1 {
            for i in 0..ROUND_SIZES[r + 1] {
                let top = logical_row(r, 2 * i);
                let bottom = logical_row(r, 2 * i + 1);
                let parent = logical_row(r + 1, i);
                assert_eq!(
                    u32::from(parent) * 2,
                    u32::from(top) + u32::from(bottom),
                    "round {r} parent {i} not centered between {top} and {bottom}"
                );
            }
        }
    }

    #[test]
    fn test_rows_within_a_round_do_not_overlap() {
        for r in 0..ROUNDS_PER_HALF {
            let rows: Vec<u16> = (0..ROUND_SIZES[r]).map(|i| logical_row(r, i)).collect();
            let stride = 1u16 << (r + 1);
            for pair in rows.windows(2) {
                assert_eq!(pair[1] - pair[0], stride);
            }
        }
    }

    #[test]
    fn test_left_half_columns_increase_toward_center() {
        let params = LayoutParams::default();
        let cols: Vec<u16> = (0..ROUNDS_PER_HALF)
            .map(|r| grid_placement(Side::Left, r, 0, &params).col)
            .collect();
        assert_eq!(cols, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_right_half_mirrors_left() {
        let params = LayoutParams::default();
        for r in 0..ROUNDS_PER_HALF {
            for i in 0..ROUND_SIZES[r] {
                let left = grid_placement(Side::Left, r, i, &params);
                let right = grid_placement(Side::Right, r, i, &params);
                assert_eq!(left.col + right.col, TOTAL_COLS + 1);
                assert_eq!(left.row, right.row);
            }
        }
    }

    #[test]
    fn test_final_sits_on_the_finalist_row_centered() {
        let params = LayoutParams::default();
        let finale = grid_placement_final(&params);
        let left_finalist = grid_placement(Side::Left, 4, 0, &params);
        let right_finalist = grid_placement(Side::Right, 4, 0, &params);
        assert_eq!(finale.row, left_finalist.row);
        assert_eq!(finale.row, right_finalist.row);
        assert_eq!(finale.col, 6);
        assert_eq!(right_finalist.col - finale.col, finale.col - left_finalist.col);
    }

    #[test]
    fn test_header_reserve_and_row_step_only_shift_and_scale() {
        let a = LayoutParams { header_rows: 0, row_step: 1, ..LayoutParams::default() };
        let b = LayoutParams { header_rows: 8, row_step: 2, ..LayoutParams::default() };
        for i in 0..ROUND_SIZES[0] {
            let ra = grid_placement(Side::Left, 0, i, &a).row;
            let rb = grid_placement(Side::Left, 0, i, &b).row;
            assert_eq!(rb, 8 + ra * 2);
        }
    }

    #[test]
    fn test_cell_px_matches_grid_arithmetic() {
        let params = LayoutParams::default();
        let px = cell_px(GridCell { col: 3, row: 10 }, &params);
        assert_eq!(px.x_left, 2.0 * (112.0 + 16.0));
        assert_eq!(px.x_right, px.x_left + 112.0);
        assert_eq!(px.x_center, px.x_left + 56.0);
        assert_eq!(px.y_top, 9.0 * 18.0);
        assert_eq!(px.y_center, px.y_top + 18.0);
    }

    #[test]
    fn test_half_grid_round_slices() {
        let params = LayoutParams::default();
        let grid = HalfGrid::compute(Side::Left, &params);
        let sizes: Vec<usize> = (0..ROUNDS_PER_HALF)
            .map(|r| grid.cells_for_round(r).len())
            .collect();
        assert_eq!(sizes, vec![16, 8, 4, 2, 1]);
        assert_eq!(grid.cell(2, 1), grid_placement(Side::Left, 2, 1, &params));
    }
}
