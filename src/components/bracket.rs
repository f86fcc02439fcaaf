use torneo_bracket::{
    BracketState, CellPx, Entrant, HalfGrid, LayoutParams, Side, Stage,
    cell_px, grid_placement, grid_placement_final,
    layout::TOTAL_COLS,
    route_connectors,
};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

use crate::components::banner_frames::{BannerColor, BannerTheme, resolve};

// ---------------------------------------------------------------------------
// Layout constants (terminal units)
// ---------------------------------------------------------------------------

/// Rows per match cell: slot1 line, slot2 line.
pub const MATCH_HEIGHT: u16 = 2;

/// Connector zone width between adjacent columns.
pub const GAP_WIDTH: u16 = 3;

/// Maximum match cell width in wider terminals.
const CELL_W_FULL: u16 = 18;

/// Terminal rows reserved above the tree for the round header line.
const HEADER_ROWS: u16 = 2;

/// Core layout parameters in terminal units: one grid row per terminal row,
/// one logical row per grid row. The default pixel values only make sense
/// for canvas surfaces; a cell here is `cell_width` columns by 2 rows.
pub fn terminal_params(terminal_width: u16) -> LayoutParams {
    let gap_total = GAP_WIDTH * (TOTAL_COLS - 1);
    let per_col = terminal_width.saturating_sub(gap_total) / TOTAL_COLS;
    let cell_width = per_col.clamp(6, CELL_W_FULL);
    LayoutParams {
        col_width: f32::from(cell_width),
        row_height: 1.0,
        match_row_span: MATCH_HEIGHT,
        h_gap: f32::from(GAP_WIDTH),
        header_rows: HEADER_ROWS,
        row_step: 1,
        bend_fraction: 0.35,
        min_bend: 1.0,
    }
}

/// Total diagram height in terminal rows: header reserve + the deepest leaf
/// cell (logical row 32) + its second line.
pub fn diagram_height(params: &LayoutParams) -> u16 {
    params.header_rows + 32 * params.row_step + MATCH_HEIGHT
}

/// Adjust a scroll offset so the selected cell stays fully visible.
pub fn scroll_for_selection(cell_top: u16, viewport_height: u16, current: u16) -> u16 {
    if viewport_height <= MATCH_HEIGHT {
        return cell_top;
    }
    if cell_top < current {
        cell_top
    } else if cell_top + MATCH_HEIGHT > current + viewport_height {
        cell_top + MATCH_HEIGHT - viewport_height
    } else {
        current
    }
}

// ---------------------------------------------------------------------------
// BracketView widget
// ---------------------------------------------------------------------------

/// Renders the full split bracket: both halves, the center final, and the
/// routed connectors. Geometry comes entirely from the core layout engine;
/// this widget only rasterizes it.
pub struct BracketView<'a> {
    pub state: &'a BracketState,
    pub selected_side: Side,
    pub selected_stage: Stage,
    pub selected_match: usize,
    /// Vertical scroll offset in terminal rows (the diagram is taller than
    /// most terminals).
    pub scroll_offset: u16,
    pub theme: BannerTheme,
}

impl<'a> Widget for BracketView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 30 || area.height < MATCH_HEIGHT + HEADER_ROWS {
            return;
        }

        let params = terminal_params(area.width);

        // Pass 1: connectors, so cells draw over their endpoints.
        for path in route_connectors(&self.state.left, &self.state.right, &params) {
            draw_connector_path(&path, area, self.scroll_offset, self.theme, buf);
        }

        // Pass 2: round headers.
        self.draw_headers(&params, area, buf);

        // Pass 3: match cells, positioned from the precomputed half grids.
        for side in [Side::Left, Side::Right] {
            let grid = HalfGrid::compute(side, &params);
            for (round, round_data) in self.state.half(side).rounds.iter().enumerate() {
                for (i, m) in round_data.matches.iter().enumerate() {
                    let selected = side == self.selected_side
                        && round == self.selected_stage.index()
                        && i == self.selected_match;
                    let px = cell_px(grid.cell(round, i), &params);
                    self.draw_match_cell(side, round, i, m, selected, px, &params, area, buf);
                }
            }
        }

        // Pass 4: the center final.
        self.draw_final_cell(&params, area, buf);
    }
}

impl<'a> BracketView<'a> {
    fn draw_headers(&self, params: &LayoutParams, area: Rect, buf: &mut Buffer) {
        let accent = resolve(BannerColor::Accent, self.theme);
        let dim = resolve(BannerColor::Dim, self.theme);
        let Some(y) = screen_y(0, self.scroll_offset, area) else {
            return;
        };

        for stage in Stage::ALL {
            let round = stage.index();
            for side in [Side::Left, Side::Right] {
                let cell = grid_placement(side, round, 0, params);
                let px = cell_px(cell, params);
                let style = if side == self.selected_side && stage == self.selected_stage {
                    accent
                } else {
                    dim
                };
                put_clipped(buf, area, area.x + px.x_left as u16, y, stage.label(), style);
            }
        }

        let finale = cell_px(grid_placement_final(params), params);
        put_clipped(buf, area, area.x + finale.x_left as u16, y, "Final", dim);
    }

    fn draw_match_cell(
        &self,
        side: Side,
        round: usize,
        match_index: usize,
        m: &torneo_bracket::Match,
        selected: bool,
        px: CellPx,
        params: &LayoutParams,
        area: Rect,
        buf: &mut Buffer,
    ) {
        let x = area.x + px.x_left as u16;
        let width = params.col_width as usize;

        let base_style = if selected {
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        let winner_style = resolve(BannerColor::Winner, self.theme);

        for (line, slot) in [(0u16, 0u8), (1, 1)] {
            let Some(y) = screen_y(px.y_top as u16 + line, self.scroll_offset, area) else {
                continue;
            };
            let entrant = m.slot(slot);
            let style = if entrant.is_some_and(|e| self.slot_advanced(side, round, match_index, e))
            {
                winner_style.add_modifier(Modifier::BOLD)
            } else {
                base_style
            };
            put_clipped(buf, area, x, y, &format_slot_line(entrant, width), style);
        }
    }

    /// True when this slot's entrant also occupies the downstream slot this
    /// match feeds — i.e. the recorded winner.
    fn slot_advanced(&self, side: Side, round: usize, match_index: usize, e: &Entrant) -> bool {
        if let Some(parent) = self.state.match_at(side, round + 1, match_index / 2) {
            let target = if match_index % 2 == 0 { &parent.slot1 } else { &parent.slot2 };
            return target.as_ref() == Some(e);
        }
        // Round 4 feeds the center final.
        self.state.final_match.finalist(side) == Some(e)
    }

    fn draw_final_cell(&self, params: &LayoutParams, area: Rect, buf: &mut Buffer) {
        let px = cell_px(grid_placement_final(params), params);
        let x = area.x + px.x_left as u16;
        let top = px.y_top as u16;
        let width = params.col_width as usize;

        let accent = resolve(BannerColor::Accent, self.theme);
        let winner_style = resolve(BannerColor::Winner, self.theme).add_modifier(Modifier::BOLD);
        let base = Style::default().fg(Color::Gray);

        let finale = &self.state.final_match;
        if let Some(y) = screen_y(top.saturating_sub(1), self.scroll_offset, area) {
            put_clipped(buf, area, x, y, &center_text("FINAL", width), accent);
        }
        for (line, entrant) in [(0u16, finale.left.as_ref()), (1, finale.right.as_ref())] {
            if let Some(y) = screen_y(top + line, self.scroll_offset, area) {
                let style = if entrant.is_some() && entrant == finale.winner.as_ref() {
                    winner_style
                } else {
                    base
                };
                put_clipped(buf, area, x, y, &format_slot_line(entrant, width), style);
            }
        }
        if let Some(winner) = finale.winner.as_ref()
            && let Some(y) = screen_y(top + 2, self.scroll_offset, area)
        {
            let crown = format!("* {}", winner.name);
            put_clipped(buf, area, x, y, &center_text(&crown, width), winner_style);
        }
    }
}

// ---------------------------------------------------------------------------
// Shared drawing helpers
// ---------------------------------------------------------------------------

/// Convert a diagram-relative row to an absolute screen y, applying scroll +
/// area bounds. Returns `None` if the row is off-screen.
fn screen_y(diagram_row: u16, scroll: u16, area: Rect) -> Option<u16> {
    if diagram_row < scroll {
        return None;
    }
    let rel = diagram_row - scroll;
    if rel >= area.height {
        return None;
    }
    Some(area.y + rel)
}

fn put_char(buf: &mut Buffer, x: u16, y: u16, ch: char, style: Style) {
    if let Some(cell) = buf.cell_mut((x, y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

fn put_clipped(buf: &mut Buffer, area: Rect, x: u16, y: u16, text: &str, style: Style) {
    if x >= area.x + area.width {
        return;
    }
    let avail = (area.x + area.width - x) as usize;
    let clipped: String = text.chars().take(avail).collect();
    buf.set_string(x, y, clipped, style);
}

/// `"name      "` padded/truncated to the cell width; absent slots read TBD.
fn format_slot_line(entrant: Option<&Entrant>, width: usize) -> String {
    let name = entrant.map(|e| e.name.as_str()).unwrap_or("TBD");
    let trunc: String = name.chars().take(width).collect();
    format!("{trunc:<width$}")
}

fn center_text(text: &str, width: usize) -> String {
    let len = text.chars().count().min(width);
    let pad = (width - len) / 2;
    let trunc: String = text.chars().take(width).collect();
    format!("{:pad$}{trunc}", "")
}

/// Corner glyph for an elbow bend: which way the horizontal arm points and
/// which way the vertical arm leaves.
fn corner_char(arm_left: bool, arm_down: bool) -> char {
    match (arm_left, arm_down) {
        (true, true) => '┐',
        (true, false) => '┘',
        (false, true) => '┌',
        (false, false) => '└',
    }
}

/// Rasterize one routed H-V-H path with box-drawing characters.
fn draw_connector_path(
    path: &torneo_bracket::ConnectorPath,
    area: Rect,
    scroll: u16,
    theme: BannerTheme,
    buf: &mut Buffer,
) {
    let style = resolve(BannerColor::Dim, theme);
    let x1 = path.x1.round() as u16;
    let xb = path.x_bend.round() as u16;
    let x2 = path.x2.round() as u16;
    let y1 = path.y1.round() as u16;
    let y2 = path.y2.round() as u16;
    let limit_x = area.x + area.width;

    let mut put = |x: u16, row: u16, ch: char| {
        let sx = area.x + x;
        if sx < limit_x
            && let Some(sy) = screen_y(row, scroll, area)
        {
            put_char(buf, sx, sy, ch, style);
        }
    };

    if y1 == y2 {
        // Finalist → final joins sit on one row: a straight run.
        for x in x1.min(x2)..=x1.max(x2) {
            put(x, y1, '─');
        }
        return;
    }

    // Leading horizontal leg at y1, excluding the bend column.
    for x in x1.min(xb)..=x1.max(xb) {
        if x != xb {
            put(x, y1, '─');
        }
    }
    // Trailing horizontal leg at y2, excluding the bend column.
    for x in x2.min(xb)..=x2.max(xb) {
        if x != xb {
            put(x, y2, '─');
        }
    }
    // Vertical leg between the corners.
    for row in (y1.min(y2) + 1)..y1.max(y2) {
        put(xb, row, '│');
    }
    // Corners: arms point back toward each horizontal leg.
    put(xb, y1, corner_char(x1 < xb, y2 > y1));
    put(xb, y2, corner_char(x2 < xb, y1 > y2));
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
