use crate::app::MenuItem;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use torneo_bracket::{BracketState, Match, Side, Stage};

/// Undo depth kept by the host. States are immutable values, so undo is a
/// plain pop.
const HISTORY_LIMIT: usize = 256;

// ---------------------------------------------------------------------------
// Banner animation state
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct AnimationState {
    /// Current frame index into the banner frames array, wraps at FRAME_COUNT.
    pub frame: usize,
    /// Monotonic tick counter — drives color cycling and the trophy shimmer.
    pub tick: u64,
}

impl AnimationState {
    pub fn advance(&mut self, frame_count: usize) {
        self.tick = self.tick.wrapping_add(1);
        self.frame = (self.frame + 1) % frame_count;
    }
}

// ---------------------------------------------------------------------------
// Bracket view state — current immutable state + history + cursor
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct BracketViewState {
    /// The current state reference. Commands read this and replace it.
    pub current: BracketState,
    history: Vec<BracketState>,
    /// Cursor: which half, round, and match the user has selected.
    pub side: Side,
    pub stage: Stage,
    pub selected_match: usize,
    /// Vertical scroll offset in terminal rows.
    pub scroll_offset: u16,
}

impl Default for BracketViewState {
    fn default() -> Self {
        Self {
            current: BracketState::empty(),
            history: Vec::new(),
            side: Side::Left,
            stage: Stage::RoundOf32,
            selected_match: 0,
            scroll_offset: 0,
        }
    }
}

impl BracketViewState {
    /// Read-then-replace: adopt `next` as the current state and push the
    /// previous one onto the undo stack. No-op transitions (structurally
    /// equal states) don't pollute the history.
    pub fn replace(&mut self, next: BracketState) {
        if next == self.current {
            return;
        }
        let prev = std::mem::replace(&mut self.current, next);
        self.history.push(prev);
        if self.history.len() > HISTORY_LIMIT {
            let excess = self.history.len() - HISTORY_LIMIT;
            self.history.drain(0..excess);
        }
    }

    /// Pop back to the previous state. Returns false when there is nothing
    /// to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(prev) => {
                self.current = prev;
                true
            }
            None => false,
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn selected(&self) -> Option<&Match> {
        self.current.match_at(self.side, self.stage.index(), self.selected_match)
    }

    pub fn navigate_stage_next(&mut self) {
        if let Some(next) = self.stage.next() {
            self.stage = next;
            self.clamp_selection();
        }
    }

    pub fn navigate_stage_prev(&mut self) {
        if let Some(prev) = self.stage.prev() {
            self.stage = prev;
            self.clamp_selection();
        }
    }

    pub fn navigate_match_down(&mut self) {
        let max = self.stage.match_count().saturating_sub(1);
        if self.selected_match < max {
            self.selected_match += 1;
        }
    }

    pub fn navigate_match_up(&mut self) {
        self.selected_match = self.selected_match.saturating_sub(1);
    }

    pub fn toggle_side(&mut self) {
        self.side = self.side.other();
    }

    fn clamp_selection(&mut self) {
        self.selected_match = self.selected_match.min(self.stage.match_count() - 1);
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_intro: bool,
    pub show_logs: bool,
    pub last_error: Option<String>,
    /// One-line status note ("saved 14:02" etc.), shown until replaced.
    pub status: Option<String>,
    pub bracket: BracketViewState,
    /// Scroll offset for the entrants roster tab.
    pub roster_scroll: u16,
    pub animation: AnimationState,
    /// Shared with the ScriptPlayer worker; cleared to pause autoplay.
    pub playing: Arc<AtomicBool>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            active_tab: MenuItem::default(),
            previous_tab: MenuItem::default(),
            show_intro: true,
            show_logs: false,
            last_error: None,
            status: None,
            bracket: BracketViewState::default(),
            roster_scroll: 0,
            animation: AnimationState::default(),
            playing: Arc::new(AtomicBool::new(true)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_and_undo_round_trip() {
        let mut view = BracketViewState::default();
        let empty = view.current.clone();
        let seeded = empty.seed_leaf(0, "Alex").unwrap();

        view.replace(seeded.clone());
        assert_eq!(view.current, seeded);
        assert_eq!(view.history_len(), 1);

        assert!(view.undo());
        assert_eq!(view.current, empty);
        assert!(!view.undo());
    }

    #[test]
    fn test_replace_ignores_structural_noops() {
        let mut view = BracketViewState::default();
        // recordWin on an absent slot returns an equal state; it must not
        // grow the undo history.
        let same = view.current.record_win(Side::Left, 0, 0, 0).unwrap();
        view.replace(same);
        assert_eq!(view.history_len(), 0);
    }

    #[test]
    fn test_stage_navigation_clamps_selection() {
        let mut view = BracketViewState::default();
        view.selected_match = 15;
        view.navigate_stage_next();
        assert_eq!(view.stage, Stage::RoundOf16);
        assert_eq!(view.selected_match, 7);
        view.navigate_stage_prev();
        assert_eq!(view.selected_match, 7);
    }

    #[test]
    fn test_match_navigation_stays_in_round() {
        let mut view = BracketViewState::default();
        view.stage = Stage::Finalist;
        view.navigate_match_down();
        assert_eq!(view.selected_match, 0);
        view.navigate_match_up();
        assert_eq!(view.selected_match, 0);
    }
}
