use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use crate::state::commands::BracketCommand;
use chrono::Local;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use torneo_bracket::{BracketResult, BracketState, LEAF_SLOTS, ROUNDS_PER_HALF, Side};

/// On-disk snapshot format: the bracket plus a human timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub saved_at: String,
    pub bracket: BracketState,
}

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Bracket,
    Entrants,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self { state: AppState::new(), settings };

        if let Some(level) = app.settings.log_level {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Command application — the host side of read-then-replace
    // -----------------------------------------------------------------------

    /// Apply one command against the current state. On success the state
    /// reference is replaced and the previous value goes to the undo stack;
    /// on failure the old state stays current and the error is surfaced.
    pub fn apply(&mut self, command: BracketCommand) {
        let current = &self.state.bracket.current;
        let result: BracketResult<BracketState> = match command {
            BracketCommand::Reset => Ok(BracketState::empty()),
            BracketCommand::Seed { entrants } => current.seed_all(entrants),
            BracketCommand::SeedLeaf { leaf_index, name } => current.seed_leaf(leaf_index, name),
            BracketCommand::FirstRoundWin { match_index, slot } => {
                current.record_first_round_win(match_index, slot)
            }
            BracketCommand::Win { side, round, match_index, slot } => {
                current.record_win(side, round, match_index, slot)
            }
            BracketCommand::FinalWin { side } => current.record_final_win(side),
        };

        match result {
            Ok(next) => {
                self.state.last_error = None;
                self.state.bracket.replace(next);
            }
            Err(e) => {
                warn!("command rejected: {e}");
                self.state.last_error = Some(e.to_string());
            }
        }
    }

    /// Record a win for the selected match, slot 0 = top, 1 = bottom. At the
    /// finalist stage this decides the center final for the selected side.
    pub fn record_selected_win(&mut self, slot: u8) {
        let cursor = &self.state.bracket;
        self.apply(BracketCommand::Win {
            side: cursor.side,
            round: cursor.stage.index(),
            match_index: cursor.selected_match,
            slot,
        });
    }

    pub fn record_final_win(&mut self) {
        let side = self.state.bracket.side;
        self.apply(BracketCommand::FinalWin { side });
    }

    pub fn undo(&mut self) {
        if self.state.bracket.undo() {
            self.state.status = Some(format!(
                "undid 1 step, {} remaining",
                self.state.bracket.history_len()
            ));
        } else {
            self.state.status = Some("nothing to undo".to_string());
        }
    }

    pub fn toggle_autoplay(&mut self) {
        let playing = &self.state.playing;
        let now = !playing.load(Ordering::Relaxed);
        playing.store(now, Ordering::Relaxed);
        self.state.status = Some(if now { "autoplay on" } else { "autoplay paused" }.to_string());
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
        if self.state.active_tab == MenuItem::Entrants {
            self.state.roster_scroll = 0;
        }
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }

    pub fn dismiss_intro(&mut self) {
        self.state.show_intro = false;
    }

    // -----------------------------------------------------------------------
    // Animation tick — called every 80ms from AnimationTick event
    // -----------------------------------------------------------------------

    pub fn advance_animation(&mut self, frame_count: usize) {
        self.state.animation.advance(frame_count);
    }

    // -----------------------------------------------------------------------
    // Roster + snapshot persistence (host-owned; the core never touches disk)
    // -----------------------------------------------------------------------

    /// Seed the bracket from the configured roster file, if any.
    pub fn load_roster(&mut self) {
        let Some(path) = self.settings.players_file.clone() else {
            return;
        };
        match read_roster(&path) {
            Ok(entrants) => {
                info!("seeding {} entrants from {path}", entrants.len());
                self.apply(BracketCommand::Seed { entrants });
            }
            Err(e) => {
                warn!("roster load failed: {e}");
                self.state.last_error = Some(e);
            }
        }
    }

    pub fn save_snapshot(&mut self) {
        match self.write_snapshot_file() {
            Ok(path) => {
                self.state.status =
                    Some(format!("saved {} ({})", path.display(), Local::now().format("%H:%M")));
            }
            Err(e) => self.state.last_error = Some(e),
        }
    }

    pub fn load_snapshot(&mut self) {
        let path = snapshot_path();
        let result = std::fs::read_to_string(&path)
            .map_err(|e| format!("read snapshot failed: {e}"))
            .and_then(|content| {
                serde_json::from_str::<Snapshot>(&content)
                    .map_err(|e| format!("parse snapshot failed: {e}"))
            });
        match result {
            Ok(snapshot) => {
                self.state.bracket.replace(snapshot.bracket);
                self.state.status = Some(format!("loaded snapshot from {}", snapshot.saved_at));
            }
            Err(e) => self.state.last_error = Some(e),
        }
    }

    fn write_snapshot_file(&self) -> Result<PathBuf, String> {
        let path = snapshot_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| format!("create dir failed: {e}"))?;
        }
        let snapshot = Snapshot {
            saved_at: Local::now().format("%Y-%m-%d %H:%M").to_string(),
            bracket: self.state.bracket.current.clone(),
        };
        let payload = serde_json::to_string_pretty(&snapshot)
            .map_err(|e| format!("serialize bracket failed: {e}"))?;
        std::fs::write(&path, payload).map_err(|e| format!("write bracket failed: {e}"))?;
        Ok(path)
    }

    /// Summary line for the bracket header: rounds decided so far plus the
    /// champion once the final is recorded.
    pub fn progress_line(&self) -> String {
        let state = &self.state.bracket.current;
        let mut decided = 0usize;
        let mut total = 0usize;
        for side in [Side::Left, Side::Right] {
            for round in 1..ROUNDS_PER_HALF {
                for m in &state.half(side).rounds[round].matches {
                    total += 2;
                    decided += usize::from(m.slot1.is_some()) + usize::from(m.slot2.is_some());
                }
            }
        }
        total += 2;
        decided += usize::from(state.final_match.left.is_some())
            + usize::from(state.final_match.right.is_some());

        match state.champion() {
            Some(champion) => format!("champion: {}", champion.name),
            None => format!("{decided}/{total} advances recorded"),
        }
    }
}

/// Roster file: a JSON array of exactly 64 names.
fn read_roster(path: &str) -> Result<Vec<String>, String> {
    let content = std::fs::read_to_string(path).map_err(|e| format!("{path}: read failed: {e}"))?;
    let names: Vec<String> =
        serde_json::from_str(&content).map_err(|e| format!("{path}: invalid roster json: {e}"))?;
    if names.len() != LEAF_SLOTS {
        return Err(format!("{path}: expected {LEAF_SLOTS} names, got {}", names.len()));
    }
    Ok(names)
}

fn snapshot_path() -> PathBuf {
    if let Ok(config_dir) = std::env::var("XDG_CONFIG_HOME")
        && !config_dir.trim().is_empty()
    {
        return PathBuf::from(config_dir).join("torneotui").join("bracket.json");
    }
    if let Ok(home) = std::env::var("HOME")
        && !home.trim().is_empty()
    {
        return PathBuf::from(home).join(".config").join("torneotui").join("bracket.json");
    }
    PathBuf::from("bracket.json")
}

#[cfg(test)]
mod tests {
    use super::*;
    use torneo_bracket::Stage;

    #[test]
    fn test_apply_replaces_state_and_clears_error() {
        let mut app = App::new();
        app.state.last_error = Some("stale".to_string());
        app.apply(BracketCommand::SeedLeaf { leaf_index: 0, name: "Alex".into() });
        assert_eq!(app.state.last_error, None);
        let m = app.state.bracket.current.match_at(Side::Left, 0, 0).unwrap();
        assert_eq!(m.slot1.as_ref().map(|e| e.name.as_str()), Some("Alex"));
    }

    #[test]
    fn test_apply_keeps_state_on_rejected_command() {
        let mut app = App::new();
        let before = app.state.bracket.current.clone();
        app.apply(BracketCommand::SeedLeaf { leaf_index: 64, name: "X".into() });
        assert_eq!(app.state.bracket.current, before);
        assert!(app.state.last_error.as_deref().unwrap_or_default().contains("out of range"));
    }

    #[test]
    fn test_record_selected_win_uses_cursor() {
        let mut app = App::new();
        app.apply(BracketCommand::SeedLeaf { leaf_index: 0, name: "Alex".into() });
        app.record_selected_win(0);
        let parent = app.state.bracket.current.match_at(Side::Left, 1, 0).unwrap();
        assert_eq!(parent.slot1.as_ref().map(|e| e.name.as_str()), Some("Alex"));
    }

    #[test]
    fn test_final_stage_win_then_final_decision() {
        let mut app = App::new();
        app.apply(BracketCommand::SeedLeaf { leaf_index: 0, name: "Alex".into() });
        for round in 0..ROUNDS_PER_HALF {
            app.apply(BracketCommand::Win { side: Side::Left, round, match_index: 0, slot: 0 });
        }
        assert_eq!(
            app.state.bracket.current.final_match.left.as_ref().map(|e| e.name.as_str()),
            Some("Alex")
        );
        app.state.bracket.side = Side::Left;
        app.record_final_win();
        assert_eq!(
            app.state.bracket.current.champion().map(|e| e.name.as_str()),
            Some("Alex")
        );
    }

    #[test]
    fn test_undo_walks_back_one_command() {
        let mut app = App::new();
        app.apply(BracketCommand::SeedLeaf { leaf_index: 0, name: "Alex".into() });
        app.apply(BracketCommand::SeedLeaf { leaf_index: 1, name: "Sam".into() });
        app.undo();
        let m = app.state.bracket.current.match_at(Side::Left, 0, 0).unwrap();
        assert_eq!(m.slot1.as_ref().map(|e| e.name.as_str()), Some("Alex"));
        assert_eq!(m.slot2, None);
    }

    #[test]
    fn test_progress_line_reports_champion() {
        let mut app = App::new();
        app.apply(BracketCommand::SeedLeaf { leaf_index: 0, name: "Alex".into() });
        for round in 0..ROUNDS_PER_HALF {
            app.apply(BracketCommand::Win { side: Side::Left, round, match_index: 0, slot: 0 });
        }
        app.record_final_win();
        assert_eq!(app.progress_line(), "champion: Alex");
        assert_eq!(app.state.bracket.stage, Stage::RoundOf32);
    }
}
