use crate::app::{App, MenuItem};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;

    if guard.state.show_intro {
        match (key_event.code, key_event.modifiers) {
            (KeyCode::Enter, _) => guard.dismiss_intro(),
            (Char('q'), _) | (Char('c'), KeyModifiers::CONTROL) => {
                crate::cleanup_terminal();
                std::process::exit(0);
            }
            _ => {}
        }
        return;
    }

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Bracket),
        (_, Char('2'), _) => guard.update_tab(MenuItem::Entrants),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Bracket navigation
        (MenuItem::Bracket, Char('l') | KeyCode::Right, _) => {
            guard.state.bracket.navigate_stage_next();
        }
        (MenuItem::Bracket, Char('h') | KeyCode::Left, _) => {
            guard.state.bracket.navigate_stage_prev();
        }
        (MenuItem::Bracket, Char('j') | KeyCode::Down, _) => {
            guard.state.bracket.navigate_match_down();
        }
        (MenuItem::Bracket, Char('k') | KeyCode::Up, _) => {
            guard.state.bracket.navigate_match_up();
        }
        (MenuItem::Bracket, Char('r') | KeyCode::Tab, _) => {
            guard.state.bracket.toggle_side();
        }

        // Recording results for the selected match
        (MenuItem::Bracket, Char('t'), _) => guard.record_selected_win(0),
        (MenuItem::Bracket, Char('b'), _) => guard.record_selected_win(1),
        (MenuItem::Bracket, Char('w'), _) => guard.record_final_win(),
        (MenuItem::Bracket, Char('u'), _) => guard.undo(),
        (MenuItem::Bracket, Char('R'), _) => {
            guard.apply(crate::state::commands::BracketCommand::Reset);
        }

        // Snapshot persistence
        (MenuItem::Bracket, Char('s'), _) => guard.save_snapshot(),
        (MenuItem::Bracket, Char('o'), _) => guard.load_snapshot(),

        // Entrants roster scrolling
        (MenuItem::Entrants, Char('j') | KeyCode::Down, _) => {
            guard.state.roster_scroll = guard.state.roster_scroll.saturating_add(1);
        }
        (MenuItem::Entrants, Char('k') | KeyCode::Up, _) => {
            guard.state.roster_scroll = guard.state.roster_scroll.saturating_sub(1);
        }

        // Global
        (_, Char('a'), _) => guard.toggle_autoplay(),
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}
