use log::LevelFilter;
use std::time::Duration;

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
    /// `TORNEO_PLAYERS_FILE` — JSON array of exactly 64 names, seeded on startup.
    pub players_file: Option<String>,
    /// `TORNEO_SCRIPT` — demo-script file played back on the autoplay timer.
    pub script_file: Option<String>,
    /// `TORNEO_AUTOPLAY_MS` — milliseconds between script commands.
    pub autoplay_tick: Duration,
}

const DEFAULT_AUTOPLAY_MS: u64 = 800;

impl AppSettings {
    pub fn load() -> Self {
        let autoplay_ms = std::env::var("TORNEO_AUTOPLAY_MS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_AUTOPLAY_MS);

        Self {
            full_screen: false,
            log_level: None,
            players_file: env_path("TORNEO_PLAYERS_FILE"),
            script_file: env_path("TORNEO_SCRIPT"),
            autoplay_tick: Duration::from_millis(autoplay_ms.max(50)),
        }
    }
}

fn env_path(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}
