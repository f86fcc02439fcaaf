//! Demo-script support: a plain-text command surface over the bracket core,
//! played back on a timer. This is the scripted stand-in for a live
//! operator — handy for demos and for exercising the command surface end to
//! end without touching the key bindings.

use crate::state::commands::BracketCommand;
use anyhow::{Context, anyhow};
use log::info;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;
use torneo_bracket::Side;

/// Parse a demo script. One command per line; blank lines and `#` comments
/// are skipped.
///
/// ```text
/// reset
/// seed 0 Alex
/// seed 1 Sam
/// won-first 0 0
/// won left 1 0 0
/// won-final left
/// ```
pub fn parse_script(text: &str) -> anyhow::Result<Vec<BracketCommand>> {
    let mut commands = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let command = parse_line(line).with_context(|| format!("script line {}", lineno + 1))?;
        commands.push(command);
    }
    Ok(commands)
}

fn parse_line(line: &str) -> anyhow::Result<BracketCommand> {
    let mut tokens = line.split_whitespace();
    let verb = tokens.next().unwrap_or_default();

    match verb {
        "reset" => Ok(BracketCommand::Reset),
        "seed" => {
            let leaf_index = parse_num(tokens.next(), "leaf index")?;
            let name: Vec<&str> = tokens.collect();
            if name.is_empty() {
                return Err(anyhow!("seed needs a name"));
            }
            Ok(BracketCommand::SeedLeaf { leaf_index, name: name.join(" ") })
        }
        "won-first" => {
            let match_index = parse_num(tokens.next(), "match index")?;
            let slot = parse_num(tokens.next(), "slot")?;
            Ok(BracketCommand::FirstRoundWin { match_index, slot })
        }
        "won" => {
            let side: Side = tokens.next().ok_or_else(|| anyhow!("won needs a side"))?.parse()?;
            let round = parse_num(tokens.next(), "round")?;
            let match_index = parse_num(tokens.next(), "match index")?;
            let slot = parse_num(tokens.next(), "slot")?;
            Ok(BracketCommand::Win { side, round, match_index, slot })
        }
        "won-final" => {
            let side: Side = tokens.next().ok_or_else(|| anyhow!("won-final needs a side"))?.parse()?;
            Ok(BracketCommand::FinalWin { side })
        }
        other => Err(anyhow!("unknown command {other:?}")),
    }
}

fn parse_num<T: std::str::FromStr>(token: Option<&str>, what: &str) -> anyhow::Result<T> {
    let token = token.ok_or_else(|| anyhow!("missing {what}"))?;
    token.parse().map_err(|_| anyhow!("bad {what} {token:?}"))
}

/// Feeds one parsed command per tick into the main loop while `playing` is
/// set, then exits. Pausing skips ticks without consuming commands.
pub struct ScriptPlayer {
    commands: Vec<BracketCommand>,
    commands_tx: mpsc::Sender<BracketCommand>,
    playing: Arc<AtomicBool>,
    tick: Duration,
}

impl ScriptPlayer {
    pub fn new(
        commands: Vec<BracketCommand>,
        commands_tx: mpsc::Sender<BracketCommand>,
        playing: Arc<AtomicBool>,
        tick: Duration,
    ) -> Self {
        Self { commands, commands_tx, playing, tick }
    }

    pub async fn run(self) {
        let mut timer = interval(self.tick);
        // Skip the immediate first tick so startup drawing settles first.
        timer.tick().await;

        let mut queue = self.commands.into_iter();
        loop {
            timer.tick().await;
            if !self.playing.load(Ordering::Relaxed) {
                continue;
            }
            let Some(command) = queue.next() else {
                break;
            };
            if self.commands_tx.send(command).await.is_err() {
                break;
            }
        }
        info!("demo script finished");
    }
}
