use crossterm::event::KeyEvent;
use torneo_bracket::Side;

/// One command against the bracket core. The main loop applies these to the
/// current state and replaces the state reference with the result.
#[derive(Debug, Clone, PartialEq)]
pub enum BracketCommand {
    Reset,
    /// Seed the full 64-entrant roster in leaf order.
    Seed { entrants: Vec<String> },
    /// Seed (or replace) a single leaf, 0..=63.
    SeedLeaf { leaf_index: usize, name: String },
    /// Round-0 win over the flattened 0..=31 match index.
    FirstRoundWin { match_index: usize, slot: u8 },
    /// Win at an arbitrary half-relative coordinate.
    Win { side: Side, round: usize, match_index: usize, slot: u8 },
    /// Decide the center final for the named side's finalist.
    FinalWin { side: Side },
}

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Resize,
    AppStarted,
    AnimationTick,
}
