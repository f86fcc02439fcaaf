pub mod connector;
pub mod layout;
pub mod ops;

pub use connector::{ConnectorPath, route_connectors, route_final, route_half};
pub use layout::{CellPx, GridCell, HalfGrid, LayoutParams, cell_px, grid_placement, grid_placement_final};
pub use ops::{BracketError, BracketResult};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Bracket shape constants
// ---------------------------------------------------------------------------

/// Matches per round within one half: 32 entrants collapsing to 1 finalist.
pub const ROUND_SIZES: [usize; 5] = [16, 8, 4, 2, 1];

/// Rounds in one half (round 0 = first round, round 4 = half-final).
pub const ROUNDS_PER_HALF: usize = 5;

/// Leaf entrant slots across both halves (32 per half, 2 per leaf match).
pub const LEAF_SLOTS: usize = 64;

// ---------------------------------------------------------------------------
// Domain types — clean model, independent of any rendering surface
// ---------------------------------------------------------------------------

/// One tournament entrant. The id is optional — entrants seeded from a bare
/// name carry no id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrant {
    pub id: Option<u32>,
    pub name: String,
}

impl Entrant {
    pub fn new(id: impl Into<Option<u32>>, name: impl Into<String>) -> Self {
        Self { id: id.into(), name: name.into() }
    }
}

impl From<&str> for Entrant {
    fn from(name: &str) -> Self {
        Self { id: None, name: name.to_string() }
    }
}

impl From<String> for Entrant {
    fn from(name: String) -> Self {
        Self { id: None, name }
    }
}

/// A single match: two slots, filled either by seeding (round 0) or by
/// winner propagation (interior rounds). Never holds more than two entrants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Stable id, pre-assigned at construction (`m-<n>`, numbered per half).
    pub id: String,
    pub slot1: Option<Entrant>,
    pub slot2: Option<Entrant>,
}

impl Match {
    /// Slot accessor by wire index: 0 = slot1, 1 = slot2.
    pub fn slot(&self, slot: u8) -> Option<&Entrant> {
        match slot {
            0 => self.slot1.as_ref(),
            _ => self.slot2.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slot1.is_none() && self.slot2.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    pub matches: Vec<Match>,
}

/// One side of the bracket: 5 rounds, 32 entrants collapsing to one finalist.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Half {
    pub rounds: Vec<Round>,
}

impl Half {
    pub fn match_at(&self, round: usize, match_index: usize) -> Option<&Match> {
        self.rounds.get(round)?.matches.get(match_index)
    }

    /// The half's sole round-4 match, producing the finalist.
    pub fn half_final(&self) -> Option<&Match> {
        self.match_at(ROUNDS_PER_HALF - 1, 0)
    }
}

/// The center final: each half's finalist and, once decided, the champion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalMatch {
    pub left: Option<Entrant>,
    pub right: Option<Entrant>,
    pub winner: Option<Entrant>,
}

impl FinalMatch {
    pub fn finalist(&self, side: Side) -> Option<&Entrant> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }
}

/// The whole tournament: two mirrored halves plus the center final.
///
/// A value type — every transition in [`ops`] returns a new instance and
/// leaves its input untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketState {
    pub left: Half,
    pub right: Half,
    pub final_match: FinalMatch,
}

impl BracketState {
    pub fn half(&self, side: Side) -> &Half {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub(crate) fn half_mut(&mut self, side: Side) -> &mut Half {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn match_at(&self, side: Side, round: usize, match_index: usize) -> Option<&Match> {
        self.half(side).match_at(round, match_index)
    }

    /// The tournament winner, once `record_final_win` has been applied.
    pub fn champion(&self) -> Option<&Entrant> {
        self.final_match.winner.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Side
// ---------------------------------------------------------------------------

/// Which half of the bracket a coordinate refers to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Left,
    Right,
}

impl Side {
    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "left",
            Side::Right => "right",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Text entry point for the scripted command surface. The typed enum cannot
/// hold a bad side, so `InvalidSide` is raised here, at the parse boundary.
impl FromStr for Side {
    type Err = BracketError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Side::Left),
            "right" | "r" => Ok(Side::Right),
            _ => Err(BracketError::InvalidSide(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Stage — navigation axis over the five rounds of a half
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stage {
    #[default]
    RoundOf32,
    RoundOf16,
    Quarterfinals,
    Semifinal,
    Finalist,
}

impl Stage {
    pub const ALL: [Stage; 5] = [
        Stage::RoundOf32,
        Stage::RoundOf16,
        Stage::Quarterfinals,
        Stage::Semifinal,
        Stage::Finalist,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Stage::RoundOf32 => "Round of 32",
            Stage::RoundOf16 => "Round of 16",
            Stage::Quarterfinals => "Quarterfinals",
            Stage::Semifinal => "Semifinal",
            Stage::Finalist => "Finalist",
        }
    }

    /// Round index within a half: 0 (leaves) ..= 4 (half-final).
    pub fn index(self) -> usize {
        match self {
            Stage::RoundOf32 => 0,
            Stage::RoundOf16 => 1,
            Stage::Quarterfinals => 2,
            Stage::Semifinal => 3,
            Stage::Finalist => 4,
        }
    }

    pub fn from_index(round: usize) -> Option<Self> {
        Stage::ALL.get(round).copied()
    }

    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(Stage::from_index)
    }

    pub fn next(self) -> Option<Self> {
        Stage::from_index(self.index() + 1)
    }

    /// Matches in this round: 16, 8, 4, 2, 1.
    pub fn match_count(self) -> usize {
        ROUND_SIZES[self.index()]
    }
}
