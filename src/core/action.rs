//! Phase actions and the action history record.
//!
//! A turn is two actions: a `Move` of one of the acting side's workers,
//! then a `Build` next to that worker. Search bots treat each as one ply.

use serde::{Deserialize, Serialize};

use super::coord::Coord;
use super::side::Side;
use super::workers::WorkerId;

/// A single phase action.
///
/// ```
/// use santorini_engine::core::{Action, Coord, Side, WorkerId};
///
/// let mv = Action::Move { worker: WorkerId::new(Side::Blue, 0), dest: Coord::new(2, 3) };
/// assert!(mv.is_move());
/// assert_eq!(mv.target(), Coord::new(2, 3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Action {
    /// Relocate a worker.
    Move { worker: WorkerId, dest: Coord },
    /// Build next to the worker that just moved.
    Build { cell: Coord },
}

impl Action {
    /// Check if this is a move.
    #[must_use]
    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move { .. })
    }

    /// The cell this action targets.
    #[must_use]
    pub fn target(&self) -> Coord {
        match *self {
            Action::Move { dest, .. } => dest,
            Action::Build { cell } => cell,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move { worker, dest } => write!(f, "move {} to {}", worker, dest),
            Action::Build { cell } => write!(f, "build at {}", cell),
        }
    }
}

/// A recorded action with metadata for history tracking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// The side that acted.
    pub side: Side,

    /// The action taken.
    pub action: Action,

    /// Turn number when the action was taken.
    pub turn: u32,
}

impl ActionRecord {
    /// Create a new action record.
    #[must_use]
    pub fn new(side: Side, action: Action, turn: u32) -> Self {
        Self { side, action, turn }
    }
}
