//! Turn state machine values.

use serde::{Deserialize, Serialize};

use crate::core::{Side, WorkerId};

/// Engine state machine.
///
/// ```text
/// AwaitingMove(s) --move--> AwaitingBuild(s, w) --build--> AwaitingMove(other)
///        |                                          \
///        +--move onto level 3--> Won(s)              +--other side stuck--> Stalemate
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EngineState {
    /// Waiting for `side` to move one of its workers.
    AwaitingMove(Side),
    /// Waiting for `side` to build next to `worker`.
    AwaitingBuild { side: Side, worker: WorkerId },
    /// `Side` moved a worker onto level 3.
    Won(Side),
    /// The side to act had no legal move and loses.
    Stalemate { loser: Side },
}

impl EngineState {
    /// Whether no further action is accepted.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, EngineState::Won(_) | EngineState::Stalemate { .. })
    }

    /// The side expected to act, if the game is in progress.
    #[must_use]
    pub fn side_to_act(&self) -> Option<Side> {
        match *self {
            EngineState::AwaitingMove(side) | EngineState::AwaitingBuild { side, .. } => Some(side),
            EngineState::Won(_) | EngineState::Stalemate { .. } => None,
        }
    }

    /// The winning side of a finished game.
    #[must_use]
    pub fn winner(&self) -> Option<Side> {
        match *self {
            EngineState::Won(side) => Some(side),
            EngineState::Stalemate { loser } => Some(loser.other()),
            _ => None,
        }
    }
}

/// Phase within a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Move,
    Build,
}

/// Game outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    InProgress,
    Won { winner: Side },
    Stalemate { loser: Side },
}

/// Caller-facing view of the turn: who acts, in which phase, and the outcome.
///
/// For a finished game `side` is the side that acted last (the winner) or
/// the side that could not act (the stalemated loser).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnState {
    pub side: Side,
    pub phase: Phase,
    pub outcome: Outcome,
}

impl From<EngineState> for TurnState {
    fn from(state: EngineState) -> Self {
        match state {
            EngineState::AwaitingMove(side) => TurnState {
                side,
                phase: Phase::Move,
                outcome: Outcome::InProgress,
            },
            EngineState::AwaitingBuild { side, .. } => TurnState {
                side,
                phase: Phase::Build,
                outcome: Outcome::InProgress,
            },
            EngineState::Won(side) => TurnState {
                side,
                phase: Phase::Move,
                outcome: Outcome::Won { winner: side },
            },
            EngineState::Stalemate { loser } => TurnState {
                side: loser,
                phase: Phase::Move,
                outcome: Outcome::Stalemate { loser },
            },
        }
    }
}

impl TurnState {
    /// Whether the game has ended.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.outcome != Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_queries() {
        let build = EngineState::AwaitingBuild {
            side: Side::Red,
            worker: WorkerId::new(Side::Red, 0),
        };
        assert_eq!(build.side_to_act(), Some(Side::Red));
        assert!(!build.is_terminal());

        let stale = EngineState::Stalemate { loser: Side::Blue };
        assert!(stale.is_terminal());
        assert_eq!(stale.side_to_act(), None);
        assert_eq!(stale.winner(), Some(Side::Red));
    }

    #[test]
    fn test_turn_state_from_engine_state() {
        let turn = TurnState::from(EngineState::AwaitingMove(Side::Blue));
        assert_eq!(turn.phase, Phase::Move);
        assert!(!turn.is_terminal());

        let won = TurnState::from(EngineState::Won(Side::Red));
        assert_eq!(won.outcome, Outcome::Won { winner: Side::Red });
        assert!(won.is_terminal());
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_string(&Outcome::Stalemate { loser: Side::Blue }).unwrap();
        assert_eq!(json, r#"{"status":"stalemate","loser":"blue"}"#);

        let json = serde_json::to_string(&Outcome::InProgress).unwrap();
        assert_eq!(json, r#"{"status":"in_progress"}"#);
    }
}
