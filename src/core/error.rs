//! Engine error type.
//!
//! Every failure is a local validation failure reported synchronously.
//! Nothing is retried internally, and an operation that returns an error
//! has not mutated any state.

use thiserror::Error;

use super::coord::Coord;
use super::side::Side;
use super::workers::WorkerId;

/// Crate result alias.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors reported by the grid, worker set, rules engine, bots and sessions.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("cell {coord} is outside the {rows}x{cols} grid")]
    OutOfBounds { coord: Coord, rows: u8, cols: u8 },

    #[error("cell {coord} is already occupied by {occupant}")]
    CellOccupied { coord: Coord, occupant: WorkerId },

    #[error("cell {coord} is already capped")]
    AlreadyCapped { coord: Coord },

    #[error("illegal move of {worker} to {dest}: {reason}")]
    IllegalMove {
        worker: WorkerId,
        dest: Coord,
        reason: &'static str,
    },

    #[error("illegal build by {side} at {cell}: {reason}")]
    IllegalBuild {
        side: Side,
        cell: Coord,
        reason: &'static str,
    },

    #[error("bot for {side} invoked out of phase: {reason}")]
    InvalidBotInvocation { side: Side, reason: &'static str },

    #[error("game is already over")]
    GameAlreadyTerminal,

    #[error("grid dimensions {rows}x{cols} are not supported (each must be 2..=16)")]
    InvalidDimensions { rows: u8, cols: u8 },

    #[error("unknown bot [{0}]")]
    UnknownBot(String),

    #[error("no game with handle {0}")]
    UnknownGame(u64),
}
