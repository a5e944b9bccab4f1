//! Core board model: coordinates, sides, grid, workers, actions, RNG,
//! configuration and errors.
//!
//! Nothing in this module knows the turn rules. The `rules` module builds the
//! state machine on top of these types.

pub mod action;
pub mod config;
pub mod coord;
pub mod error;
pub mod grid;
pub mod rng;
pub mod side;
pub mod workers;

pub use action::{Action, ActionRecord};
pub use config::GameConfig;
pub use coord::{Coord, MOORE_OFFSETS};
pub use error::{EngineError, Result};
pub use grid::{Cell, Grid, MAX_EXTENT, MAX_LEVEL, MIN_EXTENT};
pub use rng::GameRng;
pub use side::{Side, SideMap};
pub use workers::{default_placements, Placements, WorkerId, WorkerSet, WORKERS_PER_SIDE};
