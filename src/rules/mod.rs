//! Game rules: legality, transitions and win detection.
//!
//! `RulesEngine` is the single authority over a game in progress. Everything
//! that changes a position goes through `apply_move` or `apply_build`; bots
//! and sessions only read from it or work on clones.

pub mod engine;
pub mod legal;
pub mod turn;

pub use engine::RulesEngine;
pub use legal::LegalSet;
pub use turn::{EngineState, Outcome, Phase, TurnState};
