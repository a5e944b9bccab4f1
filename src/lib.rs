//! # santorini-engine
//!
//! Rules engine and move-selection bots for the Santorini base game.
//!
//! A turn is two phases: the side to act moves one of its two workers to a
//! neighbouring cell at most one level higher, then builds one level on a
//! cell next to it. Moving onto level 3 wins. A side that cannot move loses.
//!
//! ## Design Principles
//!
//! 1. **One authority**: `RulesEngine` alone decides legality and applies
//!    actions. Bots and sessions query it and never reimplement the rules.
//!
//! 2. **Explicit state machine**: the turn and phase live in an
//!    `EngineState` value owned by the engine.
//!
//! 3. **Validate, then commit**: a rejected action leaves the game untouched.
//!
//! 4. **Deterministic bots**: randomized strategies draw from a seeded
//!    `GameRng`, so the same seed replays the same game.
//!
//! ## Modules
//!
//! - `core`: coordinates, sides, grid, workers, actions, errors, RNG, configuration
//! - `rules`: the rules engine and its turn state
//! - `bots`: greedy, random and minimax bots, and the bot registry
//! - `mcts`: Monte Carlo Tree Search, and the bot built on it
//! - `session`: handle-based hosting of many games
//!
//! ## Example
//!
//! ```
//! use santorini_engine::{Coord, GameConfig, RulesEngine, Side, WorkerId};
//!
//! let mut engine = RulesEngine::new(&GameConfig::default()).unwrap();
//! let worker = WorkerId::new(Side::Blue, 0);
//!
//! assert_eq!(engine.legal_moves(worker).len(), 8);
//! engine.apply_move(Side::Blue, worker, Coord::new(1, 2)).unwrap();
//! let turn = engine.apply_build(Side::Blue, Coord::new(0, 2)).unwrap();
//!
//! assert_eq!(turn.side, Side::Red);
//! ```

pub mod bots;
pub mod core;
pub mod mcts;
pub mod rules;
pub mod session;

pub use crate::core::{
    Action, ActionRecord, Cell, Coord, EngineError, GameConfig, GameRng, Grid, Placements, Result,
    Side, SideMap, WorkerId, WorkerSet,
};

pub use crate::rules::{EngineState, LegalSet, Outcome, Phase, RulesEngine, TurnState};

pub use crate::bots::{
    Bot, BotConfig, BotKind, GreedyBot, HeuristicWeights, MinimaxBot, MinimaxConfig, RandomBot,
};

pub use crate::mcts::{MCTSConfig, MCTSSearch, MctsBot, RolloutKind, SearchStats};

pub use crate::session::{GameHandle, GameRegistry, GameSession, Snapshot, TurnRecord, TurnRequest};
