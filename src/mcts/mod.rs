//! Monte Carlo Tree Search.
//!
//! ## Overview
//!
//! - **Arena tree**: nodes in a flat `Vec`, linked by `NodeId`
//! - **Phase plies**: a move and a build are separate tree levels
//! - **Seeded**: expansion order and rollouts come from a `GameRng`, so a
//!   given seed always yields the same choice
//! - **Budgets**: iteration count, node limit and optional wall clock
//!
//! ## Usage
//!
//! ```rust
//! use santorini_engine::core::GameConfig;
//! use santorini_engine::mcts::{MCTSConfig, MCTSSearch};
//! use santorini_engine::rules::RulesEngine;
//!
//! let engine = RulesEngine::new(&GameConfig::default()).unwrap();
//! let mut search = MCTSSearch::new(MCTSConfig::default().with_iterations(200));
//!
//! let action = search.search(&engine).unwrap();
//! assert!(engine.legal_actions().contains(&action));
//!
//! let probs = search.action_probabilities();
//! let total: f64 = probs.iter().map(|(_, p)| p).sum();
//! assert!((total - 1.0).abs() < 1e-9);
//! ```

pub mod config;
pub mod node;
pub mod policy;
pub mod search;
pub mod stats;
pub mod tree;

pub use config::{MCTSConfig, RolloutKind};
pub use node::{Edge, MCTSNode, NodeId};
pub use policy::{GreedySimulation, RandomSimulation, SelectionPolicy, SimulationPolicy, UCB1};
pub use search::{MCTSSearch, MctsBot};
pub use stats::SearchStats;
pub use tree::{MCTSTree, TreeStats};
