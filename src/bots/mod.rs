//! Automated opponents.
//!
//! ## Contract
//!
//! A bot plays one side. When the engine awaits a move from that side,
//! `select_move` returns a worker and a destination from the engine's legal
//! set. After the move is applied, `select_build` returns a cell from the
//! moved worker's legal builds. Bots read the engine and search on clones;
//! they never mutate the live game. A call in the wrong phase, or for the
//! wrong side, fails with `InvalidBotInvocation`.
//!
//! ## Strategies
//!
//! - `greedy`: single-ply heuristic scoring (the default)
//! - `random`: uniform among legal actions, seeded
//! - `minimax`: iterative-deepening alpha-beta with node and time budgets
//! - `mcts`: UCB1 Monte Carlo tree search with seeded rollouts
//!
//! ```
//! use santorini_engine::bots::{BotConfig, BotKind};
//! use santorini_engine::core::{GameConfig, Side};
//! use santorini_engine::rules::RulesEngine;
//!
//! let engine = RulesEngine::new(&GameConfig::default()).unwrap();
//! let mut bot = BotConfig::new("greedy".parse().unwrap(), Side::Blue).build();
//!
//! let (worker, dest) = bot.select_move(&engine).unwrap();
//! assert!(engine.legal_moves(worker).contains(dest));
//! assert_eq!(BotKind::names(), ["greedy", "random", "minimax", "mcts"]);
//! ```

pub mod eval;
pub mod greedy;
pub mod minimax;
pub mod random;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::{Coord, EngineError, Result, Side, WorkerId};
use crate::mcts::{MCTSConfig, MctsBot};
use crate::rules::{EngineState, RulesEngine};

pub use eval::HeuristicWeights;
pub use greedy::GreedyBot;
pub use minimax::{MinimaxBot, MinimaxConfig, MinimaxReport};
pub use random::RandomBot;

/// A move-then-build opponent for one side.
pub trait Bot: Send {
    /// Registry name of the strategy.
    fn name(&self) -> &'static str;

    /// The side this bot plays.
    fn side(&self) -> Side;

    /// Choose a move. The engine must await a move from `side()`.
    fn select_move(&mut self, engine: &RulesEngine) -> Result<(WorkerId, Coord)>;

    /// Choose a build. The engine must await a build from `side()`.
    fn select_build(&mut self, engine: &RulesEngine) -> Result<Coord>;
}

/// Check that the engine awaits a move from `side`.
pub(crate) fn expect_move_phase(engine: &RulesEngine, side: Side) -> Result<()> {
    match engine.state() {
        EngineState::AwaitingMove(s) if s == side => Ok(()),
        EngineState::AwaitingMove(_) | EngineState::AwaitingBuild { .. } => {
            Err(EngineError::InvalidBotInvocation {
                side,
                reason: "engine is not awaiting a move from this side",
            })
        }
        EngineState::Won(_) | EngineState::Stalemate { .. } => {
            Err(EngineError::InvalidBotInvocation {
                side,
                reason: "game is over",
            })
        }
    }
}

/// Check that the engine awaits a build from `side`, returning the builder.
pub(crate) fn expect_build_phase(engine: &RulesEngine, side: Side) -> Result<WorkerId> {
    match engine.state() {
        EngineState::AwaitingBuild { side: s, worker } if s == side => Ok(worker),
        EngineState::Won(_) | EngineState::Stalemate { .. } => {
            Err(EngineError::InvalidBotInvocation {
                side,
                reason: "game is over",
            })
        }
        _ => Err(EngineError::InvalidBotInvocation {
            side,
            reason: "engine is not awaiting a build from this side",
        }),
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Available strategies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotKind {
    #[default]
    Greedy,
    Random,
    Minimax,
    Mcts,
}

impl BotKind {
    /// Every strategy, in listing order.
    pub const ALL: [BotKind; 4] = [BotKind::Greedy, BotKind::Random, BotKind::Minimax, BotKind::Mcts];

    /// Registry name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            BotKind::Greedy => "greedy",
            BotKind::Random => "random",
            BotKind::Minimax => "minimax",
            BotKind::Mcts => "mcts",
        }
    }

    /// Registry names of every strategy.
    #[must_use]
    pub fn names() -> [&'static str; 4] {
        Self::ALL.map(Self::name)
    }
}

impl FromStr for BotKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| EngineError::UnknownBot(s.to_string()))
    }
}

impl std::fmt::Display for BotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything needed to build a bot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Strategy.
    pub kind: BotKind,

    /// Side the bot plays.
    pub side: Side,

    /// Seed for randomized strategies.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Heuristic weights (greedy, minimax, greedy rollouts).
    #[serde(default)]
    pub weights: HeuristicWeights,

    /// Minimax limits.
    #[serde(default)]
    pub minimax: MinimaxConfig,

    /// MCTS parameters. Its seed is replaced by `seed`.
    #[serde(default)]
    pub mcts: MCTSConfig,
}

fn default_seed() -> u64 {
    42
}

impl BotConfig {
    /// Create a config with default parameters.
    #[must_use]
    pub fn new(kind: BotKind, side: Side) -> Self {
        Self {
            kind,
            side,
            seed: default_seed(),
            weights: HeuristicWeights::default(),
            minimax: MinimaxConfig::default(),
            mcts: MCTSConfig::default(),
        }
    }

    /// Parse a strategy name and create a config.
    pub fn named(name: &str, side: Side) -> Result<Self> {
        Ok(Self::new(name.parse()?, side))
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_weights(mut self, weights: HeuristicWeights) -> Self {
        self.weights = weights;
        self
    }

    #[must_use]
    pub fn with_minimax(mut self, minimax: MinimaxConfig) -> Self {
        self.minimax = minimax;
        self
    }

    #[must_use]
    pub fn with_mcts(mut self, mcts: MCTSConfig) -> Self {
        self.mcts = mcts;
        self
    }

    /// Instantiate the bot.
    #[must_use]
    pub fn build(&self) -> Box<dyn Bot> {
        match self.kind {
            BotKind::Greedy => Box::new(GreedyBot::with_weights(self.side, self.weights.clone())),
            BotKind::Random => Box::new(RandomBot::new(self.side, self.seed)),
            BotKind::Minimax => Box::new(MinimaxBot::with_weights(
                self.side,
                self.minimax.clone(),
                self.weights.clone(),
            )),
            BotKind::Mcts => Box::new(MctsBot::new(
                self.side,
                self.mcts.clone().with_seed(self.seed),
                self.weights.clone(),
            )),
        }
    }
}
