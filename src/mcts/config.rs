//! MCTS configuration parameters.

use serde::{Deserialize, Serialize};

/// How rollouts pick their actions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RolloutKind {
    /// Uniform among legal actions.
    #[default]
    Random,
    /// Best heuristic action, with occasional random exploration.
    Greedy,
}

/// MCTS configuration parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MCTSConfig {
    /// UCB1 exploration constant (default: sqrt(2) = 1.414).
    /// Higher values favor exploration over exploitation.
    pub exploration_constant: f64,

    /// Iterations per search.
    pub iterations: u32,

    /// Wall-clock budget per search (`None` = iterations only).
    pub time_budget_ms: Option<u64>,

    /// Maximum rollout length in plies (0 = play to the end).
    /// Cut rollouts are scored by static evaluation.
    pub max_depth: u32,

    /// Maximum nodes to allocate in the tree.
    pub max_nodes: usize,

    /// Random seed for expansion and rollouts.
    /// Same seed produces deterministic searches.
    pub seed: u64,

    /// Temperature for the final choice (0 = most visited).
    pub temperature: f64,

    /// Rollout policy.
    pub rollout: RolloutKind,

    /// Chance of a random action in greedy rollouts.
    pub rollout_epsilon: f64,
}

impl Default for MCTSConfig {
    fn default() -> Self {
        Self {
            exploration_constant: std::f64::consts::SQRT_2,
            iterations: 1000,
            time_budget_ms: None,
            max_depth: 0,
            max_nodes: 100_000,
            seed: 42,
            temperature: 0.0, // Greedy by default
            rollout: RolloutKind::Random,
            rollout_epsilon: 0.1,
        }
    }
}

impl MCTSConfig {
    /// Set the exploration constant.
    #[must_use]
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Set the seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the rollout depth limit.
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the final-choice temperature.
    #[must_use]
    pub fn with_temperature(mut self, temp: f64) -> Self {
        self.temperature = temp;
        self
    }

    /// Set the iteration count.
    #[must_use]
    pub fn with_iterations(mut self, iterations: u32) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set a wall-clock budget.
    #[must_use]
    pub fn with_time_budget_ms(mut self, ms: u64) -> Self {
        self.time_budget_ms = Some(ms);
        self
    }

    /// Set the node limit.
    #[must_use]
    pub fn with_max_nodes(mut self, nodes: usize) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Set the rollout policy.
    #[must_use]
    pub fn with_rollout(mut self, rollout: RolloutKind) -> Self {
        self.rollout = rollout;
        self
    }
}
