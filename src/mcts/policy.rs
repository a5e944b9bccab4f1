//! MCTS policies for selection and simulation.
//!
//! - `SelectionPolicy`: which edge to follow through the expanded tree (UCB1)
//! - `SimulationPolicy`: how rollouts play a position out (random, greedy)

use crate::bots::eval::{evaluate, HeuristicWeights};
use crate::bots::greedy::{best_build, best_move};
use crate::core::{Action, GameRng, Side, SideMap};
use crate::rules::{EngineState, RulesEngine};

use super::config::MCTSConfig;
use super::node::MCTSNode;

// =============================================================================
// Selection Policy
// =============================================================================

/// Policy for selecting which child to explore.
pub trait SelectionPolicy: Send + Sync {
    /// Index of the edge to follow, judged for `side`.
    fn select(&self, node: &MCTSNode, side: Side, config: &MCTSConfig) -> usize;
}

/// UCB1: `Q(a) + c * sqrt(ln(N) / n(a))`. Unvisited edges come first.
#[derive(Clone, Debug, Default)]
pub struct UCB1;

impl SelectionPolicy for UCB1 {
    fn select(&self, node: &MCTSNode, side: Side, config: &MCTSConfig) -> usize {
        let ln_parent = f64::from(node.visits.max(1)).ln();

        let mut best = (0, f64::NEG_INFINITY);
        for (i, edge) in node.edges.iter().enumerate() {
            let exploration = if edge.visits == 0 {
                f64::INFINITY
            } else {
                config.exploration_constant * (ln_parent / f64::from(edge.visits)).sqrt()
            };
            let value = edge.mean_reward(side) + exploration;
            if value > best.1 {
                best = (i, value);
            }
        }
        best.0
    }
}

// =============================================================================
// Simulation Policy
// =============================================================================

/// Policy for running rollouts from a leaf.
pub trait SimulationPolicy: Send + Sync {
    /// Play `engine` forward and return rewards per side.
    ///
    /// `max_depth` of 0 plays to the end.
    fn simulate(&self, engine: &mut RulesEngine, rng: &mut GameRng, max_depth: u32) -> SideMap<f64>;
}

/// Plays uniformly random legal actions.
#[derive(Clone, Debug, Default)]
pub struct RandomSimulation {
    weights: HeuristicWeights,
}

impl RandomSimulation {
    /// Random rollouts; `weights` score positions cut at the depth limit.
    #[must_use]
    pub fn new(weights: HeuristicWeights) -> Self {
        Self { weights }
    }
}

impl SimulationPolicy for RandomSimulation {
    fn simulate(&self, engine: &mut RulesEngine, rng: &mut GameRng, max_depth: u32) -> SideMap<f64> {
        rollout(engine, max_depth, &self.weights, |engine| {
            let actions = engine.legal_actions();
            rng.choose(&actions).copied()
        })
    }
}

/// Plays the greedy bot's choice, with a random action `epsilon` of the time.
#[derive(Clone, Debug)]
pub struct GreedySimulation {
    weights: HeuristicWeights,
    epsilon: f64,
}

impl GreedySimulation {
    #[must_use]
    pub fn new(weights: HeuristicWeights, epsilon: f64) -> Self {
        Self { weights, epsilon }
    }
}

impl SimulationPolicy for GreedySimulation {
    fn simulate(&self, engine: &mut RulesEngine, rng: &mut GameRng, max_depth: u32) -> SideMap<f64> {
        let weights = &self.weights;
        rollout(engine, max_depth, weights, |engine| {
            if rng.gen_f64() < self.epsilon {
                let actions = engine.legal_actions();
                return rng.choose(&actions).copied();
            }
            match engine.state() {
                EngineState::AwaitingMove(side) => {
                    best_move(engine, side, weights).map(|(worker, dest)| Action::Move { worker, dest })
                }
                EngineState::AwaitingBuild { worker, .. } => {
                    best_build(engine, worker, weights).map(|cell| Action::Build { cell })
                }
                EngineState::Won(_) | EngineState::Stalemate { .. } => None,
            }
        })
    }
}

fn rollout(
    engine: &mut RulesEngine,
    max_depth: u32,
    weights: &HeuristicWeights,
    mut pick: impl FnMut(&RulesEngine) -> Option<Action>,
) -> SideMap<f64> {
    let mut depth = 0;

    loop {
        if let Some(rewards) = outcome_rewards(engine.state()) {
            return rewards;
        }
        if max_depth > 0 && depth >= max_depth {
            return heuristic_rewards(engine, weights);
        }

        let Some(action) = pick(engine) else {
            return SideMap::with_value(0.5);
        };
        if engine.apply(&action).is_err() {
            return SideMap::with_value(0.5);
        }

        depth += 1;
    }
}

// =============================================================================
// Rewards
// =============================================================================

/// Rewards of a finished game: 1 for the winner, 0 for the loser.
#[must_use]
pub fn outcome_rewards(state: EngineState) -> Option<SideMap<f64>> {
    state
        .winner()
        .map(|winner| SideMap::new(|side| if side == winner { 1.0 } else { 0.0 }))
}

/// Squash the static evaluation of an unfinished position into `[0, 1]`.
#[must_use]
pub fn heuristic_rewards(engine: &RulesEngine, weights: &HeuristicWeights) -> SideMap<f64> {
    const SCALE: f64 = 50.0;
    let blue = 1.0 / (1.0 + (-evaluate(engine, Side::Blue, weights) / SCALE).exp());
    SideMap::from_values(blue, 1.0 - blue)
}
