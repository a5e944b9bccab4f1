//! Core MCTS search algorithm.
//!
//! Santorini is fully observable, so every node is expanded with every legal
//! action of the side it belongs to, and selection at a node maximises that
//! side's mean reward. One ply is one phase action.

use std::time::{Duration, Instant};

use crate::bots::eval::HeuristicWeights;
use crate::core::{Action, Coord, EngineError, GameRng, Result, Side, SideMap, WorkerId};
use crate::rules::{EngineState, RulesEngine};

use super::config::{MCTSConfig, RolloutKind};
use super::node::{Edge, MCTSNode, NodeId};
use super::policy::{
    outcome_rewards, GreedySimulation, RandomSimulation, SelectionPolicy, SimulationPolicy, UCB1,
};
use super::stats::SearchStats;
use super::tree::MCTSTree;

/// MCTS search context.
///
/// Owns the tree, the RNG and the policies. Each call to `search` starts a
/// fresh tree from the given engine.
pub struct MCTSSearch {
    config: MCTSConfig,
    tree: MCTSTree,
    rng: GameRng,
    selection: Box<dyn SelectionPolicy>,
    simulation: Box<dyn SimulationPolicy>,
    stats: SearchStats,
}

impl MCTSSearch {
    /// Create a search with UCB1 and the rollout policy named by the config.
    #[must_use]
    pub fn new(config: MCTSConfig) -> Self {
        Self::with_weights(config, HeuristicWeights::default())
    }

    /// Like `new`, with custom weights for rollouts and cut-off evaluation.
    #[must_use]
    pub fn with_weights(config: MCTSConfig, weights: HeuristicWeights) -> Self {
        let simulation: Box<dyn SimulationPolicy> = match config.rollout {
            RolloutKind::Random => Box::new(RandomSimulation::new(weights)),
            RolloutKind::Greedy => Box::new(GreedySimulation::new(weights, config.rollout_epsilon)),
        };

        Self {
            rng: GameRng::new(config.seed),
            tree: MCTSTree::new(Side::Blue),
            selection: Box::new(UCB1),
            simulation,
            stats: SearchStats::default(),
            config,
        }
    }

    /// Set a custom selection policy.
    #[must_use]
    pub fn with_selection<S: SelectionPolicy + 'static>(mut self, selection: S) -> Self {
        self.selection = Box::new(selection);
        self
    }

    /// Set a custom simulation policy.
    #[must_use]
    pub fn with_simulation<S: SimulationPolicy + 'static>(mut self, simulation: S) -> Self {
        self.simulation = Box::new(simulation);
        self
    }

    /// Search from the engine's current phase and return the chosen action.
    ///
    /// Returns `None` if the game is over. Stops at `iterations`, the time
    /// budget or the node limit, whichever comes first.
    pub fn search(&mut self, engine: &RulesEngine) -> Option<Action> {
        let start = Instant::now();
        let deadline = self
            .config
            .time_budget_ms
            .map(|ms| start + Duration::from_millis(ms));
        self.stats.reset();

        let to_move = engine.side_to_act()?;
        self.tree.reset(to_move);
        let root = self.tree.root();
        self.expand_node(root, engine);

        let root_node = self.tree.get(root);
        if root_node.edges.len() == 1 {
            return Some(root_node.edges[0].action);
        }

        // A win available right now needs no search
        if let Some(action) = immediate_win(engine, to_move) {
            return Some(action);
        }

        for _ in 0..self.config.iterations {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                self.stats.timed_out = true;
                break;
            }
            if self.tree.len() >= self.config.max_nodes {
                break;
            }
            self.iteration(engine);
            self.stats.iterations += 1;
        }

        self.stats.time_us = start.elapsed().as_micros() as u64;
        let shape = self.tree.stats();
        log::trace!(
            "mcts: {} iterations ({:.0}/s), {} nodes, depth {}, branching {:.1}",
            self.stats.iterations,
            self.stats.iterations_per_second(),
            shape.node_count,
            shape.max_depth,
            shape.branching_factor()
        );

        self.best_action()
    }

    /// Select, expand, simulate, backpropagate.
    fn iteration(&mut self, root_engine: &RulesEngine) {
        let mut engine = root_engine.clone();
        let mut path: Vec<(NodeId, usize)> = Vec::new();
        let mut current = self.tree.root();

        loop {
            let node = self.tree.get(current);

            if let Some(rewards) = node.terminal_reward {
                self.backpropagate(&path, rewards);
                return;
            }

            if node.edges.is_empty() {
                return;
            }

            if node.has_unexpanded() {
                let edge_idx = self.select_unexpanded(current);
                path.push((current, edge_idx));

                let action = self.tree.get(current).edges[edge_idx].action;
                if engine.apply(&action).is_err() {
                    return;
                }
                self.expand_child(current, edge_idx, &engine);

                let mut sim_rng = self.rng.fork();
                let rewards = self
                    .simulation
                    .simulate(&mut engine, &mut sim_rng, self.config.max_depth);
                self.stats.simulations += 1;
                self.backpropagate(&path, rewards);
                return;
            }

            let edge_idx = self.selection.select(node, node.to_move, &self.config);
            let edge = &node.edges[edge_idx];
            let (action, child) = (edge.action, edge.child);
            path.push((current, edge_idx));

            if engine.apply(&action).is_err() {
                return;
            }
            current = child;
        }
    }

    /// Fill a node's edges from the engine, or mark it terminal.
    fn expand_node(&mut self, node_id: NodeId, engine: &RulesEngine) {
        let node = self.tree.get_mut(node_id);

        if let Some(rewards) = outcome_rewards(engine.state()) {
            node.terminal_reward = Some(rewards);
            return;
        }

        node.edges.extend(engine.legal_actions().into_iter().map(Edge::new));
        self.stats.nodes_expanded += 1;
    }

    fn select_unexpanded(&mut self, node_id: NodeId) -> usize {
        let unexpanded: Vec<usize> = self.tree.get(node_id).unexpanded_edges().collect();
        match unexpanded.len() {
            0 => 0,
            1 => unexpanded[0],
            n => unexpanded[self.rng.gen_range_usize(0..n)],
        }
    }

    fn expand_child(&mut self, parent_id: NodeId, edge_idx: usize, engine: &RulesEngine) -> NodeId {
        let depth = self.tree.get(parent_id).depth + 1;
        self.stats.max_depth = self.stats.max_depth.max(depth);

        // Terminal children keep the parent's side; it is never read
        let to_move = engine
            .side_to_act()
            .unwrap_or(self.tree.get(parent_id).to_move);
        let child_id = self.tree.alloc(MCTSNode::new(parent_id, to_move, depth));
        self.tree.get_mut(parent_id).edges[edge_idx].child = child_id;
        self.expand_node(child_id, engine);

        child_id
    }

    fn backpropagate(&mut self, path: &[(NodeId, usize)], rewards: SideMap<f64>) {
        for &(node_id, edge_idx) in path.iter().rev() {
            let node = self.tree.get_mut(node_id);
            node.visits += 1;

            let edge = &mut node.edges[edge_idx];
            edge.visits += 1;
            for side in Side::ALL {
                edge.total_reward[side] += rewards[side];
            }
        }
    }

    fn best_action(&mut self) -> Option<Action> {
        let root = self.tree.root_node();

        if self.config.temperature <= 0.0 {
            return root.best_edge_by_visits().map(|e| e.action);
        }

        let max_visits = root.edges.iter().map(|e| e.visits).max().unwrap_or(0);
        let weights: Vec<f64> = root
            .edges
            .iter()
            .map(|e| ((f64::from(e.visits) - f64::from(max_visits)) / self.config.temperature).exp())
            .collect();

        self.rng
            .choose_weighted(&weights)
            .map(|idx| self.tree.root_node().edges[idx].action)
    }

    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    #[must_use]
    pub fn tree(&self) -> &MCTSTree {
        &self.tree
    }

    #[must_use]
    pub fn config(&self) -> &MCTSConfig {
        &self.config
    }

    /// Root actions with their visit counts.
    #[must_use]
    pub fn action_visits(&self) -> Vec<(Action, u32)> {
        self.tree
            .root_node()
            .edges
            .iter()
            .map(|e| (e.action, e.visits))
            .collect()
    }

    /// Root actions with their share of visits.
    #[must_use]
    pub fn action_probabilities(&self) -> Vec<(Action, f64)> {
        let root = self.tree.root_node();
        let total: u32 = root.edges.iter().map(|e| e.visits).sum();

        if total == 0 {
            let uniform = 1.0 / root.edges.len().max(1) as f64;
            return root.edges.iter().map(|e| (e.action, uniform)).collect();
        }

        root.edges
            .iter()
            .map(|e| (e.action, f64::from(e.visits) / f64::from(total)))
            .collect()
    }
}

/// A move climbing onto level 3 for `side`, if one exists.
fn immediate_win(engine: &RulesEngine, side: Side) -> Option<Action> {
    if engine.state() != EngineState::AwaitingMove(side) {
        return None;
    }
    engine.legal_actions().into_iter().find(|action| {
        matches!(action, Action::Move { worker, dest } if engine.is_winning_move(*worker, *dest))
    })
}

// =============================================================================
// Bot
// =============================================================================

/// MCTS-driven bot. Every selection runs a fresh search.
pub struct MctsBot {
    side: Side,
    search: MCTSSearch,
}

impl MctsBot {
    #[must_use]
    pub fn new(side: Side, config: MCTSConfig, weights: HeuristicWeights) -> Self {
        Self {
            side,
            search: MCTSSearch::with_weights(config, weights),
        }
    }

    /// Statistics of the last search.
    #[must_use]
    pub fn last_stats(&self) -> &SearchStats {
        self.search.stats()
    }

    fn failed(&self, reason: &'static str) -> EngineError {
        EngineError::InvalidBotInvocation {
            side: self.side,
            reason,
        }
    }
}

impl std::fmt::Debug for MctsBot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MctsBot")
            .field("side", &self.side)
            .field("config", self.search.config())
            .finish()
    }
}

impl crate::bots::Bot for MctsBot {
    fn name(&self) -> &'static str {
        "mcts"
    }

    fn side(&self) -> Side {
        self.side
    }

    fn select_move(&mut self, engine: &RulesEngine) -> Result<(WorkerId, Coord)> {
        crate::bots::expect_move_phase(engine, self.side)?;
        match self.search.search(engine) {
            Some(Action::Move { worker, dest }) => Ok((worker, dest)),
            _ => Err(self.failed("no legal move")),
        }
    }

    fn select_build(&mut self, engine: &RulesEngine) -> Result<Coord> {
        crate::bots::expect_build_phase(engine, self.side)?;
        match self.search.search(engine) {
            Some(Action::Build { cell }) => Ok(cell),
            _ => Err(self.failed("no legal build")),
        }
    }
}
