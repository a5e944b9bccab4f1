//! Iterative-deepening alpha-beta search.
//!
//! One ply is one phase action, so a full turn is two plies and the side to
//! act does not strictly alternate. Each node maximises when the searching
//! side is to act and minimises otherwise.
//!
//! ## Budgets
//!
//! Depth grows from 1 to `max_depth`. An iteration that runs out of nodes or
//! wall-clock time is discarded and the result of the deepest completed
//! iteration is returned. If not even depth 1 completes, the first legal
//! action is played.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::core::{Action, Coord, EngineError, Result, Side, WorkerId};
use crate::rules::RulesEngine;

use super::eval::{evaluate, HeuristicWeights, DECISIVE_SCORE};
use super::{expect_build_phase, expect_move_phase, Bot};

/// Search limits.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MinimaxConfig {
    /// Deepest iteration, in plies.
    pub max_depth: u32,

    /// Node budget per selection.
    pub max_nodes: u64,

    /// Wall-clock budget per selection (`None` = unbounded).
    pub time_budget_ms: Option<u64>,
}

impl Default for MinimaxConfig {
    fn default() -> Self {
        Self {
            max_depth: 4,
            max_nodes: 200_000,
            time_budget_ms: None,
        }
    }
}

impl MinimaxConfig {
    #[must_use]
    pub fn with_max_depth(mut self, depth: u32) -> Self {
        self.max_depth = depth;
        self
    }

    #[must_use]
    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = nodes;
        self
    }

    #[must_use]
    pub fn with_time_budget_ms(mut self, ms: u64) -> Self {
        self.time_budget_ms = Some(ms);
        self
    }
}

/// Summary of the most recent selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MinimaxReport {
    /// Deepest completed iteration (0 if none completed).
    pub depth: u32,

    /// Nodes visited over all iterations.
    pub nodes: u64,

    /// Score of the chosen action at `depth`.
    pub score: f64,
}

/// Alpha-beta bot.
#[derive(Clone, Debug)]
pub struct MinimaxBot {
    side: Side,
    config: MinimaxConfig,
    weights: HeuristicWeights,
    report: MinimaxReport,
}

/// Budget exhausted.
struct Abort;

struct Budget {
    nodes: u64,
    max_nodes: u64,
    deadline: Option<Instant>,
}

impl Budget {
    fn tick(&mut self) -> std::result::Result<(), Abort> {
        self.nodes += 1;
        if self.nodes > self.max_nodes {
            return Err(Abort);
        }
        // Clock checks are not free
        if self.nodes % 256 == 0 {
            if let Some(deadline) = self.deadline {
                if Instant::now() >= deadline {
                    return Err(Abort);
                }
            }
        }
        Ok(())
    }
}

impl MinimaxBot {
    #[must_use]
    pub fn new(side: Side, config: MinimaxConfig) -> Self {
        Self::with_weights(side, config, HeuristicWeights::default())
    }

    #[must_use]
    pub fn with_weights(side: Side, config: MinimaxConfig, weights: HeuristicWeights) -> Self {
        Self {
            side,
            config,
            weights,
            report: MinimaxReport::default(),
        }
    }

    /// Report of the last selection.
    #[must_use]
    pub fn last_report(&self) -> MinimaxReport {
        self.report
    }

    /// Best action for the current phase.
    fn search(&mut self, engine: &RulesEngine) -> Option<Action> {
        let actions = engine.legal_actions();
        let first = *actions.first()?;

        let mut budget = Budget {
            nodes: 0,
            max_nodes: self.config.max_nodes,
            deadline: self
                .config
                .time_budget_ms
                .map(|ms| Instant::now() + Duration::from_millis(ms)),
        };

        let mut best = (first, 0.0);
        let mut completed = 0;

        for depth in 1..=self.config.max_depth.max(1) {
            match self.search_root(engine, &actions, depth, &mut budget) {
                Ok(found) => {
                    best = found;
                    completed = depth;
                    log::trace!("depth {} best {} ({:.1})", depth, best.0, best.1);
                    // A forced result will not change with depth
                    if best.1.abs() >= DECISIVE_SCORE / 2.0 {
                        break;
                    }
                }
                Err(Abort) => break,
            }
        }

        self.report = MinimaxReport {
            depth: completed,
            nodes: budget.nodes,
            score: best.1,
        };
        log::debug!(
            "minimax for {} chose {} at depth {} after {} nodes",
            self.side,
            best.0,
            completed,
            budget.nodes
        );

        Some(best.0)
    }

    fn search_root(
        &self,
        engine: &RulesEngine,
        actions: &[Action],
        depth: u32,
        budget: &mut Budget,
    ) -> std::result::Result<(Action, f64), Abort> {
        let mut alpha = f64::NEG_INFINITY;
        let beta = f64::INFINITY;
        let mut best: Option<(Action, f64)> = None;

        for action in actions {
            let mut child = engine.clone();
            if child.apply(action).is_err() {
                continue;
            }
            let value = self.alphabeta(&child, depth - 1, 1, alpha, beta, budget)?;
            if best.map_or(true, |(_, v)| value > v) {
                best = Some((*action, value));
            }
            alpha = alpha.max(value);
        }

        best.ok_or(Abort)
    }

    fn alphabeta(
        &self,
        engine: &RulesEngine,
        depth: u32,
        ply: u32,
        mut alpha: f64,
        mut beta: f64,
        budget: &mut Budget,
    ) -> std::result::Result<f64, Abort> {
        budget.tick()?;

        if let Some(winner) = engine.state().winner() {
            // Prefer quicker wins and slower losses
            let score = DECISIVE_SCORE - f64::from(ply);
            return Ok(if winner == self.side { score } else { -score });
        }
        if depth == 0 {
            return Ok(evaluate(engine, self.side, &self.weights));
        }

        let maximizing = engine.side_to_act() == Some(self.side);
        let mut value = if maximizing {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };

        for action in engine.legal_actions() {
            let mut child = engine.clone();
            if child.apply(&action).is_err() {
                continue;
            }
            let score = self.alphabeta(&child, depth - 1, ply + 1, alpha, beta, budget)?;
            if maximizing {
                value = value.max(score);
                alpha = alpha.max(value);
            } else {
                value = value.min(score);
                beta = beta.min(value);
            }
            if alpha >= beta {
                break;
            }
        }

        Ok(value)
    }

    fn out_of_phase(&self, reason: &'static str) -> EngineError {
        EngineError::InvalidBotInvocation {
            side: self.side,
            reason,
        }
    }
}

impl Bot for MinimaxBot {
    fn name(&self) -> &'static str {
        "minimax"
    }

    fn side(&self) -> Side {
        self.side
    }

    fn select_move(&mut self, engine: &RulesEngine) -> Result<(WorkerId, Coord)> {
        expect_move_phase(engine, self.side)?;
        match self.search(engine) {
            Some(Action::Move { worker, dest }) => Ok((worker, dest)),
            _ => Err(self.out_of_phase("no legal move")),
        }
    }

    fn select_build(&mut self, engine: &RulesEngine) -> Result<Coord> {
        expect_build_phase(engine, self.side)?;
        match self.search(engine) {
            Some(Action::Build { cell }) => Ok(cell),
            _ => Err(self.out_of_phase("no legal build")),
        }
    }
}
