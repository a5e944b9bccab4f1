//! Single-ply heuristic bot.

use crate::core::{Coord, EngineError, Result, Side, WorkerId};
use crate::rules::RulesEngine;

use super::eval::{score_build, score_move, HeuristicWeights};
use super::{expect_build_phase, expect_move_phase, Bot};

/// Picks the best-scoring move, then the best-scoring build.
///
/// Candidates are scanned workers first, then Moore order; only a strictly
/// higher score replaces the current pick, so the first candidate wins ties.
#[derive(Clone, Debug)]
pub struct GreedyBot {
    side: Side,
    weights: HeuristicWeights,
}

impl GreedyBot {
    /// Create a greedy bot with default weights.
    #[must_use]
    pub fn new(side: Side) -> Self {
        Self::with_weights(side, HeuristicWeights::default())
    }

    /// Create a greedy bot with custom weights.
    #[must_use]
    pub fn with_weights(side: Side, weights: HeuristicWeights) -> Self {
        Self { side, weights }
    }

    /// The weights in use.
    #[must_use]
    pub fn weights(&self) -> &HeuristicWeights {
        &self.weights
    }
}

/// Best move for the side to act, if it has one.
pub(crate) fn best_move(
    engine: &RulesEngine,
    side: Side,
    weights: &HeuristicWeights,
) -> Option<(WorkerId, Coord)> {
    let mut best: Option<((WorkerId, Coord), f64)> = None;

    for worker in WorkerId::of(side) {
        for dest in &engine.legal_moves(worker) {
            let score = score_move(engine, worker, dest, weights);
            log::trace!("{} -> {} scores {:.1}", worker, dest, score);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some(((worker, dest), score));
            }
        }
    }

    best.map(|(choice, _)| choice)
}

/// Best build for `builder`, if it has one.
pub(crate) fn best_build(
    engine: &RulesEngine,
    builder: WorkerId,
    weights: &HeuristicWeights,
) -> Option<Coord> {
    let mut best: Option<(Coord, f64)> = None;

    for cell in &engine.legal_builds(builder) {
        let score = score_build(engine, builder, cell, weights);
        log::trace!("{} builds {} scores {:.1}", builder, cell, score);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((cell, score));
        }
    }

    best.map(|(cell, _)| cell)
}

impl Bot for GreedyBot {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn side(&self) -> Side {
        self.side
    }

    fn select_move(&mut self, engine: &RulesEngine) -> Result<(WorkerId, Coord)> {
        expect_move_phase(engine, self.side)?;
        best_move(engine, self.side, &self.weights).ok_or(
            EngineError::InvalidBotInvocation {
                side: self.side,
                reason: "no legal move",
            },
        )
    }

    fn select_build(&mut self, engine: &RulesEngine) -> Result<Coord> {
        let builder = expect_build_phase(engine, self.side)?;
        best_build(engine, builder, &self.weights).ok_or(
            EngineError::InvalidBotInvocation {
                side: self.side,
                reason: "no legal build",
            },
        )
    }
}
