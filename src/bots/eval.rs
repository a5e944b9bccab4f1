//! Heuristic scoring shared by the bots.
//!
//! ## Candidate Scores
//!
//! `score_move` and `score_build` rate a single candidate for the side to
//! act. The greedy bot picks the best one; greedy rollouts in MCTS reuse them.
//!
//! ## Static Evaluation
//!
//! `evaluate` rates a whole position from one side's point of view. Minimax
//! calls it at the horizon, MCTS at its rollout depth limit.
//!
//! All terms are linear in `HeuristicWeights`, so tuning never changes which
//! actions are legal, only which one is preferred.

use serde::{Deserialize, Serialize};

use crate::core::{Coord, Grid, Side, WorkerId, WorkerSet, MAX_LEVEL};
use crate::rules::RulesEngine;

/// Score of a decided position. Larger than any heuristic total.
pub const DECISIVE_SCORE: f64 = 1.0e6;

/// Weights of the heuristic terms.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeuristicWeights {
    /// Moving onto level 3. Dominates every other move term.
    pub win: f64,

    /// Per level of the destination.
    pub elevation: f64,

    /// Per level gained by the move (negative when stepping down).
    pub climb: f64,

    /// Per step closer to the opponent's highest worker.
    pub proximity: f64,

    /// Penalty per opponent winning cell the follow-up build cannot cap.
    pub exposure: f64,

    /// Capping a level-3 cell next to an opponent on level 2.
    pub block: f64,

    /// Penalty for raising a cell to 3 next to an opponent on level 2.
    pub danger: f64,

    /// Raising a cell to 3 next to an own level-2 worker, out of the
    /// opponent's reach.
    pub setup: f64,

    /// Per new level of a build the builder can climb later.
    pub support: f64,

    /// Per legal move, in static evaluation.
    pub mobility: f64,
}

impl Default for HeuristicWeights {
    fn default() -> Self {
        Self {
            win: 1000.0,
            elevation: 10.0,
            climb: 5.0,
            proximity: 2.0,
            exposure: 60.0,
            block: 80.0,
            danger: 100.0,
            setup: 30.0,
            support: 3.0,
            mobility: 1.0,
        }
    }
}

impl HeuristicWeights {
    /// Set the win weight.
    #[must_use]
    pub fn with_win(mut self, win: f64) -> Self {
        self.win = win;
        self
    }

    /// Set the proximity weight.
    #[must_use]
    pub fn with_proximity(mut self, proximity: f64) -> Self {
        self.proximity = proximity;
        self
    }

    /// Set the exposure penalty.
    #[must_use]
    pub fn with_exposure(mut self, exposure: f64) -> Self {
        self.exposure = exposure;
        self
    }
}

// =============================================================================
// Position Helpers
// =============================================================================

fn level_at(grid: &Grid, coord: Coord) -> u8 {
    grid.elevation(coord).unwrap_or(0)
}

/// Whether `worker` could step onto a free uncapped level-3 cell right now.
#[must_use]
pub fn can_win_from(grid: &Grid, workers: &WorkerSet, worker: WorkerId) -> bool {
    let at = workers.position_of(worker);
    level_at(grid, at) == MAX_LEVEL - 1
        && grid.neighbors(at).any(|n| {
            matches!(grid.cell(n), Ok(cell) if cell.level == MAX_LEVEL && !cell.capped)
                && !workers.is_occupied(n)
        })
}

/// Number of `side`'s workers that could win on their next move.
#[must_use]
pub fn threat_count(grid: &Grid, workers: &WorkerSet, side: Side) -> usize {
    WorkerId::of(side)
        .filter(|&w| can_win_from(grid, workers, w))
        .count()
}

/// The highest worker of `side`; the lower index wins ties.
#[must_use]
pub fn highest_worker(grid: &Grid, workers: &WorkerSet, side: Side) -> WorkerId {
    let mut best = WorkerId::new(side, 0);
    for (worker, at) in workers.workers_of(side) {
        if level_at(grid, at) > level_at(grid, workers.position_of(best)) {
            best = worker;
        }
    }
    best
}

/// Distinct free level-3 cells some worker of `side` could step onto next.
fn winning_cells(grid: &Grid, workers: &WorkerSet, side: Side) -> Vec<Coord> {
    let mut cells = Vec::new();
    for (_, at) in workers.workers_of(side) {
        if level_at(grid, at) != MAX_LEVEL - 1 {
            continue;
        }
        for n in grid.neighbors(at) {
            let open = matches!(grid.cell(n), Ok(cell) if cell.level == MAX_LEVEL && !cell.capped);
            if open && !workers.is_occupied(n) && !cells.contains(&n) {
                cells.push(n);
            }
        }
    }
    cells
}

/// Opponent winning cells left open after a builder standing on `builder_at`
/// caps at most one of them.
#[must_use]
pub fn undeniable_threats(grid: &Grid, workers: &WorkerSet, opponent: Side, builder_at: Coord) -> usize {
    let cells = winning_cells(grid, workers, opponent);
    let deniable = cells.iter().any(|&c| c.is_adjacent(builder_at));
    cells.len() - usize::from(deniable)
}

fn level2_neighbours(grid: &Grid, workers: &WorkerSet, side: Side, cell: Coord) -> usize {
    workers
        .workers_of(side)
        .filter(|&(_, at)| at.is_adjacent(cell) && level_at(grid, at) == MAX_LEVEL - 1)
        .count()
}

// =============================================================================
// Candidate Scores
// =============================================================================

/// Score moving `worker` to `dest` in the engine's current position.
#[must_use]
pub fn score_move(engine: &RulesEngine, worker: WorkerId, dest: Coord, w: &HeuristicWeights) -> f64 {
    let grid = engine.grid();
    let workers = engine.workers();
    let from = workers.position_of(worker);
    let from_level = level_at(grid, from);
    let dest_level = level_at(grid, dest);

    if engine.is_winning_move(worker, dest) {
        return w.win;
    }

    let opponent = worker.side.other();
    let target = workers.position_of(highest_worker(grid, workers, opponent));
    let closer = f64::from(from.chebyshev(target)) - f64::from(dest.chebyshev(target));

    let mut after = workers.clone();
    let exposed = match after.relocate(worker, dest) {
        Ok(()) => undeniable_threats(grid, &after, opponent, dest),
        Err(_) => 0,
    };

    w.elevation * f64::from(dest_level)
        + w.climb * (f64::from(dest_level) - f64::from(from_level))
        + w.proximity * closer
        - w.exposure * exposed as f64
}

/// Score building at `cell` with `builder` in the engine's current position.
#[must_use]
pub fn score_build(engine: &RulesEngine, builder: WorkerId, cell: Coord, w: &HeuristicWeights) -> f64 {
    let grid = engine.grid();
    let workers = engine.workers();
    let side = builder.side;
    let level = level_at(grid, cell);
    let opponent_near = level2_neighbours(grid, workers, side.other(), cell) > 0;

    let mut score = 0.0;

    if level == MAX_LEVEL {
        // Capping
        if opponent_near {
            score += w.block;
        }
        return score;
    }

    let new_level = level + 1;
    if new_level == MAX_LEVEL {
        if opponent_near {
            score -= w.danger;
        } else if level2_neighbours(grid, workers, side, cell) > 0 {
            score += w.setup;
        }
    }

    let builder_level = level_at(grid, workers.position_of(builder));
    if new_level <= builder_level + 1 {
        score += w.support * f64::from(new_level);
    }

    score
}

// =============================================================================
// Static Evaluation
// =============================================================================

/// Evaluate a position for `side`. Positive favours `side`.
///
/// Decided games score `±DECISIVE_SCORE`. Otherwise the score sums height,
/// mobility and standing win threats, each as own minus opponent's. A threat
/// held by the side about to move counts as a decided game.
#[must_use]
pub fn evaluate(engine: &RulesEngine, side: Side, w: &HeuristicWeights) -> f64 {
    if let Some(winner) = engine.state().winner() {
        return if winner == side {
            DECISIVE_SCORE
        } else {
            -DECISIVE_SCORE
        };
    }

    let grid = engine.grid();
    let workers = engine.workers();

    if let Some(to_move) = engine.state().side_to_act() {
        let awaiting_move = engine.builder().is_none();
        if awaiting_move && threat_count(grid, workers, to_move) > 0 {
            let sign = if to_move == side { 1.0 } else { -1.0 };
            return sign * DECISIVE_SCORE / 2.0;
        }
    }

    let side_total = |s: Side| -> f64 {
        let height: f64 = workers
            .workers_of(s)
            .map(|(_, at)| f64::from(level_at(grid, at)))
            .sum();
        let mobility: usize = WorkerId::of(s).map(|wk| engine.legal_moves(wk).len()).sum();
        w.elevation * height
            + w.mobility * mobility as f64
            + w.setup * threat_count(grid, workers, s) as f64
    };

    side_total(side) - side_total(side.other())
}
