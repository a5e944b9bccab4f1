//! The authoritative rules engine.
//!
//! `RulesEngine` owns the grid, the worker set and the turn state machine.
//! Callers query legal cells, then apply one action at a time. Every apply
//! validates first and commits second, so a rejected action leaves the
//! engine untouched.
//!
//! ## Move Rule
//!
//! A worker may step to any Moore neighbour that is in bounds, unoccupied,
//! uncapped, and at most one level above its current level. Stepping down
//! any number of levels is allowed. Stepping onto level 3 wins at once.
//!
//! ## Build Rule
//!
//! After moving, the same worker builds on a Moore neighbour that is in
//! bounds, unoccupied and uncapped. The cell it just left normally
//! qualifies; a worker left with no build loses.
//!
//! ## Stalemate
//!
//! After a build, the next side must have at least one legal move over both
//! of its workers. If it has none, it loses.
//!
//! ```
//! use santorini_engine::core::{Coord, GameConfig, Side, WorkerId};
//! use santorini_engine::rules::{EngineState, RulesEngine};
//!
//! let mut engine = RulesEngine::new(&GameConfig::default()).unwrap();
//! let worker = WorkerId::new(Side::Blue, 0);
//!
//! engine.apply_move(Side::Blue, worker, Coord::new(0, 0)).unwrap();
//! engine.apply_build(Side::Blue, Coord::new(0, 1)).unwrap();
//!
//! assert_eq!(engine.state(), EngineState::AwaitingMove(Side::Red));
//! assert_eq!(engine.grid().elevation(Coord::new(0, 1)).unwrap(), 1);
//! ```

use im::Vector;

use crate::core::{
    Action, ActionRecord, Coord, EngineError, GameConfig, Grid, Result, Side, WorkerId, WorkerSet,
    MAX_LEVEL,
};

use super::legal::LegalSet;
use super::turn::{EngineState, TurnState};

/// The game rules state machine for one game.
///
/// Cloning is cheap: the grid is a small flat vector and the history is a
/// persistent `im::Vector`. Search bots work on clones.
#[derive(Clone, Debug)]
pub struct RulesEngine {
    grid: Grid,
    workers: WorkerSet,
    state: EngineState,
    turn_number: u32,
    history: Vector<ActionRecord>,
}

impl RulesEngine {
    /// Build a fresh game from a configuration.
    pub fn new(config: &GameConfig) -> Result<Self> {
        let grid = Grid::new(config.rows, config.cols)?;
        let workers = WorkerSet::place(&grid, &config.placements)?;
        Ok(Self::from_parts(grid, workers, config.starting_side))
    }

    /// Build a game from an arbitrary position.
    ///
    /// If `to_move` has no legal move the game starts in stalemate.
    #[must_use]
    pub fn from_parts(grid: Grid, workers: WorkerSet, to_move: Side) -> Self {
        let mut engine = Self {
            grid,
            workers,
            state: EngineState::AwaitingMove(to_move),
            turn_number: 1,
            history: Vector::new(),
        };

        if !engine.has_any_move(to_move) {
            log::debug!("{} starts without a legal move", to_move);
            engine.state = EngineState::Stalemate { loser: to_move };
        }

        engine
    }

    // === Queries ===

    /// The elevation grid.
    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Worker positions.
    #[must_use]
    pub fn workers(&self) -> &WorkerSet {
        &self.workers
    }

    /// Current state machine value.
    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Caller-facing turn view.
    #[must_use]
    pub fn turn_state(&self) -> TurnState {
        self.state.into()
    }

    /// Turn number, starting at 1. Advances when play passes to the other side.
    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Actions applied so far, oldest first.
    #[must_use]
    pub fn history(&self) -> &Vector<ActionRecord> {
        &self.history
    }

    /// Whether the game has ended.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// The side expected to act, if any.
    #[must_use]
    pub fn side_to_act(&self) -> Option<Side> {
        self.state.side_to_act()
    }

    /// The worker that must build, during a build phase.
    #[must_use]
    pub fn builder(&self) -> Option<WorkerId> {
        match self.state {
            EngineState::AwaitingBuild { worker, .. } => Some(worker),
            _ => None,
        }
    }

    /// Elevation under a worker.
    #[must_use]
    pub fn level_of(&self, worker: WorkerId) -> u8 {
        // Workers are always in bounds
        self.grid
            .elevation(self.workers.position_of(worker))
            .unwrap_or(0)
    }

    /// Whether moving `worker` to `dest` climbs onto level 3.
    #[must_use]
    pub fn is_winning_move(&self, worker: WorkerId, dest: Coord) -> bool {
        self.level_of(worker) < MAX_LEVEL && self.grid.elevation(dest) == Ok(MAX_LEVEL)
    }

    // === Legality ===

    /// Legal destinations for a worker from its current cell.
    ///
    /// Pure position query: it does not check whose turn it is.
    #[must_use]
    pub fn legal_moves(&self, worker: WorkerId) -> LegalSet {
        if !worker.is_valid() {
            return LegalSet::new();
        }
        let from = self.workers.position_of(worker);
        let from_level = self.level_of(worker);

        self.grid
            .neighbors(from)
            .filter(|&dest| {
                let Ok(cell) = self.grid.cell(dest) else {
                    return false;
                };
                !cell.capped && cell.level <= from_level + 1 && !self.workers.is_occupied(dest)
            })
            .collect()
    }

    /// Legal build cells around a worker's current cell.
    ///
    /// Pure position query: it does not check whose turn it is.
    #[must_use]
    pub fn legal_builds(&self, worker: WorkerId) -> LegalSet {
        if !worker.is_valid() {
            return LegalSet::new();
        }
        let at = self.workers.position_of(worker);

        self.grid
            .neighbors(at)
            .filter(|&cell| {
                self.grid.is_capped(cell) == Ok(false) && !self.workers.is_occupied(cell)
            })
            .collect()
    }

    /// Whether either worker of a side can move.
    #[must_use]
    pub fn has_any_move(&self, side: Side) -> bool {
        WorkerId::of(side).any(|w| !self.legal_moves(w).is_empty())
    }

    /// Every legal action in the current state, in enumeration order.
    ///
    /// Moves are listed worker 0 first, destinations in Moore order. Empty
    /// once the game is over.
    #[must_use]
    pub fn legal_actions(&self) -> Vec<Action> {
        match self.state {
            EngineState::AwaitingMove(side) => WorkerId::of(side)
                .flat_map(|worker| {
                    self.legal_moves(worker)
                        .iter()
                        .map(move |dest| Action::Move { worker, dest })
                        .collect::<Vec<_>>()
                })
                .collect(),
            EngineState::AwaitingBuild { worker, .. } => self
                .legal_builds(worker)
                .iter()
                .map(|cell| Action::Build { cell })
                .collect(),
            EngineState::Won(_) | EngineState::Stalemate { .. } => Vec::new(),
        }
    }

    // === Transitions ===

    /// Move a worker of `side` to `dest`.
    ///
    /// Climbing onto level 3 wins immediately; otherwise the engine waits for
    /// that worker's build.
    pub fn apply_move(&mut self, side: Side, worker: WorkerId, dest: Coord) -> Result<TurnState> {
        if self.is_terminal() {
            return Err(EngineError::GameAlreadyTerminal);
        }
        let illegal = |reason| EngineError::IllegalMove { worker, dest, reason };

        if self.state != EngineState::AwaitingMove(side) {
            return Err(illegal("not awaiting a move from this side"));
        }
        if worker.side != side {
            return Err(illegal("worker belongs to the other side"));
        }
        if !worker.is_valid() {
            return Err(illegal("no such worker"));
        }
        if !self.legal_moves(worker).contains(dest) {
            return Err(illegal("destination is not a legal move"));
        }

        let wins = self.is_winning_move(worker, dest);

        // Validated: commit
        self.workers.relocate(worker, dest)?;
        self.history
            .push_back(ActionRecord::new(side, Action::Move { worker, dest }, self.turn_number));

        let level = self.grid.elevation(dest)?;
        if wins {
            log::debug!("{} moved to {} on level {} and wins", worker, dest, level);
            self.state = EngineState::Won(side);
        } else if self.legal_builds(worker).is_empty() {
            log::debug!("{} moved to {} and cannot build", worker, dest);
            self.state = EngineState::Stalemate { loser: side };
        } else {
            log::debug!("{} moved to {} (level {})", worker, dest, level);
            self.state = EngineState::AwaitingBuild { side, worker };
        }

        Ok(self.turn_state())
    }

    /// Build at `cell` with the worker that just moved.
    ///
    /// Hands the turn to the other side, or ends the game in stalemate if the
    /// other side cannot move.
    pub fn apply_build(&mut self, side: Side, cell: Coord) -> Result<TurnState> {
        if self.is_terminal() {
            return Err(EngineError::GameAlreadyTerminal);
        }
        let illegal = |reason| EngineError::IllegalBuild { side, cell, reason };

        let worker = match self.state {
            EngineState::AwaitingBuild { side: s, worker } if s == side => worker,
            _ => return Err(illegal("not awaiting a build from this side")),
        };
        if !self.legal_builds(worker).contains(cell) {
            return Err(illegal("cell is not a legal build"));
        }

        // Validated: commit
        let built = self.grid.build(cell)?;
        self.history
            .push_back(ActionRecord::new(side, Action::Build { cell }, self.turn_number));
        log::debug!(
            "{} built at {} (level {}{})",
            worker,
            cell,
            built.level,
            if built.capped { ", capped" } else { "" }
        );

        let next = side.other();
        if self.has_any_move(next) {
            self.state = EngineState::AwaitingMove(next);
            self.turn_number += 1;
        } else {
            log::debug!("{} has no legal move and loses", next);
            self.state = EngineState::Stalemate { loser: next };
        }

        Ok(self.turn_state())
    }

    /// Apply an action for the side to act.
    pub fn apply(&mut self, action: &Action) -> Result<TurnState> {
        let side = self.side_to_act().ok_or(EngineError::GameAlreadyTerminal)?;
        match *action {
            Action::Move { worker, dest } => self.apply_move(side, worker, dest),
            Action::Build { cell } => self.apply_build(side, cell),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SideMap;
    use crate::rules::turn::Outcome;

    const B0: WorkerId = WorkerId::new(Side::Blue, 0);
    const B1: WorkerId = WorkerId::new(Side::Blue, 1);
    const R0: WorkerId = WorkerId::new(Side::Red, 0);

    fn engine_with(levels: &[Vec<u8>], blue: [Coord; 2], red: [Coord; 2], to_move: Side) -> RulesEngine {
        let grid = Grid::from_levels(levels).unwrap();
        let workers = WorkerSet::place(&grid, &SideMap::from_values(blue, red)).unwrap();
        RulesEngine::from_parts(grid, workers, to_move)
    }

    fn flat5() -> Vec<Vec<u8>> {
        vec![vec![0; 5]; 5]
    }

    #[test]
    fn test_open_centre_has_eight_moves() {
        let engine = engine_with(
            &flat5(),
            [Coord::new(2, 2), Coord::new(0, 0)],
            [Coord::new(4, 4), Coord::new(4, 0)],
            Side::Blue,
        );
        let moves = engine.legal_moves(B0);
        assert_eq!(moves.len(), 8);
        assert_eq!(moves.as_slice()[0], Coord::new(1, 1));
        assert_eq!(moves.as_slice()[7], Coord::new(3, 3));
    }

    #[test]
    fn test_moves_respect_climb_limit_and_caps() {
        let levels = vec![
            vec![2, 1, 0],
            vec![4, 0, 0],
            vec![0, 0, 0],
        ];
        let engine = engine_with(
            &levels,
            [Coord::new(1, 1), Coord::new(2, 2)],
            [Coord::new(0, 2), Coord::new(2, 0)],
            Side::Blue,
        );
        let moves = engine.legal_moves(B0);
        // (0,0) too high, (1,0) capped, (0,2) (2,2) (2,0) occupied
        assert_eq!(
            moves.as_slice(),
            &[Coord::new(0, 1), Coord::new(1, 2), Coord::new(2, 1)]
        );
    }

    #[test]
    fn test_moving_down_any_amount() {
        let levels = vec![
            vec![0, 0, 0],
            vec![0, 2, 0],
            vec![0, 0, 0],
        ];
        let mut engine = engine_with(
            &levels,
            [Coord::new(1, 1), Coord::new(2, 2)],
            [Coord::new(0, 2), Coord::new(2, 0)],
            Side::Blue,
        );
        assert!(engine.legal_moves(B0).contains(Coord::new(0, 0)));
        engine.apply_move(Side::Blue, B0, Coord::new(0, 0)).unwrap();
        assert_eq!(engine.level_of(B0), 0);
    }

    #[test]
    fn test_fully_occupied_board_starts_in_stalemate() {
        let engine = engine_with(
            &[vec![3, 0], vec![0, 0]],
            [Coord::new(0, 0), Coord::new(1, 1)],
            [Coord::new(0, 1), Coord::new(1, 0)],
            Side::Blue,
        );
        assert!(engine.legal_moves(B0).is_empty());
        assert_eq!(engine.state(), EngineState::Stalemate { loser: Side::Blue });
        assert!(engine.legal_actions().is_empty());
    }

    #[test]
    fn test_move_then_build_passes_turn() {
        let mut engine = engine_with(
            &flat5(),
            [Coord::new(2, 2), Coord::new(0, 0)],
            [Coord::new(4, 4), Coord::new(4, 0)],
            Side::Blue,
        );

        let turn = engine.apply_move(Side::Blue, B0, Coord::new(2, 3)).unwrap();
        assert_eq!(turn.phase, crate::rules::Phase::Build);
        assert_eq!(engine.builder(), Some(B0));

        let turn = engine.apply_build(Side::Blue, Coord::new(1, 3)).unwrap();
        assert_eq!(engine.grid().elevation(Coord::new(1, 3)).unwrap(), 1);
        assert_eq!(turn.side, Side::Red);
        assert_eq!(engine.state(), EngineState::AwaitingMove(Side::Red));
        assert_eq!(engine.turn_number(), 2);
        assert_eq!(engine.history().len(), 2);
    }

    #[test]
    fn test_winning_move_skips_build() {
        let mut levels = flat5();
        levels[0][0] = 2;
        levels[0][1] = 3;
        let mut engine = engine_with(
            &levels,
            [Coord::new(0, 0), Coord::new(4, 4)],
            [Coord::new(2, 2), Coord::new(4, 0)],
            Side::Blue,
        );

        let turn = engine.apply_move(Side::Blue, B0, Coord::new(0, 1)).unwrap();
        assert_eq!(turn.outcome, Outcome::Won { winner: Side::Blue });
        assert_eq!(engine.state(), EngineState::Won(Side::Blue));
        assert!(engine.legal_actions().is_empty());
        assert_eq!(
            engine.apply_build(Side::Blue, Coord::new(1, 1)),
            Err(EngineError::GameAlreadyTerminal)
        );
    }

    #[test]
    fn test_illegal_move_leaves_state_unchanged() {
        let mut engine = RulesEngine::new(&GameConfig::default()).unwrap();
        let before_workers = engine.workers().clone();

        // Out of reach
        let err = engine.apply_move(Side::Blue, B0, Coord::new(4, 4)).unwrap_err();
        assert!(matches!(err, EngineError::IllegalMove { .. }));

        // Wrong side
        assert!(engine.apply_move(Side::Red, R0, Coord::new(0, 3)).is_err());

        // Other side's worker
        assert!(engine.apply_move(Side::Blue, R0, Coord::new(0, 3)).is_err());

        // Invalid index
        assert!(engine
            .apply_move(Side::Blue, WorkerId::new(Side::Blue, 2), Coord::new(0, 0))
            .is_err());

        // Build before moving
        assert!(matches!(
            engine.apply_build(Side::Blue, Coord::new(0, 0)),
            Err(EngineError::IllegalBuild { .. })
        ));

        assert_eq!(engine.workers(), &before_workers);
        assert_eq!(engine.state(), EngineState::AwaitingMove(Side::Blue));
        assert!(engine.history().is_empty());
    }

    #[test]
    fn test_illegal_build_leaves_state_unchanged() {
        let mut engine = RulesEngine::new(&GameConfig::default()).unwrap();
        engine.apply_move(Side::Blue, B1, Coord::new(4, 4)).unwrap();
        let grid_before = engine.grid().clone();

        // Not adjacent
        assert!(engine.apply_build(Side::Blue, Coord::new(0, 0)).is_err());
        // Wrong side
        assert!(engine.apply_build(Side::Red, Coord::new(3, 4)).is_err());

        assert_eq!(engine.grid(), &grid_before);
        assert_eq!(engine.builder(), Some(B1));
    }

    #[test]
    fn test_build_on_vacated_cell() {
        let mut engine = RulesEngine::new(&GameConfig::default()).unwrap();
        engine.apply_move(Side::Blue, B0, Coord::new(0, 0)).unwrap();
        assert!(engine.legal_builds(B0).contains(Coord::new(1, 1)));
        engine.apply_build(Side::Blue, Coord::new(1, 1)).unwrap();
        assert_eq!(engine.grid().elevation(Coord::new(1, 1)).unwrap(), 1);
    }

    #[test]
    fn test_build_caps_level_three() {
        let mut levels = flat5();
        levels[0][1] = 3;
        let mut engine = engine_with(
            &levels,
            [Coord::new(1, 1), Coord::new(4, 4)],
            [Coord::new(3, 3), Coord::new(4, 0)],
            Side::Blue,
        );
        engine.apply_move(Side::Blue, B0, Coord::new(0, 0)).unwrap();
        engine.apply_build(Side::Blue, Coord::new(0, 1)).unwrap();

        let cell = engine.grid().cell(Coord::new(0, 1)).unwrap();
        assert_eq!(cell.level, 3);
        assert!(cell.capped);
        assert!(!engine.legal_builds(B0).contains(Coord::new(0, 1)));
    }

    #[test]
    fn test_level_three_to_level_three_does_not_win() {
        let mut levels = flat5();
        levels[0][0] = 3;
        levels[0][1] = 3;
        let mut engine = engine_with(
            &levels,
            [Coord::new(0, 0), Coord::new(4, 4)],
            [Coord::new(3, 3), Coord::new(4, 0)],
            Side::Blue,
        );
        assert!(!engine.is_winning_move(B0, Coord::new(0, 1)));

        let turn = engine.apply_move(Side::Blue, B0, Coord::new(0, 1)).unwrap();
        assert_eq!(turn.outcome, Outcome::InProgress);
        assert_eq!(engine.state(), EngineState::AwaitingBuild { side: Side::Blue, worker: B0 });
    }

    #[test]
    fn test_one_stuck_worker_is_not_stalemate() {
        // Red 0 can only climb to (1,1); raising it seals that worker alone
        let levels = vec![
            vec![0, 4, 0, 0],
            vec![4, 1, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ];
        let mut engine = engine_with(
            &levels,
            [Coord::new(2, 2), Coord::new(3, 3)],
            [Coord::new(0, 0), Coord::new(3, 0)],
            Side::Blue,
        );
        assert!(engine.legal_moves(R0).contains(Coord::new(1, 1)));
        engine.apply_move(Side::Blue, B0, Coord::new(2, 1)).unwrap();
        engine.apply_build(Side::Blue, Coord::new(1, 1)).unwrap();
        assert_eq!(engine.state(), EngineState::AwaitingMove(Side::Red));
        assert!(engine.legal_moves(R0).is_empty());
        assert!(engine.has_any_move(Side::Red));
    }

    #[test]
    fn test_stalemate_when_both_workers_stuck() {
        // Red 0 is already stuck; Red 1 depends on (3,1)
        let levels = vec![
            vec![0, 4, 0, 0],
            vec![4, 4, 0, 0],
            vec![4, 4, 0, 0],
            vec![0, 1, 0, 0],
        ];
        let mut engine = engine_with(
            &levels,
            [Coord::new(2, 3), Coord::new(3, 3)],
            [Coord::new(0, 0), Coord::new(3, 0)],
            Side::Blue,
        );
        assert!(engine.has_any_move(Side::Red));

        engine.apply_move(Side::Blue, B0, Coord::new(2, 2)).unwrap();
        // Raising (3,1) to level 2 seals Red 1
        let turn = engine.apply_build(Side::Blue, Coord::new(3, 1)).unwrap();

        assert_eq!(turn.outcome, Outcome::Stalemate { loser: Side::Red });
        assert_eq!(engine.state().winner(), Some(Side::Blue));
        assert_eq!(
            engine.apply_move(Side::Red, R0, Coord::new(0, 1)),
            Err(EngineError::GameAlreadyTerminal)
        );
    }

    #[test]
    fn test_legal_actions_order() {
        let engine = RulesEngine::new(&GameConfig::default()).unwrap();
        let actions = engine.legal_actions();
        // B0 at (1,1): 8 free neighbours; B1 at (3,3): 8 free neighbours
        assert_eq!(actions.len(), 16);
        assert_eq!(
            actions[0],
            Action::Move {
                worker: B0,
                dest: Coord::new(0, 0)
            }
        );
        assert!(matches!(actions[8], Action::Move { worker, .. } if worker == B1));
    }

    #[test]
    fn test_apply_dispatches_for_side_to_act() {
        let mut engine = RulesEngine::new(&GameConfig::default()).unwrap();
        let first = engine.legal_actions()[0];
        engine.apply(&first).unwrap();
        let build = engine.legal_actions()[0];
        assert!(!build.is_move());
        engine.apply(&build).unwrap();
        assert_eq!(engine.side_to_act(), Some(Side::Red));
    }
}
