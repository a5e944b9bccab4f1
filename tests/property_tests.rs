//! Property-based tests over random games.
//!
//! Each seed drives a random playout on a random board; the properties
//! check the rules engine against the movement, build and outcome rules
//! at every step.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use santorini_engine::core::{Action, Coord, GameConfig, GameRng, Side, WorkerId, MAX_LEVEL};
use santorini_engine::rules::{EngineState, Phase, RulesEngine};
use santorini_engine::session::GameSession;

/// Upper bound on actions in any game on a board of this size.
fn action_bound(config: &GameConfig) -> usize {
    usize::from(config.rows) * usize::from(config.cols) * 4 * 2 + 2
}

/// Play one uniformly random legal action.
fn random_step(engine: &mut RulesEngine, rng: &mut GameRng) -> Option<Action> {
    let actions = engine.legal_actions();
    let action = *rng.choose(&actions)?;
    engine.apply(&action).unwrap();
    Some(action)
}

fn total_height(engine: &RulesEngine) -> u32 {
    let grid = engine.grid();
    grid.coords()
        .map(|c| {
            let cell = grid.cell(c).unwrap();
            u32::from(cell.level) + u32::from(cell.capped)
        })
        .sum()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Every listed move obeys the movement rule, and nothing else is listed.
    #[test]
    fn prop_legal_moves_match_rule(seed in any::<u64>(), rows in 2u8..=6, cols in 2u8..=6) {
        let config = GameConfig::new(rows, cols);
        let mut engine = RulesEngine::new(&config).unwrap();
        let mut rng = GameRng::new(seed);

        for _ in 0..action_bound(&config) {
            for worker in WorkerId::all() {
                let from = engine.workers().position_of(worker);
                let from_level = engine.level_of(worker);
                let moves = engine.legal_moves(worker);

                for dest in engine.grid().coords() {
                    let cell = engine.grid().cell(dest).unwrap();
                    let expected = from.is_adjacent(dest)
                        && !cell.capped
                        && cell.level <= from_level + 1
                        && !engine.workers().is_occupied(dest);
                    prop_assert_eq!(moves.contains(dest), expected);
                }
            }

            if random_step(&mut engine, &mut rng).is_none() {
                break;
            }
        }
    }

    /// Each build raises exactly one cell by one step, and moves change no cell.
    #[test]
    fn prop_builds_raise_one_cell(seed in any::<u64>(), rows in 2u8..=6, cols in 2u8..=6) {
        let config = GameConfig::new(rows, cols);
        let mut engine = RulesEngine::new(&config).unwrap();
        let mut rng = GameRng::new(seed);

        for _ in 0..action_bound(&config) {
            let before = engine.grid().clone();
            let height = total_height(&engine);
            let Some(action) = random_step(&mut engine, &mut rng) else {
                break;
            };

            match action {
                Action::Move { .. } => {
                    prop_assert_eq!(engine.grid(), &before);
                }
                Action::Build { cell } => {
                    prop_assert_eq!(total_height(&engine), height + 1);
                    let old = before.cell(cell).unwrap();
                    let new = engine.grid().cell(cell).unwrap();
                    prop_assert!(!old.capped);
                    if old.level < MAX_LEVEL {
                        prop_assert_eq!(new.level, old.level + 1);
                    } else {
                        prop_assert!(new.capped);
                    }
                }
            }
        }
    }

    /// Random games always end, and the outcome agrees with the position.
    #[test]
    fn prop_games_end_consistently(seed in any::<u64>(), rows in 2u8..=6, cols in 2u8..=6) {
        let config = GameConfig::new(rows, cols);
        let mut engine = RulesEngine::new(&config).unwrap();
        let mut rng = GameRng::new(seed);

        let mut last = None;
        for _ in 0..action_bound(&config) {
            match random_step(&mut engine, &mut rng) {
                Some(action) => last = Some(action),
                None => break,
            }
        }

        prop_assert!(engine.is_terminal());
        prop_assert!(engine.legal_actions().is_empty());
        match engine.state() {
            EngineState::Won(side) => {
                let Some(Action::Move { worker, dest }) = last else {
                    return Err(TestCaseError::fail("a win must come from a move"));
                };
                prop_assert_eq!(worker.side, side);
                prop_assert_eq!(engine.grid().elevation(dest).unwrap(), MAX_LEVEL);
            }
            EngineState::Stalemate { loser } => {
                prop_assert!(!engine.has_any_move(loser));
            }
            state => {
                prop_assert!(false, "game still running: {:?}", state);
            }
        }
    }

    /// Rejected actions leave the game exactly as it was.
    #[test]
    fn prop_illegal_actions_change_nothing(seed in any::<u64>(), steps in 0usize..40) {
        let config = GameConfig::default();
        let mut engine = RulesEngine::new(&config).unwrap();
        let mut rng = GameRng::new(seed);
        for _ in 0..steps {
            if random_step(&mut engine, &mut rng).is_none() {
                break;
            }
        }

        let grid = engine.grid().clone();
        let workers = engine.workers().clone();
        let state = engine.state();
        let history = engine.history().len();

        for worker in WorkerId::all() {
            for dest in engine.grid().coords() {
                let legal = engine.state() == EngineState::AwaitingMove(worker.side)
                    && engine.legal_moves(worker).contains(dest);
                if !legal {
                    prop_assert!(engine.apply_move(worker.side, worker, dest).is_err());
                }
            }
        }
        for side in Side::ALL {
            for cell in engine.grid().coords() {
                let legal = matches!(
                    engine.state(),
                    EngineState::AwaitingBuild { side: s, worker } if s == side && engine.legal_builds(worker).contains(cell)
                );
                if !legal {
                    prop_assert!(engine.apply_build(side, cell).is_err());
                }
            }
        }
        prop_assert!(engine.apply_move(Side::Blue, WorkerId::new(Side::Blue, 2), Coord::new(0, 0)).is_err());

        prop_assert_eq!(engine.grid(), &grid);
        prop_assert_eq!(engine.workers(), &workers);
        prop_assert_eq!(engine.state(), state);
        prop_assert_eq!(engine.history().len(), history);
    }

    /// The phase reported to callers tracks the worker that must build.
    #[test]
    fn prop_builder_is_the_mover(seed in any::<u64>()) {
        let config = GameConfig::default();
        let mut engine = RulesEngine::new(&config).unwrap();
        let mut rng = GameRng::new(seed);

        for _ in 0..action_bound(&config) {
            let Some(action) = random_step(&mut engine, &mut rng) else {
                break;
            };
            if let (Action::Move { worker, .. }, Some(builder)) = (action, engine.builder()) {
                prop_assert_eq!(builder, worker);
                prop_assert_eq!(engine.turn_state().phase, Phase::Build);
            }
        }
    }

    /// Reset returns a session to its starting snapshot.
    #[test]
    fn prop_reset_restores_start(seed in any::<u64>(), steps in 1usize..30) {
        let mut session = GameSession::new(GameConfig::default()).unwrap();
        let start = session.snapshot();
        let mut rng = GameRng::new(seed);

        for _ in 0..steps {
            let actions = session.engine().legal_actions();
            let Some(&action) = rng.choose(&actions) else {
                break;
            };
            let side = session.engine().side_to_act().unwrap();
            match action {
                Action::Move { worker, dest } => {
                    session.apply_move(side, worker.index, dest).unwrap();
                }
                Action::Build { cell } => {
                    session.apply_build(side, cell).unwrap();
                }
            }
        }

        session.reset().unwrap();
        prop_assert_eq!(session.snapshot(), start);
    }
}
