//! Game registry integration tests.

use santorini_engine::bots::{BotConfig, BotKind};
use santorini_engine::core::{default_placements, Coord, EngineError, GameConfig, Side, SideMap};
use santorini_engine::rules::{Outcome, Phase};
use santorini_engine::session::{GameHandle, GameRegistry, Snapshot, TurnRequest};

fn registry_with_game() -> (GameRegistry, GameHandle) {
    let mut registry = GameRegistry::new();
    let game = registry.new_game(5, 5, default_placements(5, 5)).unwrap();
    (registry, game)
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_new_game_snapshot() {
    let (registry, game) = registry_with_game();
    let snapshot = registry.snapshot(game).unwrap();

    assert_eq!((snapshot.rows, snapshot.cols), (5, 5));
    assert!(snapshot.levels.iter().flatten().all(|&l| l == 0));
    assert!(snapshot.caps.iter().flatten().all(|&c| !c));
    assert_eq!(snapshot.workers[Side::Blue], [Coord::new(1, 1), Coord::new(3, 3)]);
    assert_eq!(snapshot.turn.side, Side::Blue);
    assert_eq!(snapshot.turn.phase, Phase::Move);
    assert_eq!(snapshot.turn_number, 1);
    assert!(snapshot.history.is_empty());
}

#[test]
fn test_custom_placements_and_extent() {
    let mut registry = GameRegistry::new();
    let placements = SideMap::from_values(
        [Coord::new(0, 0), Coord::new(2, 5)],
        [Coord::new(0, 5), Coord::new(2, 0)],
    );
    let game = registry.new_game(3, 6, placements).unwrap();

    let snapshot = registry.snapshot(game).unwrap();
    assert_eq!((snapshot.rows, snapshot.cols), (3, 6));
    assert_eq!(snapshot.workers, placements);
    assert_eq!(registry.legal_moves(game, Side::Blue, 0).unwrap().len(), 3);
}

#[test]
fn test_overlapping_placements_rejected() {
    let mut registry = GameRegistry::new();
    let placements = SideMap::from_values(
        [Coord::new(0, 0), Coord::new(1, 1)],
        [Coord::new(1, 1), Coord::new(2, 2)],
    );
    assert!(matches!(
        registry.new_game(3, 3, placements),
        Err(EngineError::CellOccupied { .. })
    ));
    assert!(registry.is_empty());
}

#[test]
fn test_reset_restores_starting_snapshot() {
    let (mut registry, game) = registry_with_game();
    let start = registry.snapshot(game).unwrap();

    registry.apply_move(game, Side::Blue, 0, Coord::new(0, 0)).unwrap();
    registry.apply_build(game, Side::Blue, Coord::new(0, 1)).unwrap();
    assert_ne!(registry.snapshot(game).unwrap(), start);

    registry.reset(game).unwrap();
    assert_eq!(registry.snapshot(game).unwrap(), start);
}

#[test]
fn test_remove_and_unknown_handle() {
    let (mut registry, game) = registry_with_game();
    let other = registry.new_game_with(GameConfig::new(4, 4)).unwrap();

    registry.remove(game).unwrap();
    assert_eq!(registry.handles(), vec![other]);
    assert_eq!(registry.snapshot(game), Err(EngineError::UnknownGame(game.0)));
    assert_eq!(registry.remove(game), Err(EngineError::UnknownGame(game.0)));
    assert!(registry.snapshot(other).is_ok());
}

#[test]
fn test_games_are_independent() {
    let mut registry = GameRegistry::new();
    let a = registry.new_game_with(GameConfig::default()).unwrap();
    let b = registry.new_game_with(GameConfig::default()).unwrap();

    registry.apply_move(a, Side::Blue, 0, Coord::new(0, 0)).unwrap();

    assert_eq!(registry.snapshot(a).unwrap().turn.phase, Phase::Build);
    assert_eq!(registry.snapshot(b).unwrap().turn.phase, Phase::Move);
}

// =============================================================================
// Turns
// =============================================================================

#[test]
fn test_split_turn_flow() {
    let (mut registry, game) = registry_with_game();

    let moves = registry.legal_moves(game, Side::Blue, 0).unwrap();
    assert!(moves.contains(Coord::new(2, 2)));

    let turn = registry.apply_move(game, Side::Blue, 0, Coord::new(2, 2)).unwrap();
    assert_eq!(turn.phase, Phase::Build);

    let builds = registry.legal_builds(game, Side::Blue, 0).unwrap();
    assert!(builds.contains(Coord::new(1, 1)));
    assert!(!builds.contains(Coord::new(3, 3)));

    let turn = registry.apply_build(game, Side::Blue, Coord::new(1, 1)).unwrap();
    assert_eq!(turn.side, Side::Red);

    // Out of turn
    assert!(matches!(
        registry.apply_move(game, Side::Blue, 1, Coord::new(4, 4)),
        Err(EngineError::IllegalMove { .. })
    ));
}

#[test]
fn test_submit_turn_atomic_failure() {
    let (mut registry, game) = registry_with_game();
    let before = registry.snapshot(game).unwrap();

    let request = TurnRequest {
        piece: Coord::new(1, 1),
        to: Coord::new(1, 2),
        build: Coord::new(1, 3),
    };
    assert!(matches!(
        registry.submit_turn(game, Side::Blue, request),
        Err(EngineError::IllegalBuild { .. })
    ));
    assert_eq!(registry.snapshot(game).unwrap(), before);
}

#[test]
fn test_submit_turn_from_json() {
    let (mut registry, game) = registry_with_game();
    let request: TurnRequest = serde_json::from_str(
        r#"{"piece": {"row": 3, "col": 3}, "to": {"row": 4, "col": 4}, "build": {"row": 4, "col": 3}}"#,
    )
    .unwrap();

    let record = registry.submit_turn(game, Side::Blue, request).unwrap();

    assert_eq!(record.piece, Coord::new(3, 3));
    assert_eq!(record.worker.index, 1);
    assert_eq!(record.build, Some(Coord::new(4, 3)));
    assert_eq!(record.turn.side, Side::Red);
}

// =============================================================================
// Bots
// =============================================================================

#[test]
fn test_human_versus_bot_game() {
    let mut registry = GameRegistry::new();
    let game = registry
        .new_game_with(GameConfig::default().with_bot(BotConfig::new(BotKind::Greedy, Side::Red)))
        .unwrap();

    let request = TurnRequest {
        piece: Coord::new(3, 3),
        to: Coord::new(4, 4),
        build: Coord::new(3, 4),
    };
    registry.submit_turn(game, Side::Blue, request).unwrap();

    let reply = registry.play_bot_turn(game).unwrap();
    assert_eq!(reply.side, Side::Red);
    assert_eq!(reply.turn.outcome, Outcome::InProgress);

    let snapshot = registry.snapshot(game).unwrap();
    assert_eq!(snapshot.turn.side, Side::Blue);
    assert_eq!(snapshot.history.len(), 4);
    assert!(snapshot.workers[Side::Red].contains(&reply.to));
}

#[test]
fn test_bot_select_without_apply() {
    let (mut registry, game) = registry_with_game();
    registry
        .attach_bot(game, BotConfig::new(BotKind::Random, Side::Blue).with_seed(5))
        .unwrap();
    let before = registry.snapshot(game).unwrap();

    let (index, dest) = registry.bot_select_move(game).unwrap();
    assert!(registry.legal_moves(game, Side::Blue, index).unwrap().contains(dest));
    assert_eq!(registry.snapshot(game).unwrap(), before);

    registry.apply_move(game, Side::Blue, index, dest).unwrap();
    let cell = registry.bot_select_build(game).unwrap();
    assert!(registry.legal_builds(game, Side::Blue, index).unwrap().contains(cell));
}

#[test]
fn test_bot_out_of_turn_and_missing() {
    let (mut registry, game) = registry_with_game();
    assert!(matches!(
        registry.play_bot_turn(game),
        Err(EngineError::InvalidBotInvocation { .. })
    ));

    registry
        .attach_bot(game, BotConfig::new(BotKind::Greedy, Side::Red))
        .unwrap();
    assert!(matches!(
        registry.bot_select_move(game),
        Err(EngineError::InvalidBotInvocation { side: Side::Red, .. })
    ));
}

#[test]
fn test_bot_versus_bot_through_registry() {
    let mut registry = GameRegistry::new();
    let game = registry
        .new_game_with(GameConfig::new(4, 4).with_bot(BotConfig::new(BotKind::Greedy, Side::Blue)))
        .unwrap();

    for _ in 0..100 {
        if registry.get(game).unwrap().engine().is_terminal() {
            break;
        }
        let side = registry.snapshot(game).unwrap().turn.side;
        let bot = if side == Side::Blue {
            BotConfig::new(BotKind::Greedy, Side::Blue)
        } else {
            BotConfig::new(BotKind::Random, Side::Red).with_seed(9)
        };
        registry.attach_bot(game, bot).unwrap();
        registry.play_bot_turn(game).unwrap();
    }

    assert!(registry.get(game).unwrap().engine().is_terminal());
}

#[test]
fn test_reset_keeps_bot_and_replays() {
    let mut registry = GameRegistry::new();
    let game = registry
        .new_game_with(GameConfig::default().with_bot(BotConfig::new(BotKind::Random, Side::Blue)))
        .unwrap();

    let first = registry.play_bot_turn(game).unwrap();
    registry.reset(game).unwrap();
    let second = registry.play_bot_turn(game).unwrap();

    assert_eq!(first, second);
}

// =============================================================================
// Serialization
// =============================================================================

#[test]
fn test_snapshot_serde_round_trip() {
    let (mut registry, game) = registry_with_game();
    registry.apply_move(game, Side::Blue, 0, Coord::new(0, 0)).unwrap();
    registry.apply_build(game, Side::Blue, Coord::new(0, 1)).unwrap();

    let snapshot = registry.snapshot(game).unwrap();
    let json = serde_json::to_string(&snapshot).unwrap();
    let back: Snapshot = serde_json::from_str(&json).unwrap();

    assert_eq!(back, snapshot);
    assert_eq!(back.levels[0][1], 1);
}
