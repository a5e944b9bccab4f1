//! Handle-based game hosting.
//!
//! `GameRegistry` owns any number of games and exposes the operations a
//! hosting layer (an HTTP server, a UI) needs, addressed by `GameHandle`.
//! It never decides legality itself; every call is forwarded to the game's
//! `RulesEngine`. Access is synchronous: a host serving several clients must
//! serialize calls per game.
//!
//! ## Example
//!
//! ```
//! use santorini_engine::bots::{BotConfig, BotKind};
//! use santorini_engine::core::{Coord, GameConfig, Side};
//! use santorini_engine::session::{GameRegistry, TurnRequest};
//!
//! let mut registry = GameRegistry::new();
//! let config = GameConfig::default().with_bot(BotConfig::new(BotKind::Greedy, Side::Red));
//! let game = registry.new_game_with(config).unwrap();
//!
//! let request = TurnRequest {
//!     piece: Coord::new(1, 1),
//!     to: Coord::new(0, 0),
//!     build: Coord::new(0, 1),
//! };
//! registry.submit_turn(game, Side::Blue, request).unwrap();
//! let reply = registry.play_bot_turn(game).unwrap();
//!
//! assert_eq!(reply.side, Side::Red);
//! assert_eq!(registry.snapshot(game).unwrap().turn.side, Side::Blue);
//! ```

pub mod game;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::bots::BotConfig;
use crate::core::{Coord, EngineError, GameConfig, Placements, Result, Side};
use crate::rules::{LegalSet, TurnState};

pub use game::{GameSession, Snapshot, TurnRecord, TurnRequest};

/// Opaque game identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameHandle(pub u64);

impl std::fmt::Display for GameHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "game#{}", self.0)
    }
}

/// Registry of hosted games.
#[derive(Debug, Default)]
pub struct GameRegistry {
    games: FxHashMap<GameHandle, GameSession>,
    next_id: u64,
}

impl GameRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a game with the given extent and placements, Blue first, no bot.
    pub fn new_game(&mut self, rows: u8, cols: u8, placements: Placements) -> Result<GameHandle> {
        self.new_game_with(GameConfig::new(rows, cols).with_placements(placements))
    }

    /// Start a game from a full configuration.
    pub fn new_game_with(&mut self, config: GameConfig) -> Result<GameHandle> {
        let session = GameSession::new(config)?;
        let handle = GameHandle(self.next_id);
        self.next_id += 1;

        log::info!(
            "created {} ({}x{}, bot: {})",
            handle,
            session.config().rows,
            session.config().cols,
            session.bot_config().map_or("none", |b| b.kind.name())
        );
        self.games.insert(handle, session);
        Ok(handle)
    }

    /// Look up a game.
    pub fn get(&self, handle: GameHandle) -> Result<&GameSession> {
        self.games.get(&handle).ok_or(EngineError::UnknownGame(handle.0))
    }

    fn get_mut(&mut self, handle: GameHandle) -> Result<&mut GameSession> {
        self.games
            .get_mut(&handle)
            .ok_or(EngineError::UnknownGame(handle.0))
    }

    pub fn legal_moves(&self, handle: GameHandle, side: Side, worker_index: u8) -> Result<LegalSet> {
        Ok(self.get(handle)?.legal_moves(side, worker_index))
    }

    pub fn legal_builds(&self, handle: GameHandle, side: Side, worker_index: u8) -> Result<LegalSet> {
        Ok(self.get(handle)?.legal_builds(side, worker_index))
    }

    pub fn apply_move(
        &mut self,
        handle: GameHandle,
        side: Side,
        worker_index: u8,
        dest: Coord,
    ) -> Result<TurnState> {
        self.get_mut(handle)?.apply_move(side, worker_index, dest)
    }

    pub fn apply_build(&mut self, handle: GameHandle, side: Side, cell: Coord) -> Result<TurnState> {
        self.get_mut(handle)?.apply_build(side, cell)
    }

    /// Apply a whole turn atomically.
    pub fn submit_turn(
        &mut self,
        handle: GameHandle,
        side: Side,
        request: TurnRequest,
    ) -> Result<TurnRecord> {
        self.get_mut(handle)?.submit_turn(side, request)
    }

    /// The attached bot's move choice (worker index, destination), not applied.
    pub fn bot_select_move(&mut self, handle: GameHandle) -> Result<(u8, Coord)> {
        self.get_mut(handle)?.bot_select_move()
    }

    /// The attached bot's build choice, not applied.
    pub fn bot_select_build(&mut self, handle: GameHandle) -> Result<Coord> {
        self.get_mut(handle)?.bot_select_build()
    }

    /// Let the attached bot play its whole turn.
    pub fn play_bot_turn(&mut self, handle: GameHandle) -> Result<TurnRecord> {
        self.get_mut(handle)?.play_bot_turn()
    }

    pub fn attach_bot(&mut self, handle: GameHandle, bot: BotConfig) -> Result<()> {
        let session = self.get_mut(handle)?;
        log::info!("{} now plays {} for {}", handle, bot.kind, bot.side);
        session.attach_bot(bot);
        Ok(())
    }

    pub fn snapshot(&self, handle: GameHandle) -> Result<Snapshot> {
        Ok(self.get(handle)?.snapshot())
    }

    /// Restart a game from its starting configuration.
    pub fn reset(&mut self, handle: GameHandle) -> Result<()> {
        self.get_mut(handle)?.reset()?;
        log::info!("reset {}", handle);
        Ok(())
    }

    /// Drop a game.
    pub fn remove(&mut self, handle: GameHandle) -> Result<()> {
        self.games
            .remove(&handle)
            .map(|_| log::info!("removed {}", handle))
            .ok_or(EngineError::UnknownGame(handle.0))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    /// Handles of all hosted games, in creation order.
    #[must_use]
    pub fn handles(&self) -> Vec<GameHandle> {
        let mut handles: Vec<_> = self.games.keys().copied().collect();
        handles.sort_unstable();
        handles
    }
}
