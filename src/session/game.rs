//! A single hosted game.

use serde::{Deserialize, Serialize};

use crate::bots::{Bot, BotConfig};
use crate::core::{ActionRecord, Coord, EngineError, GameConfig, Placements, Result, Side, WorkerId};
use crate::rules::{LegalSet, RulesEngine, TurnState};

/// Serializable view of a game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub rows: u8,
    pub cols: u8,

    /// Levels, row-major.
    pub levels: Vec<Vec<u8>>,

    /// Caps, row-major.
    pub caps: Vec<Vec<bool>>,

    /// Worker cells per side, worker 0 first.
    pub workers: Placements,

    pub turn: TurnState,
    pub turn_number: u32,
    pub history: Vec<ActionRecord>,
}

/// A whole turn in one request: the worker standing on `piece` moves to
/// `to`, then builds at `build`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRequest {
    pub piece: Coord,
    pub to: Coord,
    pub build: Coord,
}

/// What a completed turn did.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub side: Side,
    pub worker: WorkerId,

    /// Cell the worker left.
    pub piece: Coord,
    pub to: Coord,

    /// `None` when the move ended the game.
    pub build: Option<Coord>,

    /// State after the turn.
    pub turn: TurnState,
}

/// Rules engine plus its starting configuration and optional bot.
pub struct GameSession {
    config: GameConfig,
    engine: RulesEngine,
    bot: Option<Box<dyn Bot>>,
}

impl std::fmt::Debug for GameSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameSession")
            .field("config", &self.config)
            .field("state", &self.engine.state())
            .field("bot", &self.bot.as_ref().map(|b| b.name()))
            .finish()
    }
}

impl GameSession {
    /// Start a game from a configuration.
    pub fn new(config: GameConfig) -> Result<Self> {
        let engine = RulesEngine::new(&config)?;
        let bot = config.bot.as_ref().map(BotConfig::build);
        Ok(Self { config, engine, bot })
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[must_use]
    pub fn engine(&self) -> &RulesEngine {
        &self.engine
    }

    /// Configuration of the attached bot, if any.
    #[must_use]
    pub fn bot_config(&self) -> Option<&BotConfig> {
        self.config.bot.as_ref()
    }

    /// Rebuild the game from its starting configuration. The bot is rebuilt
    /// too, so seeded bots replay identically.
    pub fn reset(&mut self) -> Result<()> {
        *self = Self::new(self.config.clone())?;
        Ok(())
    }

    /// Attach or replace the bot. It is kept across resets.
    pub fn attach_bot(&mut self, bot: BotConfig) {
        self.bot = Some(bot.build());
        self.config.bot = Some(bot);
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let grid = self.engine.grid();
        Snapshot {
            rows: grid.rows(),
            cols: grid.cols(),
            levels: grid.levels(),
            caps: grid.caps(),
            workers: *self.engine.workers().positions(),
            turn: self.engine.turn_state(),
            turn_number: self.engine.turn_number(),
            history: self.engine.history().iter().copied().collect(),
        }
    }

    // === Human side ===

    #[must_use]
    pub fn legal_moves(&self, side: Side, index: u8) -> LegalSet {
        self.engine.legal_moves(WorkerId::new(side, index))
    }

    #[must_use]
    pub fn legal_builds(&self, side: Side, index: u8) -> LegalSet {
        self.engine.legal_builds(WorkerId::new(side, index))
    }

    pub fn apply_move(&mut self, side: Side, index: u8, dest: Coord) -> Result<TurnState> {
        self.engine.apply_move(side, WorkerId::new(side, index), dest)
    }

    pub fn apply_build(&mut self, side: Side, cell: Coord) -> Result<TurnState> {
        self.engine.apply_build(side, cell)
    }

    /// Apply a move and its build as one unit. Nothing changes unless both
    /// are legal. The build is skipped when the move wins.
    pub fn submit_turn(&mut self, side: Side, request: TurnRequest) -> Result<TurnRecord> {
        let worker = self
            .engine
            .workers()
            .occupant_at(request.piece)
            .filter(|w| w.side == side)
            .ok_or(EngineError::IllegalMove {
                worker: WorkerId::new(side, 0),
                dest: request.to,
                reason: "no worker of this side on the selected cell",
            })?;

        let mut next = self.engine.clone();
        let turn = next.apply_move(side, worker, request.to)?;
        let (build, turn) = if turn.is_terminal() {
            (None, turn)
        } else {
            (Some(request.build), next.apply_build(side, request.build)?)
        };

        self.engine = next;
        log::debug!("{} played {} -> {}", side, request.piece, request.to);

        Ok(TurnRecord {
            side,
            worker,
            piece: request.piece,
            to: request.to,
            build,
            turn,
        })
    }

    // === Bot side ===

    fn no_bot(&self) -> EngineError {
        let side = self
            .engine
            .side_to_act()
            .unwrap_or(self.config.starting_side.other());
        EngineError::InvalidBotInvocation {
            side,
            reason: "no bot attached",
        }
    }

    /// The bot's move choice, as worker index and destination. Not applied.
    pub fn bot_select_move(&mut self) -> Result<(u8, Coord)> {
        let missing = self.no_bot();
        let bot = self.bot.as_mut().ok_or(missing)?;
        let (worker, dest) = bot.select_move(&self.engine)?;
        Ok((worker.index, dest))
    }

    /// The bot's build choice. Not applied.
    pub fn bot_select_build(&mut self) -> Result<Coord> {
        let missing = self.no_bot();
        let bot = self.bot.as_mut().ok_or(missing)?;
        bot.select_build(&self.engine)
    }

    /// Let the bot play a whole turn: select its move, then its build unless
    /// the move won. Both are applied on a copy and committed together.
    pub fn play_bot_turn(&mut self) -> Result<TurnRecord> {
        let missing = self.no_bot();
        let bot = self.bot.as_mut().ok_or(missing)?;
        let side = bot.side();

        let (worker, to) = bot.select_move(&self.engine)?;
        let piece = self.engine.workers().position_of(worker);

        let mut next = self.engine.clone();
        let mut turn = next.apply_move(side, worker, to)?;
        let mut build = None;
        if !turn.is_terminal() {
            let cell = bot.select_build(&next)?;
            turn = next.apply_build(side, cell)?;
            build = Some(cell);
        }

        self.engine = next;
        log::debug!("{} bot played {} -> {}", side, piece, to);

        Ok(TurnRecord {
            side,
            worker,
            piece,
            to,
            build,
            turn,
        })
    }
}
