//! Game configuration.
//!
//! A `GameConfig` fully describes a starting position: grid extent, worker
//! placements, the side that moves first and, optionally, the bot that plays
//! one of the sides. Resetting a game rebuilds it from its config.
//!
//! ```
//! use santorini_engine::bots::{BotConfig, BotKind};
//! use santorini_engine::core::{GameConfig, Side};
//!
//! let config = GameConfig::new(5, 5)
//!     .with_starting_side(Side::Red)
//!     .with_bot(BotConfig::new(BotKind::Greedy, Side::Red));
//!
//! assert_eq!(config.rows, 5);
//! assert_eq!(config.starting_side, Side::Red);
//! ```

use serde::{Deserialize, Serialize};

use super::side::Side;
use super::workers::{default_placements, Placements};
use crate::bots::BotConfig;

/// Complete starting configuration of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Number of rows.
    pub rows: u8,

    /// Number of columns.
    pub cols: u8,

    /// Starting cells per side, worker 0 first.
    pub placements: Placements,

    /// Side that makes the first move.
    pub starting_side: Side,

    /// Automated opponent, if any.
    #[serde(default)]
    pub bot: Option<BotConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(5, 5)
    }
}

impl GameConfig {
    /// Create a configuration with default placements for the extent.
    ///
    /// Extents are validated when the game is built.
    #[must_use]
    pub fn new(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            placements: default_placements(rows, cols),
            starting_side: Side::Blue,
            bot: None,
        }
    }

    /// Use caller-supplied placements.
    #[must_use]
    pub fn with_placements(mut self, placements: Placements) -> Self {
        self.placements = placements;
        self
    }

    /// Set the side that moves first.
    #[must_use]
    pub fn with_starting_side(mut self, side: Side) -> Self {
        self.starting_side = side;
        self
    }

    /// Attach a bot.
    #[must_use]
    pub fn with_bot(mut self, bot: BotConfig) -> Self {
        self.bot = Some(bot);
        self
    }
}
