//! Uniform random bot.

use crate::core::{Coord, EngineError, GameRng, Result, Side, WorkerId};
use crate::rules::RulesEngine;

use super::{expect_build_phase, expect_move_phase, Bot};

/// Picks uniformly among the legal moves of both workers, then among the
/// legal builds. Deterministic for a given seed.
#[derive(Clone, Debug)]
pub struct RandomBot {
    side: Side,
    rng: GameRng,
}

impl RandomBot {
    #[must_use]
    pub fn new(side: Side, seed: u64) -> Self {
        Self {
            side,
            rng: GameRng::new(seed),
        }
    }
}

impl Bot for RandomBot {
    fn name(&self) -> &'static str {
        "random"
    }

    fn side(&self) -> Side {
        self.side
    }

    fn select_move(&mut self, engine: &RulesEngine) -> Result<(WorkerId, Coord)> {
        expect_move_phase(engine, self.side)?;

        let candidates: Vec<(WorkerId, Coord)> = WorkerId::of(self.side)
            .flat_map(|w| engine.legal_moves(w).iter().map(move |d| (w, d)).collect::<Vec<_>>())
            .collect();

        self.rng
            .choose(&candidates)
            .copied()
            .ok_or(EngineError::InvalidBotInvocation {
                side: self.side,
                reason: "no legal move",
            })
    }

    fn select_build(&mut self, engine: &RulesEngine) -> Result<Coord> {
        let builder = expect_build_phase(engine, self.side)?;
        let builds = engine.legal_builds(builder);

        self.rng
            .choose(builds.as_slice())
            .copied()
            .ok_or(EngineError::InvalidBotInvocation {
                side: self.side,
                reason: "no legal build",
            })
    }
}
