// Home-plate umpire's run environment.

use super::FactorReading;
use crate::context::{Dataset, GameContext};
use crate::stats::confidence;

const MIN_GAMES: u32 = 5;

pub fn analyze(ctx: &GameContext, data: &Dataset) -> FactorReading {
    if ctx.umpire.trim().is_empty() {
        return FactorReading::neutral("umpire not announced");
    }
    let ump = data.umpire_runs_before(&ctx.umpire, ctx.date);
    let (Some(ump_rpg), Some(league_rpg)) = (
        ump.per_game(),
        data.league_runs_before(ctx.date).per_game(),
    ) else {
        return FactorReading::neutral(format!("no history for {}", ctx.umpire));
    };
    if ump.games < MIN_GAMES {
        return FactorReading::neutral(format!("{} games for {}", ump.games, ctx.umpire));
    }
    let score = (ump_rpg - league_rpg) * confidence(ump.games as usize, 30.0);
    FactorReading::new(
        score,
        format!(
            "{}: {:.2} R/G vs league {:.2} ({} games)",
            ctx.umpire, ump_rpg, league_rpg, ump.games
        ),
    )
}
