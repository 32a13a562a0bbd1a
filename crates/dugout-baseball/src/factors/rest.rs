// Days of rest before the game.

use super::FactorReading;
use crate::context::{Dataset, GameContext};

pub fn rest_score(rest_days: i64) -> f64 {
    match rest_days {
        1 => 0.15,
        0 => -0.10,
        d if d >= 3 => -0.15,
        _ => 0.0,
    }
}

pub fn analyze(ctx: &GameContext, data: &Dataset) -> FactorReading {
    let Some(previous) = data.history_before(ctx.player_id, ctx.date).last() else {
        return FactorReading::neutral("no previous game");
    };
    let rest = (ctx.date - previous.game_date).num_days() - 1;
    FactorReading::new(
        rest_score(rest),
        format!("{rest} day(s) of rest since {}", previous.game_date),
    )
}
