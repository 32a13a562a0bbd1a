// Day/night split.

use super::FactorReading;
use crate::context::{Dataset, GameContext};
use crate::stats::{confidence, BattingLine};
use dugout_core::data::DayNight;

const MIN_SPLIT_GAMES: usize = 10;

pub fn analyze(ctx: &GameContext, data: &Dataset) -> FactorReading {
    let other = match ctx.day_night {
        DayNight::Day => DayNight::Night,
        DayNight::Night => DayNight::Day,
        DayNight::Unknown => return FactorReading::neutral("start time unknown"),
    };

    let mut here = BattingLine::default();
    let mut there = BattingLine::default();
    for log in data.history_before(ctx.player_id, ctx.date) {
        let dn = data.day_night_of(log);
        if dn == ctx.day_night {
            here.add(log);
        } else if dn == other {
            there.add(log);
        }
    }

    let label = match ctx.day_night {
        DayNight::Day => "day",
        _ => "night",
    };
    if here.games >= MIN_SPLIT_GAMES && there.games >= MIN_SPLIT_GAMES {
        let score = (here.avg() - there.avg()) * 5.0 * confidence(here.games, 30.0);
        return FactorReading::new(
            score,
            format!(
                "{:.3} in {label} games vs {:.3} otherwise",
                here.avg(),
                there.avg()
            ),
        );
    }

    let score = if ctx.day_night == DayNight::Day { -0.10 } else { 0.05 };
    FactorReading::new(score, format!("{label} game"))
}
