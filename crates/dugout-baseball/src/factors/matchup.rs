// Head-to-head history against today's opponent.

use super::{advantage_label, FactorReading};
use crate::context::{Dataset, GameContext};
use crate::stats::{confidence, rescale, BattingLine, LEAGUE_AVG};
use dugout_core::venues::same_team;

const NATIVE_BOUND: f64 = 2.0;

/// Native-scale matchup score from a batting line against one opponent.
pub fn matchup_score(line: &BattingLine) -> f64 {
    if line.games == 0 {
        return 0.0;
    }
    let ba_score = if line.ab == 0 {
        0.0
    } else {
        (line.avg() - LEAGUE_AVG) * 10.0
    };
    let hr_score = line.hr as f64 * 0.5;
    ((ba_score + hr_score) * confidence(line.games, 10.0)).clamp(-NATIVE_BOUND, NATIVE_BOUND)
}

pub fn analyze(ctx: &GameContext, data: &Dataset) -> FactorReading {
    let line = BattingLine::from_logs(
        data.history_before(ctx.player_id, ctx.date)
            .iter()
            .filter(|l| same_team(&l.opponent, &ctx.opponent)),
    );
    if line.games == 0 {
        return FactorReading::neutral(format!("no history vs {}", ctx.opponent));
    }
    let native = matchup_score(&line);
    FactorReading::new(
        rescale(native, NATIVE_BOUND),
        format!(
            "{}: {:.3} with {} HR in {} games vs {}",
            advantage_label(native),
            line.avg(),
            line.hr,
            line.games,
            ctx.opponent
        ),
    )
}
