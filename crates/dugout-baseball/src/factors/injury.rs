// Roster injury status, and form since returning from a long absence.

use super::FactorReading;
use crate::context::{Dataset, GameContext};
use crate::stats::{confidence, rescale, BattingLine};
use chrono::Datelike;
use dugout_core::data::InjuryStatus;

const NATIVE_BOUND: f64 = 2.0;
/// Minimum in-season gap between games treated as an injury absence.
const ABSENCE_DAYS: i64 = 14;
const RECOVERY_WINDOW_DAYS: i64 = 30;

pub fn status_penalty(status: InjuryStatus) -> f64 {
    match status {
        InjuryStatus::Healthy => 0.0,
        InjuryStatus::DayToDay => -0.3,
        InjuryStatus::Questionable => -0.5,
        InjuryStatus::Out => -0.8,
    }
}

/// Native-scale return score. Zero when neither window has a hit.
pub fn return_score(pre_ba: f64, post_ba: f64, days_since: i64, games_since: usize) -> f64 {
    if pre_ba == 0.0 && post_ba == 0.0 {
        return 0.0;
    }
    let recency = (1.0 - days_since as f64 / RECOVERY_WINDOW_DAYS as f64).max(0.3);
    ((post_ba - pre_ba) * 10.0 * recency * confidence(games_since, 5.0))
        .clamp(-NATIVE_BOUND, NATIVE_BOUND)
}

pub fn analyze(ctx: &GameContext, data: &Dataset) -> FactorReading {
    if ctx.injury_status != InjuryStatus::Healthy {
        return FactorReading::new(
            status_penalty(ctx.injury_status),
            format!("listed {}", ctx.injury_status.label()),
        );
    }

    let history = data.history_before(ctx.player_id, ctx.date);
    if history.len() < 10 {
        return FactorReading::neutral("healthy");
    }

    // Latest in-season gap; the off-season is not an injury.
    let return_idx = (1..history.len()).rev().find(|&i| {
        let prev = &history[i - 1];
        let cur = &history[i];
        prev.game_date.year() == cur.game_date.year()
            && (cur.game_date - prev.game_date).num_days() >= ABSENCE_DAYS
    });
    let Some(idx) = return_idx else {
        return FactorReading::neutral("healthy");
    };

    let return_date = history[idx].game_date;
    let days_since = (ctx.date - return_date).num_days();
    if !(0..=RECOVERY_WINDOW_DAYS).contains(&days_since) {
        return FactorReading::neutral("healthy");
    }

    let pre = BattingLine::from_logs(history[idx.saturating_sub(10)..idx].iter());
    let post = BattingLine::from_logs(history[idx..].iter());
    let native = return_score(pre.avg(), post.avg(), days_since, post.games);
    FactorReading::new(
        rescale(native, NATIVE_BOUND),
        format!(
            "returned {return_date}: {:.3} since vs {:.3} before ({} games)",
            post.avg(),
            pre.avg(),
            post.games
        ),
    )
}
