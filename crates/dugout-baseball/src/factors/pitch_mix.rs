// Batter's results against each pitch type the opposing starter throws.

use super::FactorReading;
use crate::context::{Dataset, GameContext};
use crate::stats::{confidence, LEAGUE_AVG};
use dugout_core::data::{BatterPitchSplit, PitchUsage};

/// Usage-weighted edge over the arsenal. `None` when no pitch in the arsenal
/// has a matching batter split.
pub fn pitch_mix_score(arsenal: &[PitchUsage], splits: &[BatterPitchSplit]) -> Option<f64> {
    let mut total = 0.0;
    let mut matched = false;
    for pitch in arsenal {
        let Some(split) = splits
            .iter()
            .find(|s| s.pitch_type.eq_ignore_ascii_case(&pitch.pitch_type))
        else {
            continue;
        };
        // Usage may be recorded as a percentage.
        let usage = if pitch.usage > 1.0 {
            pitch.usage / 100.0
        } else {
            pitch.usage
        };
        total += usage * (split.avg - LEAGUE_AVG) * 10.0 * confidence(split.pa as usize, 30.0);
        matched = true;
    }
    matched.then_some(total)
}

pub fn analyze(ctx: &GameContext, data: &Dataset) -> FactorReading {
    let Some(pitcher_id) = ctx.opposing_pitcher_id else {
        return FactorReading::neutral("no probable pitcher");
    };
    let arsenal = data.arsenal_for(pitcher_id);
    if arsenal.is_empty() {
        return FactorReading::neutral("no arsenal data");
    }
    match pitch_mix_score(arsenal, data.pitch_splits_for(ctx.player_id)) {
        Some(score) => FactorReading::new(
            score,
            format!("{score:+.2} over {} pitch types", arsenal.len()),
        ),
        None => FactorReading::neutral("no pitch-type splits"),
    }
}
