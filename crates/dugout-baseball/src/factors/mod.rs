// Factor analyzers.
//
// Each analyzer turns a game context plus the player's history into a score
// in [-1, 1] from the hitter's point of view, and a short human-readable
// detail for the report. Missing data always yields a neutral 0.

pub mod defense;
pub mod home_away;
pub mod injury;
pub mod lineup;
pub mod matchup;
pub mod park;
pub mod pitch_mix;
pub mod platoon;
pub mod recent_form;
pub mod rest;
pub mod temperature;
pub mod time_of_day;
pub mod umpire;
pub mod wind;

use crate::context::{Dataset, GameContext};
use dugout_core::factor::{clamp_unit, Factor, FactorScores};

#[derive(Debug, Clone, PartialEq)]
pub struct FactorReading {
    pub score: f64,
    pub detail: String,
}

impl FactorReading {
    pub fn new(score: f64, detail: impl Into<String>) -> Self {
        FactorReading {
            score: clamp_unit(score),
            detail: detail.into(),
        }
    }

    pub fn neutral(detail: impl Into<String>) -> Self {
        FactorReading {
            score: 0.0,
            detail: detail.into(),
        }
    }
}

/// Run one analyzer.
pub fn analyze(factor: Factor, ctx: &GameContext, data: &Dataset) -> FactorReading {
    match factor {
        Factor::Wind => wind::analyze(ctx),
        Factor::Matchup => matchup::analyze(ctx, data),
        Factor::HomeAway => home_away::analyze(ctx, data),
        Factor::Platoon => platoon::analyze(ctx, data),
        Factor::ParkFactors => park::analyze(ctx, data),
        Factor::RestDay => rest::analyze(ctx, data),
        Factor::Injury => injury::analyze(ctx, data),
        Factor::Umpire => umpire::analyze(ctx, data),
        Factor::Temperature => temperature::analyze(ctx),
        Factor::PitchMix => pitch_mix::analyze(ctx, data),
        Factor::LineupPosition => lineup::analyze(ctx),
        Factor::TimeOfDay => time_of_day::analyze(ctx, data),
        Factor::DefensivePositions => defense::analyze(ctx, data),
        Factor::RecentForm => recent_form::analyze(ctx, data),
    }
}

/// Every analyzer, in `Factor::ALL` order.
pub fn analyze_all(ctx: &GameContext, data: &Dataset) -> Vec<(Factor, FactorReading)> {
    Factor::ALL
        .into_iter()
        .map(|f| (f, analyze(f, ctx, data)))
        .collect()
}

pub fn score_all(ctx: &GameContext, data: &Dataset) -> FactorScores {
    let mut scores = FactorScores::default();
    for (factor, reading) in analyze_all(ctx, data) {
        scores.set(factor, reading.score);
    }
    scores
}

/// Label for a score on a symmetric native scale of ±2, shared by the wind
/// and matchup analyzers.
pub fn advantage_label(native: f64) -> &'static str {
    if native >= 1.5 {
        "VERY FAVORABLE"
    } else if native >= 0.5 {
        "FAVORABLE"
    } else if native >= -0.5 {
        "NEUTRAL"
    } else if native >= -1.5 {
        "UNFAVORABLE"
    } else {
        "VERY UNFAVORABLE"
    }
}
