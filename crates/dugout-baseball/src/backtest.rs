// Replay history through the factor model and measure how well the combined
// score tracks actual fantasy output.

use crate::combiner::combine;
use crate::context::{Dataset, Role};
use crate::factors::score_all;
use crate::metrics::{mae, pearson, rmse, z_normalize};
use crate::points::fantasy_points;
use chrono::{Datelike, NaiveDate};
use dugout_core::config::ScoringConfig;
use dugout_core::factor::FactorScores;
use dugout_core::weights::FactorWeights;
use tracing::debug;

/// One completed game: the factor scores known before it, and the fantasy
/// points scored in it.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestSample {
    pub date: NaiveDate,
    pub game_pk: u64,
    pub scores: FactorScores,
    pub actual: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BacktestResult {
    pub games: usize,
    /// Pearson correlation between predictions and normalized actuals.
    pub accuracy: f64,
    pub mae: f64,
    pub rmse: f64,
}

/// Samples for every completed game the player logged in
/// `start_year..=end_year`. Pitchers yield none.
pub fn build_samples(
    data: &Dataset,
    player_id: u64,
    start_year: i32,
    end_year: i32,
    scoring: &ScoringConfig,
) -> Vec<BacktestSample> {
    if data.role_of(player_id) == Role::Pitcher {
        debug!("player {player_id} is a pitcher, no hitting backtest");
        return Vec::new();
    }

    let mut samples = Vec::new();
    for log in data.logs_for(player_id) {
        let year = log.game_date.year();
        if year < start_year || year > end_year {
            continue;
        }
        if !data.game(log.game_pk).is_some_and(|g| g.is_final()) {
            continue;
        }
        let Some(ctx) = data.context_for_log(log) else {
            continue;
        };
        samples.push(BacktestSample {
            date: log.game_date,
            game_pk: log.game_pk,
            scores: score_all(&ctx, data),
            actual: fantasy_points(log, scoring),
        });
    }
    debug!("player {player_id}: {} backtest samples", samples.len());
    samples
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

/// Samples with actuals already normalized, ready for repeated evaluation
/// under different weights.
#[derive(Debug, Clone, Default)]
pub struct PreparedSamples {
    scores: Vec<FactorScores>,
    actuals: Vec<f64>,
}

impl PreparedSamples {
    pub fn new(samples: &[BacktestSample]) -> Self {
        let actuals: Vec<f64> = samples.iter().map(|s| s.actual).collect();
        PreparedSamples {
            scores: samples.iter().map(|s| s.scores).collect(),
            actuals: z_normalize(&actuals),
        }
    }

    /// Pool several players' samples, each normalized against its own
    /// distribution.
    pub fn pooled<'a>(groups: impl IntoIterator<Item = &'a [BacktestSample]>) -> Self {
        let mut pooled = PreparedSamples::default();
        for group in groups {
            let prepared = PreparedSamples::new(group);
            pooled.scores.extend(prepared.scores);
            pooled.actuals.extend(prepared.actuals);
        }
        pooled
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn evaluate(&self, weights: &FactorWeights) -> BacktestResult {
        let predictions: Vec<f64> = self.scores.iter().map(|s| combine(s, weights)).collect();
        BacktestResult {
            games: self.len(),
            accuracy: pearson(&predictions, &self.actuals),
            mae: mae(&predictions, &self.actuals),
            rmse: rmse(&predictions, &self.actuals),
        }
    }
}

pub fn evaluate(samples: &[BacktestSample], weights: &FactorWeights) -> BacktestResult {
    PreparedSamples::new(samples).evaluate(weights)
}
