// Weighted linear combination of factor scores.

use dugout_core::factor::{Factor, FactorScores};
use dugout_core::weights::FactorWeights;

/// Σ score × weight over every factor.
pub fn combine(scores: &FactorScores, weights: &FactorWeights) -> f64 {
    Factor::ALL
        .iter()
        .map(|&f| scores.get(f) * weights.get(f))
        .sum()
}

/// Per-factor contributions, largest magnitude first.
pub fn contributions(scores: &FactorScores, weights: &FactorWeights) -> Vec<(Factor, f64)> {
    let mut out: Vec<(Factor, f64)> = Factor::ALL
        .iter()
        .map(|&f| (f, scores.get(f) * weights.get(f)))
        .collect();
    out.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_is_dot_product() {
        let mut scores = FactorScores::default();
        scores.set(Factor::Wind, 1.0);
        scores.set(Factor::Matchup, -0.5);
        let weights = FactorWeights::default();
        let expected = 0.09 - 0.5 * 0.14;
        assert!((combine(&scores, &weights) - expected).abs() < 1e-12);
    }

    #[test]
    fn neutral_scores_combine_to_zero() {
        assert_eq!(combine(&FactorScores::default(), &FactorWeights::default()), 0.0);
    }

    #[test]
    fn contributions_sorted_by_magnitude() {
        let mut scores = FactorScores::default();
        scores.set(Factor::Wind, 0.1);
        scores.set(Factor::Injury, -1.0);
        let c = contributions(&scores, &FactorWeights::default());
        assert_eq!(c.len(), Factor::COUNT);
        assert_eq!(c[0].0, Factor::Injury);
        assert!((c[0].1 + 0.11).abs() < 1e-12);
        let total: f64 = c.iter().map(|(_, v)| v).sum();
        assert!((total - combine(&scores, &FactorWeights::default())).abs() < 1e-12);
    }
}
