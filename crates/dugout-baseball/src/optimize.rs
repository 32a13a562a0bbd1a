// Factor-weight tuning by differential evolution (best/1/bin).
//
// Candidates live in the unit cube and are scaled into the configured bounds
// for evaluation. Updating is deferred: every trial of a generation is built
// from the previous generation before any replacement happens.

use crate::backtest::{BacktestSample, PreparedSamples};
use crate::metrics::{series_stats, SeriesStats};
use dugout_core::config::OptimizerConfig;
use dugout_core::factor::Factor;
use dugout_core::weights::FactorWeights;
use tinyrand::{Rand, Seeded, StdRand};
use tracing::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum OptimizeError {
    #[error("invalid optimizer config: {0}")]
    InvalidConfig(String),

    #[error("need at least 2 samples to optimize, got {0}")]
    TooFewSamples(usize),
}

#[derive(Clone, Debug)]
pub struct DeConfig {
    pub lower: f64,
    pub upper: f64,
    pub max_iter: usize,
    /// Population multiplier: the population holds `pop_size × dims` members.
    pub pop_size: usize,
    pub tol: f64,
    pub mutation_min: f64,
    pub mutation_max: f64,
    pub recombination: f64,
    pub seed: u64,
}

impl DeConfig {
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.lower >= self.upper {
            return Err(OptimizeError::InvalidConfig(format!(
                "lower bound {} must be below upper bound {}",
                self.lower, self.upper
            )));
        }
        if self.pop_size == 0 || self.max_iter == 0 {
            return Err(OptimizeError::InvalidConfig(
                "pop_size and max_iter must be positive".into(),
            ));
        }
        if !(0.0..=2.0).contains(&self.mutation_min)
            || !(self.mutation_min..=2.0).contains(&self.mutation_max)
        {
            return Err(OptimizeError::InvalidConfig(format!(
                "mutation range [{}, {}] must lie within [0, 2]",
                self.mutation_min, self.mutation_max
            )));
        }
        if !(0.0..=1.0).contains(&self.recombination) {
            return Err(OptimizeError::InvalidConfig(format!(
                "recombination {} must be within [0, 1]",
                self.recombination
            )));
        }
        if self.tol < 0.0 {
            return Err(OptimizeError::InvalidConfig("tol must be non-negative".into()));
        }
        Ok(())
    }
}

impl From<&OptimizerConfig> for DeConfig {
    fn from(c: &OptimizerConfig) -> Self {
        DeConfig {
            lower: c.lower_bound,
            upper: c.upper_bound,
            max_iter: c.max_iter,
            pop_size: c.pop_size,
            tol: c.tol,
            mutation_min: c.mutation_min,
            mutation_max: c.mutation_max,
            recombination: c.recombination,
            seed: c.seed,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeOutcome {
    pub best: Vec<f64>,
    pub energy: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
}

fn uniform(rand: &mut StdRand) -> f64 {
    rand.next_u64() as f64 / u64::MAX as f64
}

fn index_below(rand: &mut StdRand, n: usize) -> usize {
    (rand.next_u64() % n as u64) as usize
}

fn shuffle(rand: &mut StdRand, values: &mut [usize]) {
    for i in (1..values.len()).rev() {
        let j = index_below(rand, i + 1);
        values.swap(i, j);
    }
}

/// Latin hypercube sample of `n` points in the `dims`-dimensional unit cube:
/// each dimension is cut into `n` equal strata with one point per stratum.
fn latin_hypercube(rand: &mut StdRand, n: usize, dims: usize) -> Vec<Vec<f64>> {
    let mut population = vec![vec![0.0; dims]; n];
    let mut strata: Vec<usize> = (0..n).collect();
    for d in 0..dims {
        shuffle(rand, &mut strata);
        for (member, &stratum) in population.iter_mut().zip(&strata) {
            member[d] = (stratum as f64 + uniform(rand)) / n as f64;
        }
    }
    population
}

/// Minimize `objective` over `dims` parameters, each within the config bounds.
pub fn differential_evolution(
    config: &DeConfig,
    dims: usize,
    mut objective: impl FnMut(&[f64]) -> f64,
) -> Result<DeOutcome, OptimizeError> {
    config.validate()?;
    let mut rand = StdRand::seed(config.seed);
    let n = (config.pop_size * dims).max(5);
    let span = config.upper - config.lower;
    let scale =
        |unit: &[f64]| -> Vec<f64> { unit.iter().map(|u| config.lower + u * span).collect() };

    let mut population = latin_hypercube(&mut rand, n, dims);
    let mut energies: Vec<f64> = population.iter().map(|m| objective(&scale(m))).collect();
    let mut evaluations = n;
    let mut best = argmin(&energies);

    let mut iterations = 0;
    let mut converged = false;
    while iterations < config.max_iter {
        iterations += 1;
        let mutation = config.mutation_min
            + uniform(&mut rand) * (config.mutation_max - config.mutation_min);

        let mut trials = Vec::with_capacity(n);
        for i in 0..n {
            let (r0, r1) = pick_two(&mut rand, n, i);
            let fill_point = index_below(&mut rand, dims);
            let mut trial = population[i].clone();
            for d in 0..dims {
                if d == fill_point || uniform(&mut rand) < config.recombination {
                    trial[d] = population[best][d]
                        + mutation * (population[r0][d] - population[r1][d]);
                }
            }
            for gene in trial.iter_mut() {
                if !(0.0..=1.0).contains(gene) {
                    *gene = uniform(&mut rand);
                }
            }
            trials.push(trial);
        }

        for (i, trial) in trials.into_iter().enumerate() {
            let energy = objective(&scale(&trial));
            evaluations += 1;
            if energy < energies[i] {
                population[i] = trial;
                energies[i] = energy;
            }
        }
        best = argmin(&energies);

        let SeriesStats { mean, stdev: sd } = series_stats(&energies);
        debug!(
            "generation {iterations}: best {:.5}, mean {:.5}, sd {:.5}",
            energies[best], mean, sd
        );
        if sd <= config.tol * mean.abs() {
            converged = true;
            break;
        }
    }

    Ok(DeOutcome {
        best: scale(&population[best]),
        energy: energies[best],
        iterations,
        evaluations,
        converged,
    })
}

fn argmin(values: &[f64]) -> usize {
    values
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.total_cmp(b.1))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Two distinct member indices, both different from `exclude`.
fn pick_two(rand: &mut StdRand, n: usize, exclude: usize) -> (usize, usize) {
    let mut r0 = index_below(rand, n);
    while r0 == exclude {
        r0 = index_below(rand, n);
    }
    let mut r1 = index_below(rand, n);
    while r1 == exclude || r1 == r0 {
        r1 = index_below(rand, n);
    }
    (r0, r1)
}

// ---------------------------------------------------------------------------
// Weight optimization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct OptimizeOutcome {
    /// Normalized to sum to 1.
    pub weights: FactorWeights,
    pub accuracy: f64,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
}

fn optimize_prepared(
    prepared: &PreparedSamples,
    config: &DeConfig,
) -> Result<OptimizeOutcome, OptimizeError> {
    if prepared.len() < 2 {
        return Err(OptimizeError::TooFewSamples(prepared.len()));
    }
    let outcome = differential_evolution(config, Factor::COUNT, |values| {
        -prepared.evaluate(&FactorWeights::from_slice(values)).accuracy
    })?;
    let weights = FactorWeights::from_slice(&outcome.best).normalized();
    let accuracy = prepared.evaluate(&weights).accuracy;
    info!(
        "optimized over {} games in {} generations ({} evaluations): accuracy {:.4}",
        prepared.len(),
        outcome.iterations,
        outcome.evaluations,
        accuracy
    );
    Ok(OptimizeOutcome {
        weights,
        accuracy,
        iterations: outcome.iterations,
        evaluations: outcome.evaluations,
        converged: outcome.converged,
    })
}

/// Weights maximizing one player's backtest accuracy.
pub fn optimize_weights(
    samples: &[BacktestSample],
    config: &DeConfig,
) -> Result<OptimizeOutcome, OptimizeError> {
    optimize_prepared(&PreparedSamples::new(samples), config)
}

/// One weight vector for several players, each player's actuals normalized
/// separately before pooling.
pub fn optimize_global(
    samples_by_player: &[Vec<BacktestSample>],
    config: &DeConfig,
) -> Result<OptimizeOutcome, OptimizeError> {
    let prepared = PreparedSamples::pooled(samples_by_player.iter().map(|s| s.as_slice()));
    optimize_prepared(&prepared, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dugout_core::factor::FactorScores;

    fn config() -> DeConfig {
        DeConfig::from(&OptimizerConfig::default())
    }

    #[test]
    fn latin_hypercube_covers_each_stratum() {
        let mut rand = StdRand::seed(7);
        let pop = latin_hypercube(&mut rand, 8, 3);
        for d in 0..3 {
            let mut strata: Vec<usize> = pop.iter().map(|m| (m[d] * 8.0) as usize).collect();
            strata.sort();
            assert_eq!(strata, (0..8).collect::<Vec<_>>());
        }
    }

    #[test]
    fn finds_minimum_of_sphere() {
        let cfg = DeConfig {
            max_iter: 100,
            pop_size: 10,
            tol: 0.0,
            ..config()
        };
        let outcome = differential_evolution(&cfg, 3, |x| {
            x.iter().map(|v| (v - 0.1).powi(2)).sum()
        })
        .unwrap();
        for v in &outcome.best {
            assert!((v - 0.1).abs() < 0.01, "got {v}");
            assert!((cfg.lower..=cfg.upper).contains(v));
        }
        assert_eq!(outcome.iterations, 100);
        assert!(!outcome.converged);
        assert_eq!(outcome.evaluations, 30 + 100 * 30);
    }

    #[test]
    fn deterministic_for_seed() {
        let f = |x: &[f64]| x.iter().map(|v| (v - 0.2).abs()).sum::<f64>();
        let a = differential_evolution(&config(), 4, f).unwrap();
        let b = differential_evolution(&config(), 4, f).unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn converges_on_flat_objective() {
        let outcome = differential_evolution(&config(), 2, |_| 1.0).unwrap();
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 1);
    }

    #[test]
    fn rejects_bad_bounds() {
        let cfg = DeConfig {
            lower: 0.5,
            upper: 0.1,
            ..config()
        };
        assert!(matches!(
            differential_evolution(&cfg, 2, |_| 0.0),
            Err(OptimizeError::InvalidConfig(_))
        ));
    }

    fn tracking_samples() -> Vec<BacktestSample> {
        (0..20)
            .map(|i| {
                let mut scores = FactorScores::default();
                scores.set(Factor::Matchup, (i as f64 - 10.0) / 10.0);
                scores.set(Factor::Wind, if i % 2 == 0 { 1.0 } else { -1.0 });
                BacktestSample {
                    date: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap() + chrono::Duration::days(i),
                    game_pk: i as u64,
                    scores,
                    actual: i as f64,
                }
            })
            .collect()
    }

    #[test]
    fn optimized_weights_favor_the_informative_factor() {
        let cfg = DeConfig {
            max_iter: 30,
            pop_size: 2,
            ..config()
        };
        let outcome = optimize_weights(&tracking_samples(), &cfg).unwrap();
        assert!((outcome.weights.sum() - 1.0).abs() < 1e-9);
        assert!(outcome.weights.get(Factor::Matchup) > outcome.weights.get(Factor::Wind));
        assert!(outcome.accuracy > 0.8, "accuracy {}", outcome.accuracy);
    }

    #[test]
    fn global_pools_players() {
        let cfg = DeConfig {
            max_iter: 5,
            pop_size: 1,
            ..config()
        };
        let groups = vec![tracking_samples(), tracking_samples()];
        let outcome = optimize_global(&groups, &cfg).unwrap();
        assert!((outcome.weights.sum() - 1.0).abs() < 1e-9);

        assert!(matches!(
            optimize_weights(&tracking_samples()[..1], &cfg),
            Err(OptimizeError::TooFewSamples(1))
        ));
    }
}
