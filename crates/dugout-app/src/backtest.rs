// Backtest suite: replay each player's history under their current weights,
// optionally search for better weights and save them.

use crate::dataset::{data_dir, load_dataset, weight_store};
use anyhow::{Context, Result};
use dugout_baseball::backtest::{
    build_samples, evaluate, BacktestResult, BacktestSample, PreparedSamples,
};
use dugout_baseball::context::{Dataset, Role};
use dugout_baseball::optimize::{optimize_global, optimize_weights, DeConfig, OptimizeOutcome};
use dugout_core::config::Config;
use dugout_core::data::roster::load_latest_roster;
use dugout_core::weights::WeightStore;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Default)]
pub struct BacktestOptions {
    /// One player by name; otherwise every hitter on the latest roster.
    pub player: Option<String>,
    pub optimize: bool,
    pub save: bool,
    /// Optimize one weight vector across all players instead of per player.
    pub global: bool,
}

#[derive(Debug, Clone)]
pub struct PlayerBacktest {
    pub player_name: String,
    pub games: usize,
    pub baseline: Option<BacktestResult>,
    pub optimized: Option<OptimizeOutcome>,
    /// Why the player was not backtested.
    pub skipped: Option<String>,
}

impl PlayerBacktest {
    fn skipped(player_name: &str, games: usize, reason: impl Into<String>) -> Self {
        PlayerBacktest {
            player_name: player_name.to_string(),
            games,
            baseline: None,
            optimized: None,
            skipped: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BacktestReport {
    pub players: Vec<PlayerBacktest>,
    /// Pooled baseline under the global weights (global mode only).
    pub global_baseline: Option<BacktestResult>,
    pub global: Option<OptimizeOutcome>,
    pub saved: bool,
}

/// Backtest `names` against `data`, updating `store` with optimized weights.
/// Nothing is written to disk here.
pub fn backtest_players(
    data: &Dataset,
    names: &[String],
    store: &mut WeightStore,
    config: &Config,
    options: &BacktestOptions,
) -> BacktestReport {
    let start_year = config.backtest.start_year;
    let end_year = config.backtest.resolved_end_year();
    let de = DeConfig::from(&config.optimizer);

    let mut report = BacktestReport::default();
    let mut pooled: Vec<Vec<BacktestSample>> = Vec::new();

    for name in names {
        let Some(player_id) = data.find_player(name, None, Some(Role::Hitter)) else {
            warn!("{name} is not in the player directory");
            report
                .players
                .push(PlayerBacktest::skipped(name, 0, "not in player directory"));
            continue;
        };
        if data.role_of(player_id) == Role::Pitcher {
            report.players.push(PlayerBacktest::skipped(name, 0, "pitcher"));
            continue;
        }
        let samples = build_samples(data, player_id, start_year, end_year, &config.scoring);
        if samples.len() < config.backtest.min_games {
            info!("{name}: only {} games, skipping", samples.len());
            report.players.push(PlayerBacktest::skipped(
                name,
                samples.len(),
                format!("fewer than {} games", config.backtest.min_games),
            ));
            continue;
        }

        let (weights, _) = store.weights_for(name);
        let baseline = evaluate(&samples, &weights);
        info!(
            "{name}: {} games, accuracy {:.4}, MAE {:.4}, RMSE {:.4}",
            baseline.games, baseline.accuracy, baseline.mae, baseline.rmse
        );

        let mut optimized = None;
        if options.optimize && !options.global {
            match optimize_weights(&samples, &de) {
                Ok(outcome) => {
                    info!(
                        "{name}: optimized accuracy {:.4} (was {:.4})",
                        outcome.accuracy, baseline.accuracy
                    );
                    if options.save {
                        store.set_player(name, outcome.weights);
                    }
                    optimized = Some(outcome);
                }
                Err(e) => warn!("{name}: optimization failed: {e}"),
            }
        }

        report.players.push(PlayerBacktest {
            player_name: name.clone(),
            games: samples.len(),
            baseline: Some(baseline),
            optimized,
            skipped: None,
        });
        pooled.push(samples);
    }

    if options.global && !pooled.is_empty() {
        let prepared = PreparedSamples::pooled(pooled.iter().map(|s| s.as_slice()));
        report.global_baseline = Some(prepared.evaluate(store.global()));
        if options.optimize {
            match optimize_global(&pooled, &de) {
                Ok(outcome) => {
                    if options.save {
                        store.set_global(outcome.weights);
                    }
                    report.global = Some(outcome);
                }
                Err(e) => warn!("global optimization failed: {e}"),
            }
        }
    }

    report.saved = options.save
        && (report.global.is_some() || report.players.iter().any(|p| p.optimized.is_some()));
    report
}

/// Players to backtest: the named one, or the latest roster's hitters.
fn player_names(config: &Config, options: &BacktestOptions) -> Result<Vec<String>> {
    if let Some(name) = &options.player {
        return Ok(vec![name.clone()]);
    }
    let (_, roster) = load_latest_roster(&data_dir(config))?;
    Ok(roster
        .into_iter()
        .filter(|e| !e.is_pitcher())
        .map(|e| e.player_name)
        .collect())
}

pub fn run_backtest(config: &Config, options: &BacktestOptions) -> Result<BacktestReport> {
    let names = player_names(config, options)?;
    let data = load_dataset(
        &data_dir(config),
        config.backtest.start_year,
        config.backtest.resolved_end_year(),
    )?;
    let mut store = weight_store(config);
    let report = backtest_players(&data, &names, &mut store, config, options);

    if report.saved {
        if options.global {
            let path = Path::new(&config.weights.global_path);
            store
                .save_global(path)
                .with_context(|| format!("failed to save {}", path.display()))?;
            info!("saved global weights to {}", path.display());
        } else {
            let path = Path::new(&config.weights.player_path);
            store
                .save_players(path)
                .with_context(|| format!("failed to save {}", path.display()))?;
            info!("saved player weights to {}", path.display());
        }
    }
    Ok(report)
}
