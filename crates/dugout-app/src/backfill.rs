// Historical factor analysis, one CSV per game date, resumable through a
// JSON checkpoint.

use crate::dataset::{data_dir, load_dataset, output_dir};
use anyhow::{bail, Context, Result};
use chrono::{Datelike, NaiveDate, Utc};
use dugout_baseball::context::{Dataset, Role};
use dugout_baseball::factors::score_all;
use dugout_core::checkpoint::Checkpoint;
use dugout_core::config::Config;
use dugout_core::factor::{Factor, FactorScores};
use dugout_core::io::write_atomic;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

pub const FACTOR_ANALYSIS_DIR: &str = "factor_analysis";
pub const CHECKPOINT_FILE: &str = "backfill_checkpoint.json";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackfillRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Default for BackfillRange {
    fn default() -> Self {
        BackfillRange {
            start: NaiveDate::from_ymd_opt(2022, 1, 1).unwrap_or_default(),
            end: NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default(),
        }
    }
}

impl BackfillRange {
    /// Pick the range from command-line selectors, in precedence order:
    /// a single date, a month (`YYYY-MM`), a year, explicit start/end.
    /// Without any selector the default range applies; a lone `start` or
    /// `end` keeps the default for the other side.
    pub fn from_args(
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        year: Option<i32>,
        month: Option<&str>,
        date: Option<NaiveDate>,
    ) -> Result<BackfillRange> {
        let range = if let Some(date) = date {
            BackfillRange {
                start: date,
                end: date,
            }
        } else if let Some(month) = month {
            let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
                .with_context(|| format!("invalid month '{month}', expected YYYY-MM"))?;
            let next = if first.month() == 12 {
                NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
            } else {
                NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
            };
            let last = next
                .and_then(|n| n.pred_opt())
                .with_context(|| format!("month '{month}' out of range"))?;
            BackfillRange {
                start: first,
                end: last,
            }
        } else if let Some(year) = year {
            let (Some(start), Some(end)) = (
                NaiveDate::from_ymd_opt(year, 1, 1),
                NaiveDate::from_ymd_opt(year, 12, 31),
            ) else {
                bail!("year {year} out of range");
            };
            BackfillRange { start, end }
        } else {
            let default = BackfillRange::default();
            BackfillRange {
                start: start.unwrap_or(default.start),
                end: end.unwrap_or(default.end),
            }
        };
        if range.start > range.end {
            bail!("start date {} is after end date {}", range.start, range.end);
        }
        Ok(range)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BackfillSummary {
    pub total_dates: usize,
    pub processed: usize,
    pub skipped_existing: usize,
    pub rows_written: usize,
    pub failed: Vec<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorAnalysisRow {
    pub player_name: String,
    pub player_id: u64,
    pub date: NaiveDate,
    pub game_pk: u64,
    pub scores: FactorScores,
}

pub fn factor_analysis_path(dir: &Path, date: NaiveDate) -> PathBuf {
    dir.join(format!("factor_analysis_{}.csv", date.format("%Y%m%d")))
}

/// Factor scores for every hitter who played a completed game on `date`.
pub fn analyze_date(data: &Dataset, date: NaiveDate) -> Vec<FactorAnalysisRow> {
    data.logs_on(date)
        .into_iter()
        .filter(|log| data.role_of(log.player_id) == Role::Hitter)
        .filter(|log| data.game(log.game_pk).is_some_and(|g| g.is_final()))
        .filter_map(|log| {
            let ctx = data.context_for_log(log)?;
            Some(FactorAnalysisRow {
                player_name: ctx.player_name.clone(),
                player_id: log.player_id,
                date,
                game_pk: log.game_pk,
                scores: score_all(&ctx, data),
            })
        })
        .collect()
}

pub fn write_factor_analysis(path: &Path, rows: &[FactorAnalysisRow]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    let mut header = vec![
        "player_name".to_string(),
        "player_id".to_string(),
        "date".to_string(),
        "game_pk".to_string(),
    ];
    header.extend(Factor::ALL.iter().map(|f| f.score_column()));
    writer.write_record(&header)?;
    for row in rows {
        let mut record = vec![
            row.player_name.clone(),
            row.player_id.to_string(),
            row.date.to_string(),
            row.game_pk.to_string(),
        ];
        record.extend(Factor::ALL.iter().map(|&f| format!("{:.4}", row.scores.get(f))));
        writer.write_record(&record)?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    write_atomic(path, &bytes).with_context(|| format!("failed to write {}", path.display()))
}

fn format_eta(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    format!("{}h{:02}m{:02}s", total / 3600, total % 3600 / 60, total % 60)
}

/// Process every date in `range` with completed games, writing one file per
/// date under `out_dir` and recording progress in the checkpoint there.
pub fn backfill_dataset(
    data: &Dataset,
    out_dir: &Path,
    range: BackfillRange,
    force_restart: bool,
) -> Result<BackfillSummary> {
    let checkpoint_path = out_dir.join(CHECKPOINT_FILE);
    let mut checkpoint = if force_restart {
        Checkpoint::new(Utc::now())
    } else {
        Checkpoint::load(&checkpoint_path)?.unwrap_or_else(|| Checkpoint::new(Utc::now()))
    };
    let from = checkpoint.resume_from(range.start);
    if from > range.start {
        info!("resuming from {from} (checkpoint at {})", checkpoint_path.display());
    }

    let dates = if from > range.end {
        Vec::new()
    } else {
        data.completed_dates(from, range.end)
    };
    let mut summary = BackfillSummary {
        total_dates: dates.len(),
        ..Default::default()
    };
    info!("backfilling {} dates from {from} to {}", dates.len(), range.end);

    let started = Instant::now();
    for (i, &date) in dates.iter().enumerate() {
        let path = factor_analysis_path(out_dir, date);
        if path.exists() {
            debug!("{} exists, skipping", path.display());
            summary.skipped_existing += 1;
            checkpoint.mark_completed(date, Utc::now());
        } else {
            let rows = analyze_date(data, date);
            match write_factor_analysis(&path, &rows) {
                Ok(()) => {
                    summary.rows_written += rows.len();
                    checkpoint.mark_completed(date, Utc::now());
                }
                Err(e) => {
                    warn!("{date} failed: {e:#}");
                    summary.failed.push(date);
                    checkpoint.mark_failed(date, Utc::now());
                }
            }
        }
        summary.processed += 1;
        checkpoint
            .save(&checkpoint_path)
            .with_context(|| format!("failed to save {}", checkpoint_path.display()))?;

        let done = i + 1;
        let elapsed = started.elapsed().as_secs_f64();
        let rate = done as f64 / elapsed.max(1e-6);
        let remaining = (dates.len() - done) as f64 / rate;
        info!(
            "{date}: {done}/{} dates ({:.1}%), {rate:.2} dates/s, ETA {}",
            dates.len(),
            done as f64 * 100.0 / dates.len() as f64,
            format_eta(remaining)
        );
    }

    if !summary.failed.is_empty() {
        warn!("{} dates failed: {:?}", summary.failed.len(), summary.failed);
    }
    Ok(summary)
}

pub fn run_backfill(
    config: &Config,
    range: BackfillRange,
    force_restart: bool,
) -> Result<BackfillSummary> {
    let first_year = config.backtest.start_year.min(range.start.year());
    let data = load_dataset(&data_dir(config), first_year, range.end.year())?;
    let out_dir = output_dir(config).join(FACTOR_ANALYSIS_DIR);
    backfill_dataset(&data, &out_dir, range, force_restart)
}
