// CSV data model: collected MLB, weather and fantasy-roster files.
//
// Every loader skips malformed rows with a warning instead of failing, so a
// single bad scrape row never blocks a backtest.

pub mod extras;
pub mod gamelog;
pub mod players;
pub mod roster;
pub mod schedule;
pub mod weather;

pub use extras::{BatterPitchSplit, PitchUsage, TeamDefense};
pub use gamelog::GameLog;
pub use players::{Hand, PlayerInfo, TeamInfo};
pub use roster::{InjuryStatus, RosterEntry};
pub use schedule::{DayNight, ScheduledGame};
pub use weather::WeatherObservation;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum DataError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// File naming
// ---------------------------------------------------------------------------

pub const ROSTER_PREFIX: &str = "yahoo_fantasy_rosters_";
pub const RECOMMENDATIONS_PREFIX: &str = "sitstart_recommendations_";
pub const WAIVER_PREFIX: &str = "waiver_analysis_";

pub fn schedule_path(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("mlb_{year}_schedule.csv"))
}

pub fn players_path(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("mlb_all_players_{year}.csv"))
}

pub fn teams_path(dir: &Path) -> PathBuf {
    dir.join("mlb_all_teams.csv")
}

pub fn gamelogs_path(dir: &Path, year: i32) -> PathBuf {
    dir.join(format!("mlb_gamelogs_{year}.csv"))
}

pub fn weather_path(dir: &Path) -> PathBuf {
    dir.join("mlb_stadium_weather.csv")
}

pub fn pitcher_arsenal_path(dir: &Path) -> PathBuf {
    dir.join("pitcher_arsenal.csv")
}

pub fn batter_pitch_splits_path(dir: &Path) -> PathBuf {
    dir.join("batter_pitch_splits.csv")
}

pub fn team_defense_path(dir: &Path) -> PathBuf {
    dir.join("team_defense.csv")
}

// ---------------------------------------------------------------------------
// Name matching
// ---------------------------------------------------------------------------

/// Canonical form used to match player names across sources: lowercase,
/// periods and apostrophes dropped, whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| !matches!(c, '.' | '\'' | '’'))
        .flat_map(|c| c.to_lowercase())
        .collect();
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

// ---------------------------------------------------------------------------
// Generic readers / writers
// ---------------------------------------------------------------------------

/// Deserialize every row of a CSV, skipping (and logging) rows that fail.
pub(crate) fn read_rows<T, R>(rdr: R, kind: &str) -> Result<Vec<T>, csv::Error>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv::Reader::from_reader(rdr);
    reader.headers()?;
    let mut rows = Vec::new();
    for result in reader.deserialize::<T>() {
        match result {
            Ok(row) => rows.push(row),
            Err(e) => warn!("skipping malformed {} row: {}", kind, e),
        }
    }
    Ok(rows)
}

/// Open `path` and run a reader-based loader over it.
pub(crate) fn load_with<T>(
    path: &Path,
    loader: impl FnOnce(std::fs::File) -> Result<Vec<T>, csv::Error>,
) -> Result<Vec<T>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    loader(file).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}

/// Like `load_with`, but a missing file yields an empty list.
pub(crate) fn load_optional_with<T>(
    path: &Path,
    loader: impl FnOnce(std::fs::File) -> Result<Vec<T>, csv::Error>,
) -> Result<Vec<T>, DataError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    load_with(path, loader)
}

/// Write rows with a header to `path`, creating parent directories.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), DataError> {
    let io_err = |e: std::io::Error| DataError::Io {
        path: path.display().to_string(),
        source: e,
    };
    let csv_err = |e: csv::Error| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let mut writer = csv::Writer::from_path(path).map_err(csv_err)?;
    for row in rows {
        writer.serialize(row).map_err(csv_err)?;
    }
    writer.flush().map_err(io_err)
}

/// Accepts `true/false`, `True/False` and `1/0`.
pub(crate) fn flexible_bool<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    let raw = String::deserialize(d)?;
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!("invalid boolean '{other}'"))),
    }
}

/// Empty or unparseable numeric cells become `None`.
pub(crate) fn lenient_opt_u64<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u64>, D::Error> {
    let raw = Option::<String>::deserialize(d)?;
    Ok(raw.and_then(|s| {
        let s = s.trim();
        s.parse::<u64>()
            .ok()
            .or_else(|| s.parse::<f64>().ok().filter(|v| v.is_finite() && *v >= 0.0).map(|v| v as u64))
    }))
}

pub(crate) fn lenient_opt_u32<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    Ok(lenient_opt_u64(d)?.and_then(|v| u32::try_from(v).ok()))
}
