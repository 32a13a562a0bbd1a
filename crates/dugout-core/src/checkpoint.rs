// JSON checkpoint for resumable historical backfills.

use crate::io::write_atomic;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum CheckpointError {
    #[error("failed to access checkpoint {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("corrupt checkpoint {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub last_completed_date: Option<NaiveDate>,
    pub total_dates_processed: usize,
    #[serde(default)]
    pub failed_dates: Vec<NaiveDate>,
    pub start_time: DateTime<Utc>,
    pub last_update: DateTime<Utc>,
}

impl Checkpoint {
    pub fn new(now: DateTime<Utc>) -> Self {
        Checkpoint {
            last_completed_date: None,
            total_dates_processed: 0,
            failed_dates: Vec::new(),
            start_time: now,
            last_update: now,
        }
    }

    /// Read a checkpoint. A missing file is not an error: `Ok(None)`.
    pub fn load(path: &Path) -> Result<Option<Checkpoint>, CheckpointError> {
        let text = match std::fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CheckpointError::Io {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|e| CheckpointError::Json {
                path: path.to_path_buf(),
                source: e,
            })
    }

    pub fn save(&self, path: &Path) -> Result<(), CheckpointError> {
        let text = serde_json::to_string_pretty(self).map_err(|e| CheckpointError::Json {
            path: path.to_path_buf(),
            source: e,
        })?;
        write_atomic(path, text.as_bytes()).map_err(|e| CheckpointError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Record a finished date. A date that failed earlier and now succeeded
    /// is removed from `failed_dates`.
    pub fn mark_completed(&mut self, date: NaiveDate, now: DateTime<Utc>) {
        self.last_completed_date = Some(match self.last_completed_date {
            Some(prev) if prev > date => prev,
            _ => date,
        });
        self.total_dates_processed += 1;
        self.failed_dates.retain(|d| *d != date);
        self.last_update = now;
    }

    pub fn mark_failed(&mut self, date: NaiveDate, now: DateTime<Utc>) {
        if !self.failed_dates.contains(&date) {
            self.failed_dates.push(date);
        }
        self.last_update = now;
    }

    /// The first date still to process: the day after the last completed
    /// date, but never before `start`.
    pub fn resume_from(&self, start: NaiveDate) -> NaiveDate {
        match self.last_completed_date.and_then(|d| d.succ_opt()) {
            Some(next) if next > start => next,
            _ => start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-05-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn resume_from_fresh_checkpoint_is_start() {
        let cp = Checkpoint::new(now());
        assert_eq!(cp.resume_from(date(2022, 1, 1)), date(2022, 1, 1));
    }

    #[test]
    fn resume_after_last_completed() {
        let mut cp = Checkpoint::new(now());
        cp.mark_completed(date(2022, 4, 10), now());
        assert_eq!(cp.resume_from(date(2022, 1, 1)), date(2022, 4, 11));
        // Never earlier than the requested start.
        assert_eq!(cp.resume_from(date(2023, 1, 1)), date(2023, 1, 1));
    }

    #[test]
    fn failures_recorded_once_and_cleared_on_success() {
        let mut cp = Checkpoint::new(now());
        cp.mark_failed(date(2022, 4, 10), now());
        cp.mark_failed(date(2022, 4, 10), now());
        assert_eq!(cp.failed_dates, vec![date(2022, 4, 10)]);
        cp.mark_completed(date(2022, 4, 10), now());
        assert!(cp.failed_dates.is_empty());
        assert_eq!(cp.total_dates_processed, 1);
    }

    #[test]
    fn last_completed_never_moves_backwards() {
        let mut cp = Checkpoint::new(now());
        cp.mark_completed(date(2022, 5, 1), now());
        cp.mark_completed(date(2022, 4, 1), now());
        assert_eq!(cp.last_completed_date, Some(date(2022, 5, 1)));
    }

    #[test]
    fn save_and_load() {
        let path = std::env::temp_dir().join("dugout_checkpoint_test/checkpoint.json");
        let _ = std::fs::remove_file(&path);
        assert!(Checkpoint::load(&path).unwrap().is_none());

        let mut cp = Checkpoint::new(now());
        cp.mark_completed(date(2023, 6, 15), now());
        cp.save(&path).unwrap();

        let loaded = Checkpoint::load(&path).unwrap().unwrap();
        assert_eq!(loaded, cp);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn corrupt_checkpoint_is_an_error() {
        let path = std::env::temp_dir().join("dugout_checkpoint_corrupt.json");
        std::fs::write(&path, "{ nope").unwrap();
        assert!(matches!(
            Checkpoint::load(&path),
            Err(CheckpointError::Json { .. })
        ));
        let _ = std::fs::remove_file(&path);
    }
}
