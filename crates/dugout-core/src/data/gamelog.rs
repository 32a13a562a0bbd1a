// Per-player hitting game logs (mlb_gamelogs_{year}.csv).

use super::{flexible_bool, lenient_opt_u32, load_with, read_rows, DataError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::warn;

/// One hitter's line for one game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameLog {
    pub player_id: u64,
    pub game_date: NaiveDate,
    pub game_pk: u64,
    #[serde(deserialize_with = "flexible_bool")]
    pub is_home: bool,
    #[serde(deserialize_with = "flexible_bool")]
    pub is_win: bool,
    pub opponent: String,
    #[serde(rename = "AB")]
    pub ab: u32,
    #[serde(rename = "H")]
    pub h: u32,
    #[serde(rename = "R")]
    pub r: u32,
    #[serde(rename = "RBI")]
    pub rbi: u32,
    #[serde(rename = "HR")]
    pub hr: u32,
    #[serde(rename = "2B")]
    pub doubles: u32,
    #[serde(rename = "3B")]
    pub triples: u32,
    #[serde(rename = "BB")]
    pub bb: u32,
    #[serde(rename = "SO")]
    pub so: u32,
    #[serde(rename = "SB")]
    pub sb: u32,
    pub player_name: String,
    /// Spot in the batting order (1-9) when known.
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub batting_order: Option<u32>,
}

impl GameLog {
    pub fn singles(&self) -> u32 {
        self.h.saturating_sub(self.doubles + self.triples + self.hr)
    }

    pub fn total_bases(&self) -> u32 {
        self.singles() + 2 * self.doubles + 3 * self.triples + 4 * self.hr
    }
}

fn gamelogs_from_reader<R: Read>(rdr: R) -> Result<Vec<GameLog>, csv::Error> {
    let rows: Vec<GameLog> = read_rows(rdr, "game log")?;
    let mut logs = Vec::with_capacity(rows.len());
    for mut log in rows {
        if log.h > log.ab {
            warn!(
                "skipping game log for '{}' on {}: {} hits in {} at-bats",
                log.player_name.trim(),
                log.game_date,
                log.h,
                log.ab
            );
            continue;
        }
        log.player_name = log.player_name.trim().to_string();
        log.opponent = log.opponent.trim().to_string();
        logs.push(log);
    }
    Ok(logs)
}

/// Load one season's game logs.
pub fn load_gamelogs(path: &Path) -> Result<Vec<GameLog>, DataError> {
    load_with(path, gamelogs_from_reader)
}
