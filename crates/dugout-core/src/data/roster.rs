// Fantasy roster snapshots (yahoo_fantasy_rosters_{timestamp}.csv).

use super::players::is_pitcher_position;
use super::{load_with, read_rows, DataError, ROSTER_PREFIX};
use crate::io::latest_file;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjuryStatus {
    Healthy,
    DayToDay,
    Questionable,
    /// On the injured list, suspended, or otherwise unavailable.
    Out,
}

impl InjuryStatus {
    /// Map a Yahoo status code to a status. Blank means healthy.
    pub fn parse(status: &str) -> InjuryStatus {
        match status.trim().to_ascii_uppercase().as_str() {
            "" | "HEALTHY" | "ACTIVE" => InjuryStatus::Healthy,
            "DTD" | "DAY-TO-DAY" => InjuryStatus::DayToDay,
            "Q" | "QUESTIONABLE" | "GTD" => InjuryStatus::Questionable,
            _ => InjuryStatus::Out,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InjuryStatus::Healthy => "Healthy",
            InjuryStatus::DayToDay => "Day-to-Day",
            InjuryStatus::Questionable => "Questionable",
            InjuryStatus::Out => "Out",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub fantasy_team: String,
    pub player_name: String,
    /// Team abbreviation as Yahoo reports it ("NYY", "LAD").
    pub mlb_team: String,
    pub position: String,
    #[serde(default)]
    pub status: String,
}

impl RosterEntry {
    pub fn injury_status(&self) -> InjuryStatus {
        InjuryStatus::parse(&self.status)
    }

    /// True when every eligible position is a pitching slot.
    pub fn is_pitcher(&self) -> bool {
        let positions: Vec<&str> = self
            .position
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .collect();
        !positions.is_empty() && positions.iter().all(|p| is_pitcher_position(p))
    }
}

fn roster_from_reader<R: Read>(rdr: R) -> Result<Vec<RosterEntry>, csv::Error> {
    let mut entries: Vec<RosterEntry> = read_rows(rdr, "roster")?;
    entries.retain(|e| !e.player_name.trim().is_empty());
    for e in entries.iter_mut() {
        e.fantasy_team = e.fantasy_team.trim().to_string();
        e.player_name = e.player_name.trim().to_string();
        e.mlb_team = e.mlb_team.trim().to_string();
        e.position = e.position.trim().to_string();
    }
    Ok(entries)
}

pub fn load_roster(path: &Path) -> Result<Vec<RosterEntry>, DataError> {
    load_with(path, roster_from_reader)
}

pub fn latest_roster_path(dir: &Path) -> Option<PathBuf> {
    latest_file(dir, ROSTER_PREFIX, "csv")
}

/// Load the newest roster snapshot in `dir`.
pub fn load_latest_roster(dir: &Path) -> Result<(PathBuf, Vec<RosterEntry>), DataError> {
    let path = latest_roster_path(dir).ok_or_else(|| {
        DataError::Validation(format!(
            "no {}*.csv found in {}; run `dugout refresh --roster` first",
            ROSTER_PREFIX,
            dir.display()
        ))
    })?;
    let entries = load_roster(&path)?;
    Ok((path, entries))
}
