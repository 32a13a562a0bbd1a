// Optional, user-supplied inputs: pitcher arsenals, batter results by pitch
// type, and team defense. Missing files mean the related factors stay neutral.

use super::{
    batter_pitch_splits_path, load_optional_with, pitcher_arsenal_path, read_rows,
    team_defense_path, DataError,
};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Share of a pitcher's pitches of one type (0-1).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchUsage {
    pub pitcher_id: u64,
    pub pitch_type: String,
    pub usage: f64,
}

/// A hitter's batting average against one pitch type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatterPitchSplit {
    pub player_id: u64,
    pub pitch_type: String,
    pub avg: f64,
    pub pa: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDefense {
    pub team: String,
    pub season: i32,
    pub outs_above_average: f64,
}

fn arsenal_from_reader<R: Read>(rdr: R) -> Result<Vec<PitchUsage>, csv::Error> {
    let mut rows: Vec<PitchUsage> = read_rows(rdr, "pitch usage")?;
    rows.retain(|r| r.usage.is_finite() && r.usage >= 0.0);
    for r in rows.iter_mut() {
        // Accept percentages as well as fractions.
        if r.usage > 1.0 {
            r.usage /= 100.0;
        }
        r.pitch_type = r.pitch_type.trim().to_ascii_uppercase();
    }
    Ok(rows)
}

fn splits_from_reader<R: Read>(rdr: R) -> Result<Vec<BatterPitchSplit>, csv::Error> {
    let mut rows: Vec<BatterPitchSplit> = read_rows(rdr, "pitch split")?;
    rows.retain(|r| r.avg.is_finite() && (0.0..=1.0).contains(&r.avg));
    for r in rows.iter_mut() {
        r.pitch_type = r.pitch_type.trim().to_ascii_uppercase();
    }
    Ok(rows)
}

fn defense_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamDefense>, csv::Error> {
    let mut rows: Vec<TeamDefense> = read_rows(rdr, "team defense")?;
    rows.retain(|r| r.outs_above_average.is_finite());
    for r in rows.iter_mut() {
        r.team = r.team.trim().to_string();
    }
    Ok(rows)
}

pub fn load_pitcher_arsenal(dir: &Path) -> Result<Vec<PitchUsage>, DataError> {
    load_optional_with(&pitcher_arsenal_path(dir), arsenal_from_reader)
}

pub fn load_batter_pitch_splits(dir: &Path) -> Result<Vec<BatterPitchSplit>, DataError> {
    load_optional_with(&batter_pitch_splits_path(dir), splits_from_reader)
}

pub fn load_team_defense(dir: &Path) -> Result<Vec<TeamDefense>, DataError> {
    load_optional_with(&team_defense_path(dir), defense_from_reader)
}
