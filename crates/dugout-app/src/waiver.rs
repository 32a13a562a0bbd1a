// Waiver-wire scan: score every unrostered MLB hitter playing on a date.

use crate::dataset::{
    data_dir, load_dataset_through, output_dir, roster_player_id, team_games_on, weight_store,
};
use crate::recommend::{score_player_game, sort_by_score};
use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use dugout_baseball::context::Dataset;
use dugout_baseball::recommend::{write_recommendations, RecommendationRow};
use dugout_core::config::{Config, RecommendConfig};
use dugout_core::data::roster::load_latest_roster;
use dugout_core::data::{normalize_name, PlayerInfo, RosterEntry, WAIVER_PREFIX};
use dugout_core::io::file_timestamp;
use dugout_core::venues::find_team;
use dugout_core::weights::WeightStore;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const FREE_AGENT: &str = "Free Agent";

pub fn waiver_path(dir: &Path, now: NaiveDateTime) -> PathBuf {
    dir.join(format!("{WAIVER_PREFIX}{}.csv", file_timestamp(now)))
}

/// Current-season hitters on an MLB team who are not on any fantasy roster.
pub fn waiver_candidates<'a>(
    data: &'a Dataset,
    roster: &[RosterEntry],
    season: i32,
) -> Vec<&'a PlayerInfo> {
    let mut rostered_ids = HashSet::new();
    let mut unresolved = HashSet::new();
    for entry in roster {
        match roster_player_id(data, entry) {
            Some(id) => {
                rostered_ids.insert(id);
            }
            None => {
                unresolved.insert(normalize_name(&entry.player_name));
            }
        }
    }
    let mut candidates: Vec<&PlayerInfo> = data
        .players()
        .filter(|p| p.season == season && !p.is_pitcher() && !p.team.is_empty())
        .filter(|p| {
            !rostered_ids.contains(&p.player_id)
                && !unresolved.contains(&normalize_name(&p.full_name))
        })
        .collect();
    candidates.sort_by_key(|p| p.player_id);
    candidates
}

/// Score candidates in batches of `batch_size`, best first.
pub fn scan_waivers(
    data: &Dataset,
    roster: &[RosterEntry],
    store: &WeightStore,
    thresholds: &RecommendConfig,
    date: NaiveDate,
    batch_size: usize,
) -> Vec<RecommendationRow> {
    let candidates = waiver_candidates(data, roster, date.year());
    let batch_size = batch_size.max(1);
    let batches = candidates.len().div_ceil(batch_size);
    info!("scanning {} unrostered hitters in {batches} batches", candidates.len());

    let mut rows = Vec::new();
    for (i, batch) in candidates.chunks(batch_size).enumerate() {
        let before = rows.len();
        for p in batch {
            let games = team_games_on(data, &p.team, date);
            if games.is_empty() {
                continue;
            }
            let entry = RosterEntry {
                fantasy_team: FREE_AGENT.to_string(),
                player_name: p.full_name.clone(),
                mlb_team: find_team(&p.team)
                    .map(|t| t.abbreviation.to_string())
                    .unwrap_or_else(|| p.team.clone()),
                position: p.position.clone(),
                status: String::new(),
            };
            for game in games {
                if let Some(row) =
                    score_player_game(data, store, thresholds, &entry, p.player_id, &p.team, game)
                {
                    rows.push(row);
                }
            }
        }
        debug!("batch {}/{batches}: {} players scored", i + 1, rows.len() - before);
    }
    sort_by_score(&mut rows);
    rows
}

/// Scan, write every scored row to `waiver_analysis_{timestamp}.csv`, and
/// return the best `limit`.
pub fn run_waiver_scan(
    config: &Config,
    date: NaiveDate,
    batch_size: usize,
    limit: usize,
    now: NaiveDateTime,
) -> Result<(PathBuf, Vec<RecommendationRow>)> {
    let roster = match load_latest_roster(&data_dir(config)) {
        Ok((_, roster)) => roster,
        Err(e) => {
            warn!("{e}; treating every player as available");
            Vec::new()
        }
    };
    let data = load_dataset_through(config, date)?;
    let store = weight_store(config);

    let mut rows = scan_waivers(&data, &roster, &store, &config.recommend, date, batch_size);
    let path = waiver_path(&output_dir(config), now);
    write_recommendations(&path, &rows)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("wrote {} waiver candidates to {}", rows.len(), path.display());
    rows.truncate(limit);
    Ok((path, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn rostered_players_and_pitchers_are_excluded() {
        let mut inputs = sample_inputs();
        inputs
            .players
            .push(player(2, "Giancarlo Stanton", "New York Yankees", "DH"));
        inputs.players.push(player(3, "Free Agent Guy", "", "OF"));
        let data = Dataset::build(inputs);
        let roster = vec![roster_entry("Aaron Judge", "NYY", "OF", "")];

        let names: Vec<&str> = waiver_candidates(&data, &roster, 2024)
            .iter()
            .map(|p| p.full_name.as_str())
            .collect();
        assert_eq!(names, vec!["Kris Bryant", "Giancarlo Stanton"]);
        assert!(waiver_candidates(&data, &roster, 2025).is_empty());
    }

    #[test]
    fn namesake_of_a_rostered_player_stays_available() {
        let mut inputs = sample_inputs();
        inputs
            .players
            .push(player(10, "Will Smith", "Los Angeles Dodgers", "C"));
        inputs
            .players
            .push(player(11, "Will Smith", "New York Yankees", "OF"));
        let data = Dataset::build(inputs);
        let roster = vec![roster_entry("Will Smith", "LAD", "C", "")];

        let ids: Vec<u64> = waiver_candidates(&data, &roster, 2024)
            .iter()
            .map(|p| p.player_id)
            .collect();
        assert!(ids.contains(&11));
        assert!(!ids.contains(&10));
    }

    #[test]
    fn only_players_with_games_are_scored() {
        let mut inputs = sample_inputs();
        inputs
            .players
            .push(player(2, "Giancarlo Stanton", "New York Yankees", "DH"));
        let data = Dataset::build(inputs);
        let rows = scan_waivers(
            &data,
            &[],
            &WeightStore::default(),
            &RecommendConfig::default(),
            d("2024-06-01"),
            1,
        );
        let names: Vec<&str> = rows.iter().map(|r| r.player_name.as_str()).collect();
        assert_eq!(rows.len(), 2);
        assert!(names.contains(&"Aaron Judge") && names.contains(&"Giancarlo Stanton"));
        assert!(rows.iter().all(|r| r.fantasy_team == FREE_AGENT && r.mlb_team == "NYY"));
        assert!(rows[0].final_score >= rows[1].final_score);
    }
}
