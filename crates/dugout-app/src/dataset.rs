// Loading the collected CSVs into a `Dataset`, and matching roster entries
// to it.

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use dugout_baseball::context::{Dataset, DatasetInputs, Role};
use dugout_core::config::Config;
use dugout_core::data::{
    extras, gamelog, gamelogs_path, players, players_path, schedule, schedule_path, weather,
    weather_path, RosterEntry, ScheduledGame,
};
use dugout_core::venues::same_team;
use dugout_core::weights::WeightStore;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub fn data_dir(config: &Config) -> PathBuf {
    PathBuf::from(&config.data.dir)
}

pub fn output_dir(config: &Config) -> PathBuf {
    PathBuf::from(&config.data.output_dir)
}

pub fn weight_store(config: &Config) -> WeightStore {
    WeightStore::load(
        Path::new(&config.weights.global_path),
        Path::new(&config.weights.player_path),
    )
}

/// Load every season file in `first_year..=last_year` plus the
/// season-independent files. Missing season files are skipped.
pub fn load_dataset(dir: &Path, first_year: i32, last_year: i32) -> Result<Dataset> {
    let mut inputs = DatasetInputs::default();
    for year in first_year..=last_year {
        let path = schedule_path(dir, year);
        if path.exists() {
            inputs.schedule.extend(schedule::load_schedule(&path)?);
        } else {
            debug!("no schedule for {year} at {}", path.display());
        }
        let path = gamelogs_path(dir, year);
        if path.exists() {
            inputs.game_logs.extend(gamelog::load_gamelogs(&path)?);
        }
        let path = players_path(dir, year);
        if path.exists() {
            inputs.players.extend(players::load_players(&path)?);
        }
    }
    let path = weather_path(dir);
    if path.exists() {
        inputs.weather = weather::load_weather(&path)?;
    }
    inputs.arsenal = extras::load_pitcher_arsenal(dir)?;
    inputs.pitch_splits = extras::load_batter_pitch_splits(dir)?;
    inputs.defense = extras::load_team_defense(dir)?;

    if inputs.schedule.is_empty() {
        anyhow::bail!(
            "no schedule files for {first_year}-{last_year} in {}; run `dugout refresh --schedule` first",
            dir.display()
        );
    }
    info!(
        "loaded {} games, {} game logs, {} players, {} weather rows ({first_year}-{last_year})",
        inputs.schedule.len(),
        inputs.game_logs.len(),
        inputs.players.len(),
        inputs.weather.len()
    );
    Ok(Dataset::build(inputs))
}

/// Dataset covering the configured history through the season of `date`.
pub fn load_dataset_through(config: &Config, date: NaiveDate) -> Result<Dataset> {
    let first = config.backtest.start_year.min(date.year());
    load_dataset(&data_dir(config), first, date.year())
        .with_context(|| format!("failed to load data for {date}"))
}

/// The player's MLB team: the player directory when it knows the player,
/// else the roster's team abbreviation.
/// The player a roster entry refers to. Yahoo's team and position settle
/// names that several MLB players share.
pub fn roster_player_id(data: &Dataset, entry: &RosterEntry) -> Option<u64> {
    let role = if entry.is_pitcher() {
        Role::Pitcher
    } else {
        Role::Hitter
    };
    data.find_player(&entry.player_name, Some(&entry.mlb_team), Some(role))
}

pub fn roster_team(data: &Dataset, entry: &RosterEntry, player_id: Option<u64>) -> String {
    player_id
        .and_then(|id| data.player(id))
        .map(|p| p.team.clone())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| entry.mlb_team.clone())
}

/// Games `team` plays on `date`, earliest first.
pub fn team_games_on<'a>(data: &'a Dataset, team: &str, date: NaiveDate) -> Vec<&'a ScheduledGame> {
    if team.trim().is_empty() {
        return Vec::new();
    }
    data.games_on(date)
        .into_iter()
        .filter(|g| same_team(&g.home_team, team) || same_team(&g.away_team, team))
        .collect()
}

/// Local `HH:MM` start time, or empty when the schedule has none.
pub fn local_start_time(game: &ScheduledGame) -> String {
    game.game_datetime
        .map(|t| t.with_timezone(&chrono::Local).format("%H:%M").to_string())
        .unwrap_or_default()
}
