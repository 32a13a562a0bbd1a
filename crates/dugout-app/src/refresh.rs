// Refresh the collected CSVs from the MLB Stats API, Open-Meteo and Yahoo.

use crate::dataset::data_dir;
use anyhow::{bail, Context, Result};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use dugout_collect::{MlbClient, WeatherClient, YahooClient};
use dugout_core::config::Config;
use dugout_core::data::roster::load_latest_roster;
use dugout_core::data::{
    gamelog, gamelogs_path, normalize_name, players, players_path, schedule, schedule_path,
    teams_path, weather, weather_path, write_csv, GameLog, PlayerInfo, RosterEntry,
    ScheduledGame, ROSTER_PREFIX,
};
use dugout_core::io::file_timestamp;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Days ahead of today covered by the weather forecast refresh.
const FORECAST_DAYS: i64 = 7;

#[derive(Debug, Clone, Default)]
pub struct RefreshOptions {
    pub schedule: bool,
    pub players: bool,
    pub gamelogs: bool,
    pub weather: bool,
    pub roster: bool,
    /// Game logs for every MLB hitter instead of only rostered ones.
    pub all_players: bool,
    pub season: Option<i32>,
}

impl RefreshOptions {
    /// No source selected means refresh everything.
    fn selects_all(&self) -> bool {
        !(self.schedule || self.players || self.gamelogs || self.weather || self.roster)
    }

    fn wants(&self, flag: bool) -> bool {
        flag || self.selects_all()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshSummary {
    pub schedule_games: Option<usize>,
    pub players: Option<usize>,
    pub roster_entries: Option<usize>,
    pub game_logs: Option<usize>,
    pub weather_rows: Option<usize>,
}

pub fn roster_path(dir: &Path, now: NaiveDateTime) -> PathBuf {
    dir.join(format!("{ROSTER_PREFIX}{}.csv", file_timestamp(now)))
}

fn load_existing<T>(
    path: &Path,
    loader: impl FnOnce(&Path) -> Result<Vec<T>, dugout_core::data::DataError>,
) -> Result<Vec<T>> {
    if path.exists() {
        Ok(loader(path)?)
    } else {
        Ok(Vec::new())
    }
}

/// Hitters whose game logs to fetch: the whole directory with `all`,
/// otherwise the rostered hitters found in it.
pub fn gamelog_targets<'a>(
    directory: &'a [PlayerInfo],
    roster: &[RosterEntry],
    all: bool,
) -> Vec<&'a PlayerInfo> {
    let hitters = directory.iter().filter(|p| !p.is_pitcher());
    if all {
        return hitters.collect();
    }
    let wanted: HashSet<String> = roster
        .iter()
        .filter(|e| !e.is_pitcher())
        .map(|e| normalize_name(&e.player_name))
        .collect();
    hitters
        .filter(|p| wanted.contains(&normalize_name(&p.full_name)))
        .collect()
}

/// Replace the refreshed players' logs in `existing`, keeping everyone
/// else, and carry known batting orders over to refetched rows.
pub fn merge_game_logs(existing: Vec<GameLog>, fresh: Vec<GameLog>) -> Vec<GameLog> {
    let refreshed: HashSet<u64> = fresh.iter().map(|l| l.player_id).collect();
    let known_orders: HashMap<(u64, u64), u32> = existing
        .iter()
        .filter_map(|l| Some(((l.player_id, l.game_pk), l.batting_order?)))
        .collect();
    let mut merged: Vec<GameLog> = existing
        .into_iter()
        .filter(|l| !refreshed.contains(&l.player_id))
        .collect();
    merged.extend(fresh.into_iter().map(|mut l| {
        if l.batting_order.is_none() {
            l.batting_order = known_orders.get(&(l.player_id, l.game_pk)).copied();
        }
        l
    }));
    merged.sort_by_key(|l| (l.game_date, l.game_pk, l.player_id));
    merged
}

/// Games that need weather: through the forecast horizon, not yet collected,
/// and not postponed.
pub fn games_needing_weather<'a>(
    games: &'a [ScheduledGame],
    have: &HashSet<u64>,
    today: NaiveDate,
) -> Vec<&'a ScheduledGame> {
    let horizon = today + Duration::days(FORECAST_DAYS);
    games
        .iter()
        .filter(|g| g.game_date <= horizon && !have.contains(&g.game_pk))
        .filter(|g| !g.status.to_ascii_lowercase().contains("postponed"))
        .collect()
}

pub async fn refresh(
    config: &Config,
    options: &RefreshOptions,
    now: NaiveDateTime,
) -> Result<RefreshSummary> {
    let dir = data_dir(config);
    let season = options
        .season
        .unwrap_or_else(|| config.collect.resolved_season());
    let today = now.date();
    let mlb = MlbClient::new(&config.collect)?;
    let mut summary = RefreshSummary::default();

    if options.wants(options.schedule) {
        let games = mlb.fetch_schedule(season).await?;
        let path = schedule_path(&dir, season);
        write_csv(&path, &games)?;
        info!("wrote {} games to {}", games.len(), path.display());
        summary.schedule_games = Some(games.len());
    }

    if options.wants(options.players) {
        let teams = mlb.fetch_teams(season).await?;
        write_csv(&teams_path(&dir), &teams)?;
        let directory = mlb.fetch_players(season).await?;
        let path = players_path(&dir, season);
        write_csv(&path, &directory)?;
        info!("wrote {} players to {}", directory.len(), path.display());
        summary.players = Some(directory.len());
    }

    if options.wants(options.roster) {
        if config.yahoo.team_keys.is_empty() {
            bail!("no Yahoo team keys configured under [yahoo] team_keys");
        }
        let yahoo = YahooClient::new(&config.collect, &config.credentials)?;
        let entries = yahoo.fetch_rosters(&config.yahoo.team_keys).await?;
        let path = roster_path(&dir, now);
        write_csv(&path, &entries)?;
        info!("wrote {} roster entries to {}", entries.len(), path.display());
        summary.roster_entries = Some(entries.len());
    }

    if options.wants(options.gamelogs) {
        summary.game_logs = Some(refresh_game_logs(&mlb, &dir, season, options.all_players).await?);
    }

    if options.wants(options.weather) {
        summary.weather_rows = Some(refresh_weather(config, &dir, season, today).await?);
    }

    Ok(summary)
}

async fn refresh_game_logs(
    mlb: &MlbClient,
    dir: &Path,
    season: i32,
    all_players: bool,
) -> Result<usize> {
    let directory_path = players_path(dir, season);
    let directory = players::load_players(&directory_path).with_context(|| {
        format!("no player directory for {season}; run `dugout refresh --players` first")
    })?;
    let roster = if all_players {
        Vec::new()
    } else {
        load_latest_roster(dir)?.1
    };
    let targets = gamelog_targets(&directory, &roster, all_players);
    info!("fetching {season} game logs for {} hitters", targets.len());

    let mut fresh = Vec::new();
    for (i, p) in targets.iter().enumerate() {
        match mlb.fetch_game_log(p.player_id, &p.full_name, season).await {
            Ok(logs) => fresh.extend(logs),
            Err(e) => warn!("{}: game log failed: {e}", p.full_name),
        }
        if (i + 1) % 50 == 0 {
            info!("{}/{} game logs fetched", i + 1, targets.len());
        }
    }

    let path = gamelogs_path(dir, season);
    let existing = load_existing(&path, gamelog::load_gamelogs)?;
    let mut merged = merge_game_logs(existing, fresh);

    // Fill missing batting orders from boxscores, one request per game.
    let missing: HashSet<u64> = merged
        .iter()
        .filter(|l| l.batting_order.is_none())
        .map(|l| l.game_pk)
        .collect();
    let mut orders: HashMap<u64, HashMap<u64, u32>> = HashMap::new();
    for game_pk in missing {
        match mlb.fetch_batting_orders(game_pk).await {
            Ok(o) => {
                orders.insert(game_pk, o);
            }
            Err(e) => warn!("boxscore {game_pk} failed: {e}"),
        }
    }
    for log in merged.iter_mut().filter(|l| l.batting_order.is_none()) {
        log.batting_order = orders
            .get(&log.game_pk)
            .and_then(|o| o.get(&log.player_id))
            .copied();
    }

    write_csv(&path, &merged)?;
    info!("wrote {} game logs to {}", merged.len(), path.display());
    Ok(merged.len())
}

async fn refresh_weather(
    config: &Config,
    dir: &Path,
    season: i32,
    today: NaiveDate,
) -> Result<usize> {
    let games = schedule::load_schedule(&schedule_path(dir, season)).with_context(|| {
        format!("no schedule for {season}; run `dugout refresh --schedule` first")
    })?;
    let path = weather_path(dir);
    let mut existing = load_existing(&path, weather::load_weather)?;
    let have: HashSet<u64> = existing.iter().map(|w| w.game_pk).collect();
    let needed: Vec<ScheduledGame> = games_needing_weather(&games, &have, today)
        .into_iter()
        .cloned()
        .collect();
    if needed.is_empty() {
        info!("weather already collected for every {season} game through {today}");
        return Ok(existing.len());
    }

    let client = WeatherClient::new(&config.collect)?;
    let fresh = client.fetch_for_games(&needed, today).await?;
    existing.extend(fresh);
    existing.sort_by_key(|w| (w.game_date, w.game_pk));
    write_csv(&path, &existing)?;
    info!("wrote {} weather rows to {}", existing.len(), path.display());
    Ok(existing.len())
}
