// Indexed view over the collected CSVs, and the per-game context the factor
// analyzers read.
//
// Every lookup that feeds a factor is restricted to data strictly before the
// game date, so backtests never see the outcome they are predicting.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use dugout_core::data::{
    normalize_name, BatterPitchSplit, DayNight, GameLog, Hand, InjuryStatus, PitchUsage,
    PlayerInfo, ScheduledGame, TeamDefense, WeatherObservation,
};
use dugout_core::venues::same_team;
use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Hitter,
    Pitcher,
}

/// Everything known about one player's game at scoring time.
#[derive(Debug, Clone)]
pub struct GameContext {
    pub date: NaiveDate,
    pub season: i32,
    pub game_pk: u64,
    pub player_id: u64,
    pub player_name: String,
    pub role: Role,
    pub bats: Hand,
    pub team: String,
    pub opponent: String,
    pub is_home: bool,
    pub venue: String,
    pub day_night: DayNight,
    pub start_time: Option<DateTime<Utc>>,
    pub weather: Option<WeatherObservation>,
    pub opposing_pitcher_id: Option<u64>,
    pub opposing_pitcher_throws: Hand,
    pub umpire: String,
    pub batting_order: Option<u32>,
    pub injury_status: InjuryStatus,
}

/// Raw collected data, as loaded from disk.
#[derive(Debug, Clone, Default)]
pub struct DatasetInputs {
    pub schedule: Vec<ScheduledGame>,
    pub game_logs: Vec<GameLog>,
    pub players: Vec<PlayerInfo>,
    pub weather: Vec<WeatherObservation>,
    pub arsenal: Vec<PitchUsage>,
    pub pitch_splits: Vec<BatterPitchSplit>,
    pub defense: Vec<TeamDefense>,
}

/// Runs and games accumulated over some set of completed games.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunTotals {
    pub runs: u64,
    pub games: u32,
}

impl RunTotals {
    pub fn per_game(&self) -> Option<f64> {
        if self.games == 0 {
            None
        } else {
            Some(self.runs as f64 / self.games as f64)
        }
    }
}

// ---------------------------------------------------------------------------
// Cumulative run series
// ---------------------------------------------------------------------------

/// Running totals of runs per game, sorted by date, for "everything before
/// date X" queries in O(log n).
#[derive(Debug, Clone, Default)]
struct RunSeries {
    dates: Vec<NaiveDate>,
    cumulative: Vec<RunTotals>,
}

impl RunSeries {
    fn from_entries(mut entries: Vec<(NaiveDate, u32)>) -> RunSeries {
        entries.sort_by_key(|(d, _)| *d);
        let mut series = RunSeries::default();
        let mut acc = RunTotals::default();
        for (date, runs) in entries {
            acc.runs += runs as u64;
            acc.games += 1;
            series.dates.push(date);
            series.cumulative.push(acc);
        }
        series
    }

    fn before(&self, date: NaiveDate) -> RunTotals {
        let idx = self.dates.partition_point(|d| *d < date);
        if idx == 0 {
            RunTotals::default()
        } else {
            self.cumulative[idx - 1]
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    logs_by_player: HashMap<u64, Vec<GameLog>>,
    games: HashMap<u64, ScheduledGame>,
    games_by_date: BTreeMap<NaiveDate, Vec<u64>>,
    players: HashMap<u64, PlayerInfo>,
    player_ids_by_name: HashMap<String, Vec<u64>>,
    weather: HashMap<u64, WeatherObservation>,
    arsenal: HashMap<u64, Vec<PitchUsage>>,
    pitch_splits: HashMap<u64, Vec<BatterPitchSplit>>,
    defense: Vec<TeamDefense>,
    league_runs: RunSeries,
    venue_runs: HashMap<String, RunSeries>,
    umpire_runs: HashMap<String, RunSeries>,
}

impl Dataset {
    pub fn build(inputs: DatasetInputs) -> Dataset {
        let mut data = Dataset::default();

        // Players: keep the most recent season's entry per id.
        for p in inputs.players {
            let keep = match data.players.get(&p.player_id) {
                Some(existing) => p.season >= existing.season,
                None => true,
            };
            if keep {
                data.players.insert(p.player_id, p);
            }
        }
        for p in data.players.values() {
            data.player_ids_by_name
                .entry(normalize_name(&p.full_name))
                .or_default()
                .push(p.player_id);
        }

        // Game logs grouped per player, sorted, one row per game.
        for log in inputs.game_logs {
            if !data.players.contains_key(&log.player_id) {
                data.player_ids_by_name
                    .entry(normalize_name(&log.player_name))
                    .or_default()
                    .push(log.player_id);
            }
            data.logs_by_player.entry(log.player_id).or_default().push(log);
        }
        for ids in data.player_ids_by_name.values_mut() {
            ids.sort_unstable();
            ids.dedup();
        }
        for logs in data.logs_by_player.values_mut() {
            logs.sort_by(|a, b| a.game_date.cmp(&b.game_date).then(a.game_pk.cmp(&b.game_pk)));
            logs.dedup_by(|a, b| a.game_pk == b.game_pk);
        }

        // Schedule, plus run environments from completed games.
        let mut league = Vec::new();
        let mut by_venue: HashMap<String, Vec<(NaiveDate, u32)>> = HashMap::new();
        let mut by_umpire: HashMap<String, Vec<(NaiveDate, u32)>> = HashMap::new();
        for game in inputs.schedule {
            if data.games.contains_key(&game.game_pk) {
                continue;
            }
            if let Some(runs) = game.total_runs() {
                league.push((game.game_date, runs));
                by_venue
                    .entry(game.venue.to_lowercase())
                    .or_default()
                    .push((game.game_date, runs));
                if !game.home_plate_umpire.is_empty() {
                    by_umpire
                        .entry(game.home_plate_umpire.to_lowercase())
                        .or_default()
                        .push((game.game_date, runs));
                }
            }
            data.games_by_date
                .entry(game.game_date)
                .or_default()
                .push(game.game_pk);
            data.games.insert(game.game_pk, game);
        }
        data.league_runs = RunSeries::from_entries(league);
        data.venue_runs = by_venue
            .into_iter()
            .map(|(k, v)| (k, RunSeries::from_entries(v)))
            .collect();
        data.umpire_runs = by_umpire
            .into_iter()
            .map(|(k, v)| (k, RunSeries::from_entries(v)))
            .collect();

        data.weather = inputs.weather.into_iter().map(|w| (w.game_pk, w)).collect();
        for usage in inputs.arsenal {
            data.arsenal.entry(usage.pitcher_id).or_default().push(usage);
        }
        for split in inputs.pitch_splits {
            data.pitch_splits.entry(split.player_id).or_default().push(split);
        }
        data.defense = inputs.defense;

        data
    }

    // -- Lookups --

    pub fn game(&self, game_pk: u64) -> Option<&ScheduledGame> {
        self.games.get(&game_pk)
    }

    /// Games on `date`, ordered by start time (unknown times last).
    pub fn games_on(&self, date: NaiveDate) -> Vec<&ScheduledGame> {
        let mut games: Vec<&ScheduledGame> = self
            .games_by_date
            .get(&date)
            .map(|pks| pks.iter().filter_map(|pk| self.games.get(pk)).collect())
            .unwrap_or_default();
        games.sort_by_key(|g| (g.game_datetime.is_none(), g.game_datetime, g.game_pk));
        games
    }

    /// Dates with at least one completed game, within `[start, end]`.
    pub fn completed_dates(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        self.games_by_date
            .range(start..=end)
            .filter(|(_, pks)| {
                pks.iter()
                    .filter_map(|pk| self.games.get(pk))
                    .any(|g| g.is_final())
            })
            .map(|(d, _)| *d)
            .collect()
    }

    pub fn player(&self, player_id: u64) -> Option<&PlayerInfo> {
        self.players.get(&player_id)
    }

    pub fn players(&self) -> impl Iterator<Item = &PlayerInfo> {
        self.players.values()
    }

    pub fn find_player_id(&self, name: &str) -> Option<u64> {
        self.find_player(name, None, None)
    }

    /// Resolve a name that several players may share. Candidates on `team`
    /// come first, then those in `role`, then the most recent season, then
    /// the lowest id.
    pub fn find_player(&self, name: &str, team: Option<&str>, role: Option<Role>) -> Option<u64> {
        let team = team.map(str::trim).filter(|t| !t.is_empty());
        self.player_ids_by_name
            .get(&normalize_name(name))?
            .iter()
            .copied()
            .min_by_key(|&id| {
                let off_team = team.is_some_and(|t| {
                    !self.players.get(&id).is_some_and(|p| same_team(&p.team, t))
                });
                let off_role = role.is_some_and(|r| self.role_of(id) != r);
                (off_team, off_role, Reverse(self.latest_season(id)), id)
            })
    }

    fn latest_season(&self, player_id: u64) -> i32 {
        let listed = self.players.get(&player_id).map(|p| p.season);
        let logged = self.logs_for(player_id).last().map(|l| l.game_date.year());
        listed.max(logged).unwrap_or(0)
    }

    /// Best display name: the player directory, else the game logs.
    pub fn player_name(&self, player_id: u64) -> Option<&str> {
        self.players
            .get(&player_id)
            .map(|p| p.full_name.as_str())
            .or_else(|| self.logs_for(player_id).last().map(|l| l.player_name.as_str()))
    }

    pub fn role_of(&self, player_id: u64) -> Role {
        match self.players.get(&player_id) {
            Some(p) if p.is_pitcher() => Role::Pitcher,
            _ => Role::Hitter,
        }
    }

    pub fn logs_for(&self, player_id: u64) -> &[GameLog] {
        self.logs_by_player
            .get(&player_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// The player's game logs strictly before `date`, oldest first.
    pub fn history_before(&self, player_id: u64, date: NaiveDate) -> &[GameLog] {
        let logs = self.logs_for(player_id);
        let idx = logs.partition_point(|l| l.game_date < date);
        &logs[..idx]
    }

    /// Logs on exactly `date` for every player, as (player id, log).
    pub fn logs_on(&self, date: NaiveDate) -> Vec<&GameLog> {
        let mut out: Vec<&GameLog> = self
            .logs_by_player
            .values()
            .flat_map(|logs| {
                let start = logs.partition_point(|l| l.game_date < date);
                let end = logs.partition_point(|l| l.game_date <= date);
                &logs[start..end]
            })
            .collect();
        out.sort_by_key(|l| (l.game_pk, l.player_id));
        out
    }

    pub fn weather_for(&self, game_pk: u64) -> Option<&WeatherObservation> {
        self.weather.get(&game_pk)
    }

    pub fn arsenal_for(&self, pitcher_id: u64) -> &[PitchUsage] {
        self.arsenal.get(&pitcher_id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn pitch_splits_for(&self, player_id: u64) -> &[BatterPitchSplit] {
        self.pitch_splits
            .get(&player_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Outs above average for `team`: the exact season if present, else the
    /// closest earlier season.
    pub fn defense_for(&self, team: &str, season: i32) -> Option<f64> {
        self.defense
            .iter()
            .filter(|d| same_team(&d.team, team) && d.season <= season)
            .max_by_key(|d| d.season)
            .map(|d| d.outs_above_average)
    }

    pub fn league_runs_before(&self, date: NaiveDate) -> RunTotals {
        self.league_runs.before(date)
    }

    pub fn venue_runs_before(&self, venue: &str, date: NaiveDate) -> RunTotals {
        self.venue_runs
            .get(&venue.trim().to_lowercase())
            .map(|s| s.before(date))
            .unwrap_or_default()
    }

    pub fn umpire_runs_before(&self, umpire: &str, date: NaiveDate) -> RunTotals {
        self.umpire_runs
            .get(&umpire.trim().to_lowercase())
            .map(|s| s.before(date))
            .unwrap_or_default()
    }

    // -- Joins from a game log to its scheduled game --

    /// The player's team in the game a log row belongs to.
    pub fn log_team(&self, log: &GameLog) -> Option<&str> {
        let game = self.games.get(&log.game_pk)?;
        Some(if log.is_home {
            &game.home_team
        } else {
            &game.away_team
        })
    }

    /// Throwing hand of the starter the hitter faced in that game.
    pub fn opposing_hand(&self, log: &GameLog) -> Hand {
        let Some(game) = self.games.get(&log.game_pk) else {
            return Hand::Unknown;
        };
        let pitcher_id = if log.is_home {
            game.away_probable_pitcher_id
        } else {
            game.home_probable_pitcher_id
        };
        pitcher_id
            .and_then(|id| self.players.get(&id))
            .map(|p| p.throws())
            .unwrap_or(Hand::Unknown)
    }

    pub fn day_night_of(&self, log: &GameLog) -> DayNight {
        self.games
            .get(&log.game_pk)
            .map(|g| g.day_night)
            .unwrap_or_default()
    }

    /// Most common batting-order spot over the player's last 10 games with
    /// a known spot; ties go to the higher spot.
    pub fn usual_batting_order(&self, player_id: u64, date: NaiveDate) -> Option<u32> {
        let mut counts: BTreeMap<u32, usize> = BTreeMap::new();
        for order in self
            .history_before(player_id, date)
            .iter()
            .rev()
            .filter_map(|l| l.batting_order)
            .take(10)
        {
            *counts.entry(order).or_default() += 1;
        }
        let mut best: Option<(u32, usize)> = None;
        for (order, n) in counts {
            if best.map_or(true, |(_, bn)| n > bn) {
                best = Some((order, n));
            }
        }
        best.map(|(order, _)| order)
    }

    // -- Context builders --

    /// Context for a historical game-log row. `None` when the game is not in
    /// the loaded schedule.
    pub fn context_for_log(&self, log: &GameLog) -> Option<GameContext> {
        let game = self.games.get(&log.game_pk)?;
        let team = if log.is_home {
            game.home_team.clone()
        } else {
            game.away_team.clone()
        };
        let mut ctx = self.context_for_scheduled(
            log.player_id,
            &log.player_name,
            &team,
            game,
            InjuryStatus::Healthy,
        )?;
        ctx.batting_order = log.batting_order;
        Some(ctx)
    }

    /// Context for `player_id` playing for `team` in `game`. `None` when the
    /// team does not play in that game.
    pub fn context_for_scheduled(
        &self,
        player_id: u64,
        player_name: &str,
        team: &str,
        game: &ScheduledGame,
        injury_status: InjuryStatus,
    ) -> Option<GameContext> {
        let is_home = if same_team(&game.home_team, team) {
            true
        } else if same_team(&game.away_team, team) {
            false
        } else {
            return None;
        };
        let (team, opponent) = if is_home {
            (game.home_team.clone(), game.away_team.clone())
        } else {
            (game.away_team.clone(), game.home_team.clone())
        };
        let opposing_pitcher_id = if is_home {
            game.away_probable_pitcher_id
        } else {
            game.home_probable_pitcher_id
        };
        let opposing_pitcher_throws = opposing_pitcher_id
            .and_then(|id| self.players.get(&id))
            .map(|p| p.throws())
            .unwrap_or(Hand::Unknown);
        let player = self.players.get(&player_id);

        Some(GameContext {
            date: game.game_date,
            season: game.season,
            game_pk: game.game_pk,
            player_id,
            player_name: player
                .map(|p| p.full_name.clone())
                .unwrap_or_else(|| player_name.to_string()),
            role: self.role_of(player_id),
            bats: player.map(|p| p.bats()).unwrap_or(Hand::Unknown),
            team,
            opponent,
            is_home,
            venue: game.venue.clone(),
            day_night: game.day_night,
            start_time: game.game_datetime,
            weather: self.weather.get(&game.game_pk).cloned(),
            opposing_pitcher_id,
            opposing_pitcher_throws,
            umpire: game.home_plate_umpire.clone(),
            batting_order: self.usual_batting_order(player_id, game.game_date),
            injury_status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn history_is_strictly_before_date() {
        let data = Dataset::build(DatasetInputs {
            game_logs: vec![
                log("2024-04-01", 4, 1),
                log("2024-04-02", 4, 2),
                log("2024-04-03", 4, 3),
            ],
            ..Default::default()
        });
        let hist = data.history_before(PLAYER_ID, d("2024-04-03"));
        assert_eq!(hist.len(), 2);
        assert!(hist.iter().all(|l| l.game_date < d("2024-04-03")));
        assert!(data.history_before(PLAYER_ID, d("2024-04-01")).is_empty());
        assert!(data.history_before(999, d("2025-01-01")).is_empty());
    }

    #[test]
    fn duplicate_log_rows_collapse() {
        let data = Dataset::build(DatasetInputs {
            game_logs: vec![log("2024-04-01", 4, 1), log("2024-04-01", 4, 1)],
            ..Default::default()
        });
        assert_eq!(data.logs_for(PLAYER_ID).len(), 1);
    }

    #[test]
    fn run_environment_counts_only_earlier_final_games() {
        let data = Dataset::build(DatasetInputs {
            schedule: vec![
                final_game(1, "2024-04-01", "Coors Field", 10, "Joe West"),
                final_game(2, "2024-04-02", "Coors Field", 14, "Joe West"),
                final_game(3, "2024-04-02", "Petco Park", 4, "Pat Hoberg"),
                scheduled_game(4, "2024-04-03", "Coors Field"),
            ],
            ..Default::default()
        });
        let venue = data.venue_runs_before("coors field", d("2024-04-03"));
        assert_eq!(venue, RunTotals { runs: 24, games: 2 });
        assert_eq!(data.venue_runs_before("Coors Field", d("2024-04-02")).games, 1);
        assert_eq!(data.league_runs_before(d("2024-04-03")).per_game(), Some(28.0 / 3.0));
        assert_eq!(data.umpire_runs_before("Joe West", d("2024-04-03")).runs, 24);
        assert_eq!(data.league_runs_before(d("2024-04-01")).per_game(), None);
    }

    #[test]
    fn shared_names_resolve_by_team_then_role() {
        let info = |id: u64, team: &str, position: &str, season: i32| PlayerInfo {
            player_id: id,
            full_name: "Will Smith".to_string(),
            team: team.to_string(),
            position: position.to_string(),
            bats: "R".to_string(),
            throws: "R".to_string(),
            season,
        };
        let players = vec![
            info(669257, "Los Angeles Dodgers", "C", 2024),
            info(519293, "Kansas City Royals", "P", 2024),
        ];
        for _ in 0..20 {
            let data = Dataset::build(DatasetInputs {
                players: players.clone(),
                ..Default::default()
            });
            assert_eq!(data.find_player("Will Smith", Some("LAD"), None), Some(669257));
            assert_eq!(data.find_player("will smith", Some("KC"), None), Some(519293));
            assert_eq!(data.find_player("Will Smith", None, Some(Role::Hitter)), Some(669257));
            assert_eq!(data.find_player("Will Smith", Some(""), Some(Role::Pitcher)), Some(519293));
            // Same season, no hints: lowest id.
            assert_eq!(data.find_player_id("Will Smith"), Some(519293));
        }
    }

    #[test]
    fn shared_names_prefer_recent_season() {
        let mut old = hitter_info("R");
        old.player_id = 5;
        old.season = 2019;
        let mut current = hitter_info("R");
        current.player_id = 50;
        let data = Dataset::build(DatasetInputs {
            players: vec![current.clone(), old],
            ..Default::default()
        });
        assert_eq!(data.find_player_id(&current.full_name), Some(50));
        assert_eq!(data.find_player_id("Nobody"), None);
    }

    #[test]
    fn completed_dates_skip_unplayed_days() {
        let data = Dataset::build(DatasetInputs {
            schedule: vec![
                final_game(1, "2024-04-01", "Coors Field", 10, ""),
                scheduled_game(2, "2024-04-02", "Coors Field"),
            ],
            ..Default::default()
        });
        assert_eq!(
            data.completed_dates(d("2024-03-01"), d("2024-05-01")),
            vec![d("2024-04-01")]
        );
    }

    #[test]
    fn context_for_log_joins_schedule_and_pitcher_hand() {
        let mut game = final_game(77, "2024-05-01", "Yankee Stadium", 7, "Ump");
        game.away_probable_pitcher_id = Some(PITCHER_ID);
        let mut l = log("2024-05-01", 4, 2);
        l.game_pk = 77;
        l.batting_order = Some(2);

        let data = Dataset::build(DatasetInputs {
            schedule: vec![game],
            game_logs: vec![l.clone()],
            players: vec![hitter_info("L"), pitcher_info("L")],
            ..Default::default()
        });

        let ctx = data.context_for_log(&l).unwrap();
        assert!(ctx.is_home);
        assert_eq!(ctx.team, HOME_TEAM);
        assert_eq!(ctx.opponent, AWAY_TEAM);
        assert_eq!(ctx.bats, Hand::Left);
        assert_eq!(ctx.opposing_pitcher_throws, Hand::Left);
        assert_eq!(ctx.batting_order, Some(2));
        assert_eq!(ctx.role, Role::Hitter);
        assert_eq!(data.opposing_hand(&l), Hand::Left);
        assert_eq!(data.log_team(&l), Some(HOME_TEAM));
    }

    #[test]
    fn context_for_game_rejects_other_teams() {
        let game = final_game(5, "2024-05-01", "Yankee Stadium", 7, "");
        let data = Dataset::build(DatasetInputs::default());
        assert!(data
            .context_for_scheduled(1, "X", "Houston Astros", &game, InjuryStatus::Healthy)
            .is_none());
        let ctx = data
            .context_for_scheduled(1, "X", "BOS", &game, InjuryStatus::DayToDay)
            .unwrap();
        assert!(!ctx.is_home);
        assert_eq!(ctx.injury_status, InjuryStatus::DayToDay);
    }

    #[test]
    fn usual_batting_order_is_recent_mode() {
        let mut logs = Vec::new();
        for (i, order) in [5, 5, 2, 2, 2].iter().enumerate() {
            let mut l = log(&format!("2024-04-{:02}", i + 1), 4, 1);
            l.game_pk = i as u64 + 1;
            l.batting_order = Some(*order);
            logs.push(l);
        }
        let data = Dataset::build(DatasetInputs {
            game_logs: logs,
            ..Default::default()
        });
        assert_eq!(data.usual_batting_order(PLAYER_ID, d("2024-05-01")), Some(2));
        assert_eq!(data.usual_batting_order(PLAYER_ID, d("2024-04-01")), None);
    }

    #[test]
    fn defense_uses_closest_earlier_season() {
        let data = Dataset::build(DatasetInputs {
            defense: vec![
                TeamDefense { team: "TEX".into(), season: 2022, outs_above_average: 5.0 },
                TeamDefense { team: "Texas Rangers".into(), season: 2023, outs_above_average: 20.0 },
            ],
            ..Default::default()
        });
        assert_eq!(data.defense_for("Texas Rangers", 2024), Some(20.0));
        assert_eq!(data.defense_for("TEX", 2022), Some(5.0));
        assert_eq!(data.defense_for("TEX", 2021), None);
    }
}
