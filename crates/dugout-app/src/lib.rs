// Application layer: the commands behind the `dugout` binary.
//
// Each module loads what it needs from the data directory, runs the
// factor model from `dugout_baseball`, and writes its CSV or JSON output.
// Pure functions over an in-memory `Dataset` sit next to the file-based
// entry points so both can be tested.

pub mod backfill;
pub mod backtest;
pub mod dataset;
pub mod recommend;
pub mod refresh;
pub mod report;
pub mod schedule_helper;
pub mod waiver;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::{Duration, NaiveDate, TimeZone, Utc};
    use dugout_baseball::context::{Dataset, DatasetInputs};
    use dugout_core::config::{
        BacktestConfig, CollectConfig, Config, CredentialsConfig, DataConfig, OptimizerConfig,
        RecommendConfig, ScoringConfig, WeightsConfig, YahooConfig,
    };
    use dugout_core::data::{DayNight, GameLog, PlayerInfo, RosterEntry, ScheduledGame};
    use std::path::Path;

    pub const JUDGE_ID: u64 = 592450;

    pub fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn roster_entry(name: &str, team: &str, position: &str, status: &str) -> RosterEntry {
        RosterEntry {
            fantasy_team: "Bronx Bombers".into(),
            player_name: name.into(),
            mlb_team: team.into(),
            position: position.into(),
            status: status.into(),
        }
    }

    pub fn player(id: u64, name: &str, team: &str, position: &str) -> PlayerInfo {
        PlayerInfo {
            player_id: id,
            full_name: name.into(),
            team: team.into(),
            position: position.into(),
            bats: "R".into(),
            throws: "R".into(),
            season: 2024,
        }
    }

    /// Yankees home game against Boston at 23:05 UTC.
    pub fn game(pk: u64, date: NaiveDate, status: &str) -> ScheduledGame {
        let final_game = status == "Final";
        ScheduledGame {
            game_pk: pk,
            game_date: date,
            game_datetime: date
                .and_hms_opt(23, 5, 0)
                .map(|t| Utc.from_utc_datetime(&t)),
            season: 2024,
            status: status.into(),
            home_team: "New York Yankees".into(),
            away_team: "Boston Red Sox".into(),
            venue: "Yankee Stadium".into(),
            day_night: DayNight::Night,
            home_score: final_game.then_some(5),
            away_score: final_game.then_some(3),
            home_probable_pitcher_id: None,
            home_probable_pitcher: String::new(),
            away_probable_pitcher_id: None,
            away_probable_pitcher: String::new(),
            home_plate_umpire: String::new(),
        }
    }

    pub fn judge_log(pk: u64, date: NaiveDate, ab: u32, h: u32, hr: u32) -> GameLog {
        GameLog {
            player_id: JUDGE_ID,
            game_date: date,
            game_pk: pk,
            is_home: true,
            is_win: true,
            opponent: "Boston Red Sox".into(),
            ab,
            h,
            r: hr,
            rbi: hr,
            hr,
            doubles: 0,
            triples: 0,
            bb: 1,
            so: 1,
            sb: 0,
            player_name: "Aaron Judge".into(),
            batting_order: Some(2),
        }
    }

    /// Twelve completed May games for Judge, then a scheduled game on
    /// 2024-06-01 (game_pk 5000).
    pub fn sample_inputs() -> DatasetInputs {
        let mut inputs = DatasetInputs {
            players: vec![
                player(JUDGE_ID, "Aaron Judge", "New York Yankees", "RF"),
                player(543037, "Gerrit Cole", "New York Yankees", "SP"),
                player(1, "Kris Bryant", "Colorado Rockies", "1B"),
            ],
            ..Default::default()
        };
        let start = d("2024-05-01");
        for i in 0..12u32 {
            let date = start + Duration::days(i as i64);
            let pk = 4000 + i as u64;
            inputs.schedule.push(game(pk, date, "Final"));
            inputs
                .game_logs
                .push(judge_log(pk, date, 4, 1 + i % 3, u32::from(i % 4 == 0)));
        }
        inputs.schedule.push(game(5000, d("2024-06-01"), "Scheduled"));
        inputs
    }

    pub fn sample_dataset() -> Dataset {
        Dataset::build(sample_inputs())
    }

    /// Settings rooted at `dir`, with a small optimizer so tests stay quick.
    pub fn test_config(dir: &Path) -> Config {
        let path = |name: &str| dir.join(name).display().to_string();
        Config {
            data: DataConfig {
                dir: path("data"),
                output_dir: path("out"),
                logs_dir: path("logs"),
            },
            weights: WeightsConfig {
                global_path: path("config/factor_weights.json"),
                player_path: path("config/player_weights.json"),
            },
            backtest: BacktestConfig {
                start_year: 2024,
                end_year: Some(2024),
                min_games: 10,
            },
            optimizer: OptimizerConfig {
                max_iter: 3,
                pop_size: 2,
                ..OptimizerConfig::default()
            },
            scoring: ScoringConfig::default(),
            recommend: RecommendConfig::default(),
            collect: CollectConfig {
                requests_per_pause: 10,
                pause_ms: 0,
                timeout_secs: 5,
                season: Some(2024),
            },
            yahoo: YahooConfig::default(),
            credentials: CredentialsConfig::default(),
        }
    }
}
