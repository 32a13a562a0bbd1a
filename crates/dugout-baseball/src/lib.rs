// Baseball domain logic: per-game context, the factor analyzers, the weighted
// combiner, fantasy points, backtesting and weight optimization.

pub mod backtest;
pub mod combiner;
pub mod context;
pub mod factors;
pub mod metrics;
pub mod optimize;
pub mod points;
pub mod recommend;
pub mod stats;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::context::{Dataset, DatasetInputs, GameContext, Role};
    use chrono::{Datelike, NaiveDate};
    use dugout_core::data::{
        DayNight, GameLog, Hand, InjuryStatus, PlayerInfo, ScheduledGame,
    };

    pub const PLAYER_ID: u64 = 100;
    pub const PITCHER_ID: u64 = 900;
    pub const HOME_TEAM: &str = "New York Yankees";
    pub const AWAY_TEAM: &str = "Boston Red Sox";

    pub fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// A home game log for `PLAYER_ID`; `game_pk` is derived from the date.
    pub fn log(date: &str, ab: u32, h: u32) -> GameLog {
        let game_date = d(date);
        GameLog {
            player_id: PLAYER_ID,
            game_date,
            game_pk: game_date.num_days_from_ce() as u64,
            is_home: true,
            is_win: false,
            opponent: AWAY_TEAM.into(),
            ab,
            h,
            r: 0,
            rbi: 0,
            hr: 0,
            doubles: 0,
            triples: 0,
            bb: 0,
            so: 0,
            sb: 0,
            player_name: "Test Hitter".into(),
            batting_order: None,
        }
    }

    /// Consecutive daily logs starting at `start`, one per (ab, h) pair.
    pub fn daily_logs(start: &str, lines: &[(u32, u32)]) -> Vec<GameLog> {
        let start = d(start);
        lines
            .iter()
            .enumerate()
            .map(|(i, (ab, h))| {
                let date = start + chrono::Duration::days(i as i64);
                log(&date.format("%Y-%m-%d").to_string(), *ab, *h)
            })
            .collect()
    }

    /// Final game, home team NYY, with all `runs` credited to the home side.
    pub fn final_game(pk: u64, date: &str, venue: &str, runs: u32, umpire: &str) -> ScheduledGame {
        ScheduledGame {
            status: "Final".into(),
            home_score: Some(runs),
            away_score: Some(0),
            home_plate_umpire: umpire.into(),
            ..scheduled_game(pk, date, venue)
        }
    }

    pub fn scheduled_game(pk: u64, date: &str, venue: &str) -> ScheduledGame {
        let game_date = d(date);
        ScheduledGame {
            game_pk: pk,
            game_date,
            game_datetime: None,
            season: game_date.year(),
            status: "Scheduled".into(),
            home_team: HOME_TEAM.into(),
            away_team: AWAY_TEAM.into(),
            venue: venue.into(),
            day_night: DayNight::Night,
            home_score: None,
            away_score: None,
            home_probable_pitcher_id: None,
            home_probable_pitcher: String::new(),
            away_probable_pitcher_id: None,
            away_probable_pitcher: String::new(),
            home_plate_umpire: String::new(),
        }
    }

    pub fn hitter_info(bats: &str) -> PlayerInfo {
        PlayerInfo {
            player_id: PLAYER_ID,
            full_name: "Test Hitter".into(),
            team: HOME_TEAM.into(),
            position: "OF".into(),
            bats: bats.into(),
            throws: "R".into(),
            season: 2024,
        }
    }

    pub fn pitcher_info(throws: &str) -> PlayerInfo {
        PlayerInfo {
            player_id: PITCHER_ID,
            full_name: "Test Pitcher".into(),
            team: AWAY_TEAM.into(),
            position: "P".into(),
            bats: "R".into(),
            throws: throws.into(),
            season: 2024,
        }
    }

    pub fn dataset_with_logs(logs: Vec<GameLog>) -> Dataset {
        Dataset::build(DatasetInputs {
            game_logs: logs,
            ..Default::default()
        })
    }

    /// A home night game at Yankee Stadium for `PLAYER_ID` against Boston.
    pub fn ctx(date: &str) -> GameContext {
        let date = d(date);
        GameContext {
            date,
            season: date.year(),
            game_pk: 1,
            player_id: PLAYER_ID,
            player_name: "Test Hitter".into(),
            role: Role::Hitter,
            bats: Hand::Right,
            team: HOME_TEAM.into(),
            opponent: AWAY_TEAM.into(),
            is_home: true,
            venue: "Yankee Stadium".into(),
            day_night: DayNight::Night,
            start_time: None,
            weather: None,
            opposing_pitcher_id: None,
            opposing_pitcher_throws: Hand::Unknown,
            umpire: String::new(),
            batting_order: None,
            injury_status: InjuryStatus::Healthy,
        }
    }

    pub fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }
}
