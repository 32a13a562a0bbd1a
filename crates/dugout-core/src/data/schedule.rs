// Season schedule rows (mlb_{year}_schedule.csv).

use super::{lenient_opt_u32, lenient_opt_u64, load_with, read_rows, DataError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DayNight {
    Day,
    Night,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One regular-season game as published by the MLB Stats API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledGame {
    pub game_pk: u64,
    pub game_date: NaiveDate,
    /// First pitch in UTC; absent for postponed or TBD games.
    #[serde(default)]
    pub game_datetime: Option<DateTime<Utc>>,
    pub season: i32,
    pub status: String,
    pub home_team: String,
    pub away_team: String,
    pub venue: String,
    #[serde(default)]
    pub day_night: DayNight,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub home_score: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt_u32")]
    pub away_score: Option<u32>,
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub home_probable_pitcher_id: Option<u64>,
    #[serde(default)]
    pub home_probable_pitcher: String,
    #[serde(default, deserialize_with = "lenient_opt_u64")]
    pub away_probable_pitcher_id: Option<u64>,
    #[serde(default)]
    pub away_probable_pitcher: String,
    #[serde(default)]
    pub home_plate_umpire: String,
}

impl ScheduledGame {
    pub fn is_final(&self) -> bool {
        self.status.trim().eq_ignore_ascii_case("final")
    }

    /// Runs scored by both teams, when the game has a final score.
    pub fn total_runs(&self) -> Option<u32> {
        if !self.is_final() {
            return None;
        }
        Some(self.home_score? + self.away_score?)
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team.eq_ignore_ascii_case(team) || self.away_team.eq_ignore_ascii_case(team)
    }

    pub fn is_home_team(&self, team: &str) -> bool {
        self.home_team.eq_ignore_ascii_case(team)
    }

    /// The other team in this game, if `team` plays in it.
    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.home_team.eq_ignore_ascii_case(team) {
            Some(&self.away_team)
        } else if self.away_team.eq_ignore_ascii_case(team) {
            Some(&self.home_team)
        } else {
            None
        }
    }

    /// Probable starter facing `team`'s hitters.
    pub fn opposing_pitcher_id(&self, team: &str) -> Option<u64> {
        if self.is_home_team(team) {
            self.away_probable_pitcher_id
        } else {
            self.home_probable_pitcher_id
        }
    }
}

fn schedule_from_reader<R: Read>(rdr: R) -> Result<Vec<ScheduledGame>, csv::Error> {
    let mut games: Vec<ScheduledGame> = read_rows(rdr, "schedule")?;
    for g in games.iter_mut() {
        g.home_team = g.home_team.trim().to_string();
        g.away_team = g.away_team.trim().to_string();
        g.venue = g.venue.trim().to_string();
        g.home_plate_umpire = g.home_plate_umpire.trim().to_string();
    }
    Ok(games)
}

/// Load one season's schedule CSV.
pub fn load_schedule(path: &Path) -> Result<Vec<ScheduledGame>, DataError> {
    load_with(path, schedule_from_reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "game_pk,game_date,game_datetime,season,status,home_team,away_team,venue,day_night,home_score,away_score,home_probable_pitcher_id,home_probable_pitcher,away_probable_pitcher_id,away_probable_pitcher,home_plate_umpire";

    #[test]
    fn parses_final_and_scheduled_games() {
        let csv_data = format!(
            "{HEADER}\n\
746000,2024-04-01,2024-04-01T23:05:00Z,2024,Final,New York Yankees,Boston Red Sox,Yankee Stadium,night,5,3,543037,Gerrit Cole,519242,Chris Sale,Angel Hernandez\n\
746001,2024-09-30,,2024,Scheduled,Chicago Cubs,St. Louis Cardinals,Wrigley Field,day,,,,,,,"
        );
        let games = schedule_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(games.len(), 2);

        let g = &games[0];
        assert!(g.is_final());
        assert_eq!(g.total_runs(), Some(8));
        assert_eq!(g.day_night, DayNight::Night);
        assert_eq!(g.home_probable_pitcher_id, Some(543037));
        assert_eq!(g.opposing_pitcher_id("New York Yankees"), Some(519242));
        assert_eq!(g.opponent_of("boston red sox"), Some("New York Yankees"));
        assert!(g.game_datetime.is_some());

        let g = &games[1];
        assert!(!g.is_final());
        assert_eq!(g.total_runs(), None);
        assert!(g.game_datetime.is_none());
        assert_eq!(g.day_night, DayNight::Day);
        assert!(g.home_probable_pitcher_id.is_none());
        assert_eq!(g.opponent_of("Houston Astros"), None);
    }

    #[test]
    fn bad_date_row_skipped() {
        let csv_data = format!(
            "{HEADER}\n\
1,not-a-date,,2024,Final,A,B,V,day,1,2,,,,,\n\
2,2024-05-05,,2024,Final,A,B,V,,1,2,,,,,"
        );
        let games = schedule_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].game_pk, 2);
        assert_eq!(games[0].day_night, DayNight::Unknown);
    }

    #[test]
    fn final_without_scores_has_no_runs() {
        let csv_data = format!("{HEADER}\n3,2024-05-05,,2024,Final,A,B,V,day,,,,,,,");
        let games = schedule_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(games[0].total_runs(), None);
    }
}
