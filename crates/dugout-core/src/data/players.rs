// Player directory (mlb_all_players_{year}.csv) and teams (mlb_all_teams.csv).

use super::{load_with, read_rows, DataError};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;

/// Batting side or throwing hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hand {
    Left,
    Right,
    Switch,
    Unknown,
}

impl Hand {
    pub fn parse(code: &str) -> Hand {
        match code.trim().to_ascii_uppercase().as_str() {
            "L" | "LEFT" => Hand::Left,
            "R" | "RIGHT" => Hand::Right,
            "S" | "B" | "SWITCH" | "BOTH" => Hand::Switch,
            _ => Hand::Unknown,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Hand::Left => "L",
            Hand::Right => "R",
            Hand::Switch => "S",
            Hand::Unknown => "",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerInfo {
    pub player_id: u64,
    pub full_name: String,
    /// Full team name ("Los Angeles Dodgers"); empty for free agents.
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub bats: String,
    #[serde(default)]
    pub throws: String,
    pub season: i32,
}

impl PlayerInfo {
    pub fn bats(&self) -> Hand {
        Hand::parse(&self.bats)
    }

    pub fn throws(&self) -> Hand {
        Hand::parse(&self.throws)
    }

    /// Pitchers (SP, RP, P) are excluded from hitter scoring. Two-way
    /// players are listed as TWP and count as hitters.
    pub fn is_pitcher(&self) -> bool {
        is_pitcher_position(&self.position)
    }
}

pub fn is_pitcher_position(position: &str) -> bool {
    let p = position.trim().to_ascii_uppercase();
    p == "P" || p == "SP" || p == "RP" || p == "SP,RP" || p == "RP,SP"
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub team_id: u32,
    pub name: String,
    pub abbreviation: String,
    #[serde(default)]
    pub venue: String,
}

fn players_from_reader<R: Read>(rdr: R) -> Result<Vec<PlayerInfo>, csv::Error> {
    let mut players: Vec<PlayerInfo> = read_rows(rdr, "player")?;
    players.retain(|p| !p.full_name.trim().is_empty());
    for p in players.iter_mut() {
        p.full_name = p.full_name.trim().to_string();
        p.team = p.team.trim().to_string();
        p.position = p.position.trim().to_string();
    }
    Ok(players)
}

fn teams_from_reader<R: Read>(rdr: R) -> Result<Vec<TeamInfo>, csv::Error> {
    let mut teams: Vec<TeamInfo> = read_rows(rdr, "team")?;
    for t in teams.iter_mut() {
        t.name = t.name.trim().to_string();
        t.abbreviation = t.abbreviation.trim().to_string();
        t.venue = t.venue.trim().to_string();
    }
    Ok(teams)
}

pub fn load_players(path: &Path) -> Result<Vec<PlayerInfo>, DataError> {
    load_with(path, players_from_reader)
}

pub fn load_teams(path: &Path) -> Result<Vec<TeamInfo>, DataError> {
    load_with(path, teams_from_reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hand_parsing() {
        assert_eq!(Hand::parse("l"), Hand::Left);
        assert_eq!(Hand::parse(" R "), Hand::Right);
        assert_eq!(Hand::parse("S"), Hand::Switch);
        assert_eq!(Hand::parse(""), Hand::Unknown);
        assert_eq!(Hand::Switch.code(), "S");
    }

    #[test]
    fn players_parse_and_blank_names_dropped() {
        let csv_data = "\
player_id,full_name,team,position,bats,throws,season
660271,Shohei Ohtani,Los Angeles Dodgers,TWP,L,R,2024
543037,Gerrit Cole,New York Yankees,P,R,R,2024
1,   ,Nowhere,C,R,R,2024";

        let players = players_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].bats(), Hand::Left);
        assert!(!players[0].is_pitcher());
        assert!(players[1].is_pitcher());
        assert_eq!(players[1].throws(), Hand::Right);
    }

    #[test]
    fn teams_parse() {
        let csv_data = "\
team_id,name,abbreviation,venue
147,New York Yankees,NYY,Yankee Stadium";
        let teams = teams_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(teams[0].abbreviation, "NYY");
        assert_eq!(teams[0].venue, "Yankee Stadium");
    }
}
