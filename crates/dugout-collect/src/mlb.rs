// MLB Stats API client: schedule, teams, players, hitting game logs and
// boxscore batting orders.

use crate::{get_json, http_client, CollectError, Throttle};
use chrono::{DateTime, NaiveDate, Utc};
use dugout_core::config::CollectConfig;
use dugout_core::data::{DayNight, GameLog, PlayerInfo, ScheduledGame, TeamInfo};
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{debug, info, warn};

const MLB_API_URL: &str = "https://statsapi.mlb.com";

pub struct MlbClient {
    http: reqwest::Client,
    base_url: String,
    throttle: Throttle,
}

impl MlbClient {
    pub fn new(config: &CollectConfig) -> Result<Self, CollectError> {
        Ok(MlbClient {
            http: http_client(config)?,
            base_url: MLB_API_URL.to_string(),
            throttle: Throttle::new(
                config.requests_per_pause,
                Duration::from_millis(config.pause_ms),
            ),
        })
    }

    /// Point the client at another host (a mirror, or a local test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn get(&self, path_and_query: &str) -> Result<Value, CollectError> {
        let url = format!("{}{}", self.base_url, path_and_query);
        get_json(&self.http, &self.throttle, &url, None).await
    }

    /// Regular-season schedule with probable pitchers and umpires.
    pub async fn fetch_schedule(&self, season: i32) -> Result<Vec<ScheduledGame>, CollectError> {
        let v = self
            .get(&format!(
                "/api/v1/schedule?sportId=1&season={season}&gameType=R&hydrate=probablePitcher,officials,venue"
            ))
            .await?;
        let games = parse_schedule(&v, season);
        info!("fetched {} games for {season}", games.len());
        Ok(games)
    }

    pub async fn fetch_teams(&self, season: i32) -> Result<Vec<TeamInfo>, CollectError> {
        let v = self
            .get(&format!("/api/v1/teams?sportId=1&season={season}"))
            .await?;
        Ok(parse_teams(&v))
    }

    /// Every player on a major-league roster during `season`, with team ids
    /// resolved to names.
    pub async fn fetch_players(&self, season: i32) -> Result<Vec<PlayerInfo>, CollectError> {
        let teams: HashMap<u64, String> = self
            .fetch_teams(season)
            .await?
            .into_iter()
            .map(|t| (t.team_id as u64, t.name))
            .collect();
        let v = self
            .get(&format!("/api/v1/sports/1/players?season={season}"))
            .await?;
        let players = parse_players(&v, &teams, season);
        info!("fetched {} players for {season}", players.len());
        Ok(players)
    }

    pub async fn fetch_game_log(
        &self,
        player_id: u64,
        player_name: &str,
        season: i32,
    ) -> Result<Vec<GameLog>, CollectError> {
        let v = self
            .get(&format!(
                "/api/v1/people/{player_id}/stats?stats=gameLog&season={season}&group=hitting"
            ))
            .await?;
        let logs = parse_game_log(&v, player_id, player_name);
        debug!("{player_name}: {} games in {season}", logs.len());
        Ok(logs)
    }

    /// Starting batting-order spot (1-9) per player id for one game.
    pub async fn fetch_batting_orders(
        &self,
        game_pk: u64,
    ) -> Result<HashMap<u64, u32>, CollectError> {
        let v = self.get(&format!("/api/v1/game/{game_pk}/boxscore")).await?;
        Ok(parse_batting_orders(&v))
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn str_at<'a>(v: &'a Value, pointer: &str) -> &'a str {
    v.pointer(pointer).and_then(Value::as_str).unwrap_or("")
}

fn u64_at(v: &Value, pointer: &str) -> Option<u64> {
    let field = v.pointer(pointer)?;
    field
        .as_u64()
        .or_else(|| field.as_str().and_then(|s| s.parse().ok()))
}

fn u32_at(v: &Value, pointer: &str) -> u32 {
    u64_at(v, pointer)
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(0)
}

/// Completed games keep "Final"; postponed and cancelled games report their
/// detailed state even though the API marks them final.
fn game_status(game: &Value) -> String {
    let detailed = str_at(game, "/status/detailedState");
    let abstract_state = str_at(game, "/status/abstractGameState");
    let lower = detailed.to_ascii_lowercase();
    if abstract_state == "Final" && !lower.contains("postponed") && !lower.contains("cancel") {
        "Final".to_string()
    } else if detailed.is_empty() {
        abstract_state.to_string()
    } else {
        detailed.to_string()
    }
}

pub fn parse_schedule(v: &Value, season: i32) -> Vec<ScheduledGame> {
    let mut games = Vec::new();
    let dates = v["dates"].as_array().map(|a| a.as_slice()).unwrap_or(&[]);
    for date in dates {
        let day = date["date"].as_str().unwrap_or("");
        for game in date["games"].as_array().map(|a| a.as_slice()).unwrap_or(&[]) {
            let Some(game_pk) = u64_at(game, "/gamePk") else {
                warn!("schedule entry without gamePk on {day}");
                continue;
            };
            let official = game["officialDate"].as_str().unwrap_or(day);
            let Ok(game_date) = NaiveDate::parse_from_str(official, "%Y-%m-%d") else {
                warn!("game {game_pk}: bad date '{official}'");
                continue;
            };
            let game_datetime = game["gameDate"]
                .as_str()
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|d| d.with_timezone(&Utc));
            let day_night = match game["dayNight"].as_str() {
                Some("day") => DayNight::Day,
                Some("night") => DayNight::Night,
                _ => DayNight::Unknown,
            };
            let umpire = game["officials"]
                .as_array()
                .and_then(|officials| {
                    officials
                        .iter()
                        .find(|o| o["officialType"].as_str() == Some("Home Plate"))
                })
                .map(|o| str_at(o, "/official/fullName").to_string())
                .unwrap_or_default();

            games.push(ScheduledGame {
                game_pk,
                game_date,
                game_datetime,
                season: game["season"]
                    .as_str()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(season),
                status: game_status(game),
                home_team: str_at(game, "/teams/home/team/name").to_string(),
                away_team: str_at(game, "/teams/away/team/name").to_string(),
                venue: str_at(game, "/venue/name").to_string(),
                day_night,
                home_score: u64_at(game, "/teams/home/score").map(|s| s as u32),
                away_score: u64_at(game, "/teams/away/score").map(|s| s as u32),
                home_probable_pitcher_id: u64_at(game, "/teams/home/probablePitcher/id"),
                home_probable_pitcher: str_at(game, "/teams/home/probablePitcher/fullName")
                    .to_string(),
                away_probable_pitcher_id: u64_at(game, "/teams/away/probablePitcher/id"),
                away_probable_pitcher: str_at(game, "/teams/away/probablePitcher/fullName")
                    .to_string(),
                home_plate_umpire: umpire,
            });
        }
    }
    games
}

pub fn parse_teams(v: &Value) -> Vec<TeamInfo> {
    v["teams"]
        .as_array()
        .map(|teams| {
            teams
                .iter()
                .filter_map(|t| {
                    Some(TeamInfo {
                        team_id: u32::try_from(u64_at(t, "/id")?).ok()?,
                        name: str_at(t, "/name").to_string(),
                        abbreviation: str_at(t, "/abbreviation").to_string(),
                        venue: str_at(t, "/venue/name").to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_players(v: &Value, teams: &HashMap<u64, String>, season: i32) -> Vec<PlayerInfo> {
    v["people"]
        .as_array()
        .map(|people| {
            people
                .iter()
                .filter_map(|p| {
                    let player_id = u64_at(p, "/id")?;
                    let full_name = str_at(p, "/fullName");
                    if full_name.is_empty() {
                        return None;
                    }
                    Some(PlayerInfo {
                        player_id,
                        full_name: full_name.to_string(),
                        team: u64_at(p, "/currentTeam/id")
                            .and_then(|id| teams.get(&id).cloned())
                            .unwrap_or_default(),
                        position: str_at(p, "/primaryPosition/abbreviation").to_string(),
                        bats: str_at(p, "/batSide/code").to_string(),
                        throws: str_at(p, "/pitchHand/code").to_string(),
                        season,
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn parse_game_log(v: &Value, player_id: u64, player_name: &str) -> Vec<GameLog> {
    let splits = v
        .pointer("/stats/0/splits")
        .and_then(Value::as_array)
        .map(|a| a.as_slice())
        .unwrap_or(&[]);
    let mut logs = Vec::with_capacity(splits.len());
    for split in splits {
        let Ok(game_date) = NaiveDate::parse_from_str(str_at(split, "/date"), "%Y-%m-%d") else {
            continue;
        };
        let Some(game_pk) = u64_at(split, "/game/gamePk") else {
            continue;
        };
        let stat = &split["stat"];
        logs.push(GameLog {
            player_id,
            game_date,
            game_pk,
            is_home: split["isHome"].as_bool().unwrap_or(false),
            is_win: split["isWin"].as_bool().unwrap_or(false),
            opponent: str_at(split, "/opponent/name").to_string(),
            ab: u32_at(stat, "/atBats"),
            h: u32_at(stat, "/hits"),
            r: u32_at(stat, "/runs"),
            rbi: u32_at(stat, "/rbi"),
            hr: u32_at(stat, "/homeRuns"),
            doubles: u32_at(stat, "/doubles"),
            triples: u32_at(stat, "/triples"),
            bb: u32_at(stat, "/baseOnBalls"),
            so: u32_at(stat, "/strikeOuts"),
            sb: u32_at(stat, "/stolenBases"),
            player_name: player_name.to_string(),
            batting_order: None,
        });
    }
    logs
}

/// Starters only: the boxscore's `battingOrder` lists the nine starters in
/// order for each side.
pub fn parse_batting_orders(v: &Value) -> HashMap<u64, u32> {
    let mut orders = HashMap::new();
    for side in ["home", "away"] {
        let Some(ids) = v
            .pointer(&format!("/teams/{side}/battingOrder"))
            .and_then(Value::as_array)
        else {
            continue;
        };
        for (i, id) in ids.iter().enumerate() {
            let id = id.as_u64().or_else(|| id.as_str().and_then(|s| s.parse().ok()));
            if let Some(id) = id {
                orders.insert(id, i as u32 + 1);
            }
        }
    }
    orders
}
