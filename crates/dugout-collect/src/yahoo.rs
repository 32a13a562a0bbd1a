// Yahoo Fantasy roster client.
//
// Yahoo's JSON nests everything in arrays of single-key objects and
// numbered maps, so fields are located by searching for their keys rather
// than by fixed paths.

use crate::{get_json, http_client, CollectError, Throttle};
use dugout_core::config::{CollectConfig, CredentialsConfig};
use dugout_core::data::RosterEntry;
use serde_json::Value;
use std::time::Duration;
use tracing::{info, warn};

const YAHOO_API_URL: &str = "https://fantasysports.yahooapis.com/fantasy/v2";

pub struct YahooClient {
    http: reqwest::Client,
    throttle: Throttle,
    base_url: String,
    access_token: Option<String>,
}

impl YahooClient {
    pub fn new(
        config: &CollectConfig,
        credentials: &CredentialsConfig,
    ) -> Result<Self, CollectError> {
        Ok(YahooClient {
            http: http_client(config)?,
            throttle: Throttle::new(
                config.requests_per_pause,
                Duration::from_millis(config.pause_ms),
            ),
            base_url: YAHOO_API_URL.to_string(),
            access_token: credentials
                .yahoo_access_token
                .clone()
                .filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn fetch_roster(&self, team_key: &str) -> Result<Vec<RosterEntry>, CollectError> {
        let token = self
            .access_token
            .as_deref()
            .ok_or(CollectError::MissingCredential("yahoo_access_token"))?;
        let url = format!("{}/team/{team_key}/roster?format=json", self.base_url);
        let v = get_json(&self.http, &self.throttle, &url, Some(token)).await?;
        let entries = parse_roster(&v, team_key);
        info!("{team_key}: {} rostered players", entries.len());
        Ok(entries)
    }

    /// Rosters for every configured team. A team that fails is logged and
    /// skipped; the error is returned only when nothing was fetched.
    pub async fn fetch_rosters(
        &self,
        team_keys: &[String],
    ) -> Result<Vec<RosterEntry>, CollectError> {
        let mut all = Vec::new();
        let mut last_error = None;
        for key in team_keys {
            match self.fetch_roster(key).await {
                Ok(entries) => all.extend(entries),
                Err(CollectError::MissingCredential(field)) => {
                    return Err(CollectError::MissingCredential(field))
                }
                Err(e) => {
                    warn!("roster for {key} failed: {e}");
                    last_error = Some(e);
                }
            }
        }
        match last_error {
            Some(e) if all.is_empty() => Err(e),
            _ => Ok(all),
        }
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// First string value stored under `key`, depth-first.
fn find_str<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    match v {
        Value::Object(map) => {
            if let Some(s) = map.get(key).and_then(Value::as_str) {
                return Some(s);
            }
            map.values().find_map(|child| find_str(child, key))
        }
        Value::Array(items) => items.iter().find_map(|child| find_str(child, key)),
        _ => None,
    }
}

fn collect_players<'a>(v: &'a Value, out: &mut Vec<&'a Value>) {
    match v {
        Value::Object(map) => {
            if let Some(player) = map.get("player") {
                out.push(player);
                return;
            }
            map.values().for_each(|child| collect_players(child, out));
        }
        Value::Array(items) => items.iter().for_each(|child| collect_players(child, out)),
        _ => {}
    }
}

fn player_name(player: &Value) -> Option<&str> {
    match find_str(player, "full") {
        Some(name) => Some(name),
        None => find_str(player, "name"),
    }
}

pub fn parse_roster(v: &Value, team_key: &str) -> Vec<RosterEntry> {
    let team_meta = v.pointer("/fantasy_content/team/0").unwrap_or(&Value::Null);
    let fantasy_team = find_str(team_meta, "name").unwrap_or(team_key).to_string();

    let mut players = Vec::new();
    collect_players(v, &mut players);

    players
        .into_iter()
        .filter_map(|p| {
            let Some(name) = player_name(p) else {
                warn!("{team_key}: roster entry without a player name");
                return None;
            };
            Some(RosterEntry {
                fantasy_team: fantasy_team.clone(),
                player_name: name.trim().to_string(),
                mlb_team: find_str(p, "editorial_team_abbr").unwrap_or("").to_string(),
                position: find_str(p, "display_position").unwrap_or("").to_string(),
                status: find_str(p, "status").unwrap_or("").to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::serve;
    use serde_json::json;

    fn roster_json() -> Value {
        json!({"fantasy_content": {"team": [
            [{"team_key": "431.l.1.t.3"}, {"team_id": "3"}, {"name": "Bronx Bombers"}],
            {"roster": {"0": {"players": {
                "0": {"player": [[
                    {"player_key": "431.p.9557"},
                    {"name": {"full": "Aaron Judge", "first": "Aaron"}},
                    {"editorial_team_abbr": "NYY"},
                    {"display_position": "OF"}
                ], {"selected_position": [{"position": "OF"}]}]},
                "1": {"player": [[
                    {"name": {"full": "Mike Trout"}},
                    {"status": "IL10"},
                    {"editorial_team_abbr": "LAA"},
                    {"display_position": "OF"}
                ]]},
                "2": {"player": [[{"editorial_team_abbr": "BOS"}]]},
                "count": 3
            }}}}
        ]}})
    }

    #[test]
    fn parses_nested_roster() {
        let entries = parse_roster(&roster_json(), "431.l.1.t.3");
        assert_eq!(entries.len(), 2);
        let judge = entries.iter().find(|e| e.player_name == "Aaron Judge").unwrap();
        assert_eq!(judge.fantasy_team, "Bronx Bombers");
        assert_eq!(judge.mlb_team, "NYY");
        assert_eq!(judge.status, "");
        let trout = entries.iter().find(|e| e.player_name == "Mike Trout").unwrap();
        assert_eq!(trout.status, "IL10");
    }

    #[test]
    fn team_key_stands_in_for_missing_name() {
        let v = json!({"fantasy_content": {"team": [[], {"roster": {}}]}});
        assert!(parse_roster(&v, "t.1").is_empty());
        let v = json!({"fantasy_content": {"team": [[{"team_key": "t.1"}],
            {"roster": {"0": {"players": {"0": {"player": [[{"name": {"full": "A"}}]]}}}}}]}});
        assert_eq!(parse_roster(&v, "t.1")[0].fantasy_team, "t.1");
    }

    fn test_config() -> CollectConfig {
        CollectConfig {
            requests_per_pause: 10,
            pause_ms: 0,
            timeout_secs: 5,
            season: None,
        }
    }

    #[tokio::test]
    async fn missing_token_is_reported() {
        let client = YahooClient::new(&test_config(), &CredentialsConfig::default()).unwrap();
        match client.fetch_rosters(&["t.1".to_string()]).await {
            Err(CollectError::MissingCredential(field)) => assert_eq!(field, "yahoo_access_token"),
            other => panic!("expected missing credential, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fetches_with_token() {
        let base = serve(200, roster_json().to_string(), 1).await;
        let creds = CredentialsConfig {
            yahoo_access_token: Some("token".into()),
        };
        let client = YahooClient::new(&test_config(), &creds)
            .unwrap()
            .with_base_url(base);
        let entries = client.fetch_roster("431.l.1.t.3").await.unwrap();
        assert_eq!(entries.len(), 2);
    }
}
