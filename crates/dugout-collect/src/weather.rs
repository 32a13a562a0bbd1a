// Open-Meteo hourly weather, sampled at each game's first pitch.

use crate::{get_json, http_client, CollectError, Throttle};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use dugout_core::config::CollectConfig;
use dugout_core::data::{ScheduledGame, WeatherObservation};
use dugout_core::venues::find_venue;
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::{info, warn};

const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";
const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";
const HOURLY_VARS: &str =
    "temperature_2m,wind_speed_10m,wind_direction_10m,relative_humidity_2m,weather_code";

/// The archive lags real time by a few days; anything newer comes from the
/// forecast endpoint.
const ARCHIVE_LAG_DAYS: i64 = 5;

/// Observations further than this from first pitch are not used.
const MAX_OFFSET_HOURS: i64 = 3;

pub struct WeatherClient {
    http: reqwest::Client,
    throttle: Throttle,
    archive_url: String,
    forecast_url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Archive,
    Forecast,
}

/// One hourly request: a venue's games on one side of the archive cutoff.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestWindow<'a> {
    pub endpoint: Endpoint,
    pub start: NaiveDate,
    /// Readings are in UTC, so the request runs through the day after the
    /// last game to cover night games that start after midnight UTC.
    pub end: NaiveDate,
    pub games: Vec<&'a ScheduledGame>,
}

/// Split one venue's games into an archive window, for games whose readings
/// through the next UTC day all fall before the archive cutoff
/// (`ARCHIVE_LAG_DAYS` before `today`), and a forecast window for the rest.
pub fn request_windows<'a>(games: &[&'a ScheduledGame], today: NaiveDate) -> Vec<RequestWindow<'a>> {
    let cutoff = today - Duration::days(ARCHIVE_LAG_DAYS);
    let (past, recent): (Vec<&ScheduledGame>, Vec<&ScheduledGame>) = games
        .iter()
        .copied()
        .partition(|g| g.game_date + Duration::days(1) < cutoff);
    [(Endpoint::Archive, past), (Endpoint::Forecast, recent)]
        .into_iter()
        .filter_map(|(endpoint, games)| {
            let start = games.iter().map(|g| g.game_date).min()?;
            let end = games.iter().map(|g| g.game_date).max()? + Duration::days(1);
            Some(RequestWindow {
                endpoint,
                start,
                end,
                games,
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct HourlySeries {
    pub times: Vec<NaiveDateTime>,
    pub temperature_c: Vec<Option<f64>>,
    pub wind_speed_kmh: Vec<Option<f64>>,
    pub wind_direction: Vec<Option<f64>>,
    pub humidity: Vec<Option<f64>>,
    pub weather_code: Vec<Option<f64>>,
}

impl WeatherClient {
    pub fn new(config: &CollectConfig) -> Result<Self, CollectError> {
        Ok(WeatherClient {
            http: http_client(config)?,
            throttle: Throttle::new(
                config.requests_per_pause,
                std::time::Duration::from_millis(config.pause_ms),
            ),
            archive_url: ARCHIVE_URL.to_string(),
            forecast_url: FORECAST_URL.to_string(),
        })
    }

    pub fn with_urls(mut self, archive: impl Into<String>, forecast: impl Into<String>) -> Self {
        self.archive_url = archive.into();
        self.forecast_url = forecast.into();
        self
    }

    async fn fetch_hourly(
        &self,
        latitude: f64,
        longitude: f64,
        window: &RequestWindow<'_>,
    ) -> Result<HourlySeries, CollectError> {
        let base = match window.endpoint {
            Endpoint::Archive => &self.archive_url,
            Endpoint::Forecast => &self.forecast_url,
        };
        let (start, end) = (window.start, window.end);
        let url = format!(
            "{base}?latitude={latitude:.4}&longitude={longitude:.4}&start_date={start}&end_date={end}&hourly={HOURLY_VARS}&timezone=UTC"
        );
        let v = get_json(&self.http, &self.throttle, &url, None).await?;
        parse_hourly(&v)
    }

    /// Weather for each game, with up to two requests per venue: the archive
    /// for past dates and the forecast for recent and upcoming ones. Games at
    /// unknown venues or without a nearby hourly reading are skipped with a
    /// warning; a failed request does not stop the others.
    pub async fn fetch_for_games(
        &self,
        games: &[ScheduledGame],
        today: NaiveDate,
    ) -> Result<Vec<WeatherObservation>, CollectError> {
        let mut by_venue: BTreeMap<&str, Vec<&ScheduledGame>> = BTreeMap::new();
        for game in games {
            by_venue.entry(game.venue.as_str()).or_default().push(game);
        }

        let mut observations = Vec::new();
        let mut last_error = None;
        for (venue_name, venue_games) in by_venue {
            let Some(venue) = find_venue(venue_name) else {
                warn!("unknown venue '{venue_name}', skipping {} games", venue_games.len());
                continue;
            };
            for window in request_windows(&venue_games, today) {
                let series = match self
                    .fetch_hourly(venue.latitude, venue.longitude, &window)
                    .await
                {
                    Ok(series) => series,
                    Err(e) => {
                        warn!("{:?} weather for {venue_name} failed: {e}", window.endpoint);
                        last_error = Some(e);
                        continue;
                    }
                };
                for game in window.games {
                    match observation_for(&series, game) {
                        Some(obs) => observations.push(obs),
                        None => {
                            warn!("no weather reading near first pitch of game {}", game.game_pk)
                        }
                    }
                }
            }
        }

        if observations.is_empty() {
            if let Some(e) = last_error {
                return Err(e);
            }
        }
        info!("collected weather for {} of {} games", observations.len(), games.len());
        Ok(observations)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

fn column(hourly: &Value, name: &str, len: usize) -> Vec<Option<f64>> {
    let mut values: Vec<Option<f64>> = hourly[name]
        .as_array()
        .map(|a| a.iter().map(Value::as_f64).collect())
        .unwrap_or_default();
    values.resize(len, None);
    values
}

pub fn parse_hourly(v: &Value) -> Result<HourlySeries, CollectError> {
    let hourly = &v["hourly"];
    let times = hourly["time"]
        .as_array()
        .ok_or_else(|| CollectError::Unexpected("weather response has no hourly.time".into()))?;
    let parsed: Vec<Option<NaiveDateTime>> = times
        .iter()
        .map(|t| NaiveDateTime::parse_from_str(t.as_str()?, "%Y-%m-%dT%H:%M").ok())
        .collect();
    let n = parsed.len();

    // Rows with an unreadable timestamp are dropped from every column.
    let keep: Vec<usize> = (0..n).filter(|&i| parsed[i].is_some()).collect();
    if keep.len() < n {
        warn!("skipping {} weather rows with unreadable times", n - keep.len());
    }
    let select = |name: &str| -> Vec<Option<f64>> {
        let values = column(hourly, name, n);
        keep.iter().map(|&i| values[i]).collect()
    };
    Ok(HourlySeries {
        times: parsed.into_iter().flatten().collect(),
        temperature_c: select("temperature_2m"),
        wind_speed_kmh: select("wind_speed_10m"),
        wind_direction: select("wind_direction_10m"),
        humidity: select("relative_humidity_2m"),
        weather_code: select("weather_code"),
    })
}

/// Index of the reading closest to `target`, within `MAX_OFFSET_HOURS`.
pub fn nearest(times: &[NaiveDateTime], target: NaiveDateTime) -> Option<usize> {
    let (index, offset) = times
        .iter()
        .enumerate()
        .map(|(i, t)| (i, (*t - target).num_minutes().abs()))
        .min_by_key(|&(_, offset)| offset)?;
    (offset <= MAX_OFFSET_HOURS * 60).then_some(index)
}

/// WMO weather interpretation codes, coarsened.
pub fn conditions(code: u32) -> &'static str {
    match code {
        0 => "Clear",
        1..=3 => "Cloudy",
        45 | 48 => "Fog",
        51..=67 | 80..=82 => "Rain",
        71..=77 | 85 | 86 => "Snow",
        95..=99 => "Thunderstorm",
        _ => "",
    }
}

fn observation_for(series: &HourlySeries, game: &ScheduledGame) -> Option<WeatherObservation> {
    // Unknown start times fall back to a typical 7pm Eastern first pitch.
    let target = match game.game_datetime {
        Some(dt) => dt.naive_utc(),
        None => game.game_date.and_time(NaiveTime::from_hms_opt(23, 0, 0)?),
    };
    let i = nearest(&series.times, target)?;
    Some(WeatherObservation {
        game_pk: game.game_pk,
        venue: game.venue.clone(),
        game_date: game.game_date,
        temperature_c: series.temperature_c[i]?,
        wind_speed_kmh: series.wind_speed_kmh[i]?,
        wind_direction: series.wind_direction[i]?,
        humidity: series.humidity[i],
        conditions: series.weather_code[i]
            .map(|c| conditions(c as u32).to_string())
            .unwrap_or_default(),
    })
}
