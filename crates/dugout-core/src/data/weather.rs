// Game-time weather per game (mlb_stadium_weather.csv).

use super::{load_with, read_rows, DataError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::path::Path;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherObservation {
    pub game_pk: u64,
    pub venue: String,
    pub game_date: NaiveDate,
    pub temperature_c: f64,
    pub wind_speed_kmh: f64,
    /// Direction the wind blows from, degrees clockwise from north.
    pub wind_direction: f64,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub conditions: String,
}

impl WeatherObservation {
    pub fn temperature_f(&self) -> f64 {
        self.temperature_c * 9.0 / 5.0 + 32.0
    }
}

fn weather_from_reader<R: Read>(rdr: R) -> Result<Vec<WeatherObservation>, csv::Error> {
    let rows: Vec<WeatherObservation> = read_rows(rdr, "weather")?;
    let mut out = Vec::with_capacity(rows.len());
    for mut w in rows {
        let finite = [w.temperature_c, w.wind_speed_kmh, w.wind_direction]
            .iter()
            .all(|v| v.is_finite());
        if !finite || w.wind_speed_kmh < 0.0 {
            warn!("skipping weather for game {}: non-finite or negative value", w.game_pk);
            continue;
        }
        w.venue = w.venue.trim().to_string();
        w.wind_direction = w.wind_direction.rem_euclid(360.0);
        out.push(w);
    }
    Ok(out)
}

pub fn load_weather(path: &Path) -> Result<Vec<WeatherObservation>, DataError> {
    load_with(path, weather_from_reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_normalizes_direction() {
        let csv_data = "\
game_pk,venue,game_date,temperature_c,wind_speed_kmh,wind_direction,humidity,conditions
1,Wrigley Field,2024-06-01,30.0,18.5,370,55,Clear
2,Coors Field,2024-06-01,NaN,5,90,,Cloudy
3,Petco Park,2024-06-01,10.0,4,-90,,";

        let rows = weather_from_reader(csv_data.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert!((rows[0].wind_direction - 10.0).abs() < 1e-9);
        assert!((rows[0].temperature_f() - 86.0).abs() < 1e-9);
        assert_eq!(rows[0].humidity, Some(55.0));
        assert!((rows[1].wind_direction - 270.0).abs() < 1e-9);
        assert!(rows[1].humidity.is_none());
    }
}
