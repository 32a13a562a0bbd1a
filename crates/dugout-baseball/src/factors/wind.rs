// Wind relative to the park's orientation: blowing out helps hitters.

use super::{advantage_label, FactorReading};
use crate::context::{GameContext, Role};
use dugout_core::venues::{find_venue, Roof};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindAdvantage {
    /// Wind direction relative to the mound-to-plate line, in (-180, 180].
    pub relative_direction: f64,
    /// Speed along the line; positive is a tailwind for fly balls.
    pub component: f64,
    pub crosswind: f64,
    /// -2, -1, 0, 1 or 2.
    pub native: f64,
}

impl WindAdvantage {
    pub fn hitter_label(&self) -> &'static str {
        advantage_label(self.native)
    }
}

pub fn wind_advantage(wind_direction: f64, speed_kmh: f64, orientation: f64) -> WindAdvantage {
    let mut relative = (wind_direction - orientation).rem_euclid(360.0);
    if relative > 180.0 {
        relative -= 360.0;
    }
    let radians = relative.to_radians();
    let component = radians.cos() * speed_kmh;
    let native = if component > 10.0 {
        2.0
    } else if component > 5.0 {
        1.0
    } else if component > -5.0 {
        0.0
    } else if component > -10.0 {
        -1.0
    } else {
        -2.0
    };
    WindAdvantage {
        relative_direction: relative,
        component,
        crosswind: (radians.sin() * speed_kmh).abs(),
        native,
    }
}

pub fn analyze(ctx: &GameContext) -> FactorReading {
    let Some(venue) = find_venue(&ctx.venue) else {
        return FactorReading::neutral(format!("unknown venue '{}'", ctx.venue));
    };
    if venue.roof == Roof::Dome {
        return FactorReading::neutral(format!("{} is domed", venue.name));
    }
    let Some(weather) = &ctx.weather else {
        return FactorReading::neutral("no weather data");
    };

    let adv = wind_advantage(weather.wind_direction, weather.wind_speed_kmh, venue.orientation);
    let mut score = adv.native / 2.0;
    if venue.roof == Roof::Retractable {
        score /= 2.0;
    }
    if ctx.role == Role::Pitcher {
        score = -score;
    }
    FactorReading::new(
        score,
        format!(
            "{} ({:.1} km/h along field, {:.1} km/h cross)",
            adv.hitter_label(),
            adv.component,
            adv.crosswind
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use dugout_core::data::WeatherObservation;

    fn weather(direction: f64, speed: f64) -> WeatherObservation {
        WeatherObservation {
            game_pk: 1,
            venue: String::new(),
            game_date: d("2024-06-01"),
            temperature_c: 20.0,
            wind_speed_kmh: speed,
            wind_direction: direction,
            humidity: None,
            conditions: String::new(),
        }
    }

    #[test]
    fn relative_direction_wraps() {
        let adv = wind_advantage(10.0, 20.0, 350.0);
        assert_close(adv.relative_direction, 20.0);
        let adv = wind_advantage(350.0, 20.0, 10.0);
        assert_close(adv.relative_direction, -20.0);
        let adv = wind_advantage(190.0, 20.0, 10.0);
        assert_close(adv.relative_direction, 180.0);
    }

    #[test]
    fn thresholds() {
        assert_eq!(wind_advantage(0.0, 12.0, 0.0).native, 2.0);
        assert_eq!(wind_advantage(0.0, 8.0, 0.0).native, 1.0);
        assert_eq!(wind_advantage(90.0, 30.0, 0.0).native, 0.0);
        assert_eq!(wind_advantage(180.0, 8.0, 0.0).native, -1.0);
        assert_eq!(wind_advantage(180.0, 12.0, 0.0).native, -2.0);
        assert_close(wind_advantage(90.0, 30.0, 0.0).crosswind, 30.0);
    }

    #[test]
    fn tailwind_at_open_park() {
        // Yankee Stadium orientation is 282 degrees.
        let mut c = ctx("2024-06-01");
        c.weather = Some(weather(282.0, 15.0));
        let r = analyze(&c);
        assert_close(r.score, 1.0);
        assert!(r.detail.starts_with("VERY FAVORABLE"));

        c.role = Role::Pitcher;
        assert_close(analyze(&c).score, -1.0);
    }

    #[test]
    fn roofs_dampen_wind() {
        let mut c = ctx("2024-06-01");
        c.venue = "Tropicana Field".into();
        c.weather = Some(weather(5.0, 30.0));
        assert_eq!(analyze(&c).score, 0.0);

        // Globe Life Field is retractable, orientation 355.
        c.venue = "Globe Life Field".into();
        c.weather = Some(weather(355.0, 30.0));
        assert_close(analyze(&c).score, 0.5);
    }

    #[test]
    fn missing_inputs_are_neutral() {
        let mut c = ctx("2024-06-01");
        assert_eq!(analyze(&c).score, 0.0);
        c.venue = "Sandlot".into();
        c.weather = Some(weather(0.0, 50.0));
        assert_eq!(analyze(&c).score, 0.0);
    }
}
