// Game-time temperature: the ball carries in heat.

use super::FactorReading;
use crate::context::{GameContext, Role};
use dugout_core::venues::{find_venue, Roof};

pub fn temperature_score(fahrenheit: f64) -> f64 {
    if fahrenheit >= 80.0 {
        0.2
    } else if fahrenheit <= 50.0 {
        -0.2
    } else {
        0.0
    }
}

pub fn analyze(ctx: &GameContext) -> FactorReading {
    if find_venue(&ctx.venue).is_some_and(|v| v.roof == Roof::Dome) {
        return FactorReading::neutral("domed");
    }
    let Some(weather) = &ctx.weather else {
        return FactorReading::neutral("no weather data");
    };
    let f = weather.temperature_f();
    let score = temperature_score(f);
    let score = if ctx.role == Role::Pitcher { -score } else { score };
    FactorReading::new(score, format!("{f:.0}°F"))
}
