// Park run environment: measured from completed games when there are enough,
// otherwise the park's known reputation.

use super::FactorReading;
use crate::context::{Dataset, GameContext, Role};
use dugout_core::venues::{find_venue, ParkClass};

/// Venue games needed before the measured ratio replaces the static class.
const MIN_VENUE_GAMES: u32 = 20;

pub fn analyze(ctx: &GameContext, data: &Dataset) -> FactorReading {
    let venue_runs = data.venue_runs_before(&ctx.venue, ctx.date);
    let league = data.league_runs_before(ctx.date).per_game();

    let (score, detail) = match (venue_runs.per_game(), league) {
        (Some(venue_rpg), Some(league_rpg))
            if venue_runs.games >= MIN_VENUE_GAMES && league_rpg > 0.0 =>
        {
            let ratio = venue_rpg / league_rpg;
            (
                (ratio - 1.0) / 0.25,
                format!(
                    "park factor {:.2} ({:.1} R/G over {} games)",
                    ratio, venue_rpg, venue_runs.games
                ),
            )
        }
        _ => match find_venue(&ctx.venue).map(|v| v.class) {
            Some(ParkClass::Hitter) => (0.25, "hitter-friendly park".to_string()),
            Some(ParkClass::Pitcher) => (-0.25, "pitcher-friendly park".to_string()),
            Some(ParkClass::Neutral) => (0.0, "neutral park".to_string()),
            None => (0.0, format!("unknown venue '{}'", ctx.venue)),
        },
    };

    let score = if ctx.role == Role::Pitcher { -score } else { score };
    FactorReading::new(score, detail)
}
