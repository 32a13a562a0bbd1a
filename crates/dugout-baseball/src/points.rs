// Fantasy points for a hitting line.

use dugout_core::config::ScoringConfig;
use dugout_core::data::GameLog;

pub fn fantasy_points(log: &GameLog, scoring: &ScoringConfig) -> f64 {
    log.singles() as f64 * scoring.single
        + log.doubles as f64 * scoring.double
        + log.triples as f64 * scoring.triple
        + log.hr as f64 * scoring.home_run
        + log.rbi as f64 * scoring.rbi
        + log.r as f64 * scoring.run
        + log.sb as f64 * scoring.stolen_base
        + log.bb as f64 * scoring.walk
        + log.so as f64 * scoring.strikeout
}
