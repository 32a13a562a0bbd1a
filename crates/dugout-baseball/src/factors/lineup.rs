// Batting-order spot: more plate appearances near the top.

use super::FactorReading;
use crate::context::GameContext;

pub fn lineup_score(order: u32) -> f64 {
    match order {
        1..=3 => 0.15,
        o if o >= 7 => -0.15,
        _ => 0.0,
    }
}

pub fn analyze(ctx: &GameContext) -> FactorReading {
    match ctx.batting_order {
        Some(order) if order > 0 => {
            FactorReading::new(lineup_score(order), format!("batting {order}"))
        }
        _ => FactorReading::neutral("batting order unknown"),
    }
}
