// Opposing team's fielding, as outs above average.

use super::FactorReading;
use crate::context::{Dataset, GameContext};

pub fn analyze(ctx: &GameContext, data: &Dataset) -> FactorReading {
    match data.defense_for(&ctx.opponent, ctx.season) {
        Some(oaa) => FactorReading::new(-oaa / 30.0, format!("{} OAA {oaa:+.0}", ctx.opponent)),
        None => FactorReading::neutral("no defensive data"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DatasetInputs;
    use crate::test_support::*;
    use dugout_core::data::TeamDefense;

    #[test]
    fn strong_defense_hurts_hitters() {
        let data = Dataset::build(DatasetInputs {
            defense: vec![TeamDefense {
                team: "BOS".into(),
                season: 2024,
                outs_above_average: 15.0,
            }],
            ..Default::default()
        });
        let mut c = ctx("2024-06-01");
        assert_close(analyze(&c, &data).score, -0.5);
        c.opponent = "Tampa Bay Rays".into();
        assert_eq!(analyze(&c, &data).score, 0.0);
    }
}
