// Batter handedness against the opposing starter's throwing hand.

use super::FactorReading;
use crate::context::{Dataset, GameContext, Role};
use crate::stats::{confidence, rescale, BattingLine};
use dugout_core::data::Hand;

const NATIVE_BOUND: f64 = 1.5;

/// Baseline platoon edge from handedness alone.
pub fn base_advantage(bats: Hand, throws: Hand) -> f64 {
    match (bats, throws) {
        (Hand::Left, Hand::Right) | (Hand::Right, Hand::Left) => 1.0,
        (Hand::Left, Hand::Left) => -1.0,
        (Hand::Right, Hand::Right) => -0.5,
        _ => 0.0,
    }
}

pub fn analyze(ctx: &GameContext, data: &Dataset) -> FactorReading {
    if ctx.role == Role::Pitcher {
        return FactorReading::neutral("not applicable to pitchers");
    }
    let throws = ctx.opposing_pitcher_throws;
    let other_hand = match throws {
        Hand::Left => Hand::Right,
        Hand::Right => Hand::Left,
        _ => return FactorReading::neutral("opposing starter's hand unknown"),
    };

    let base = base_advantage(ctx.bats, throws);
    let history = data.history_before(ctx.player_id, ctx.date);
    let mut vs_this = BattingLine::default();
    let mut vs_other = BattingLine::default();
    for log in history {
        let hand = data.opposing_hand(log);
        if hand == throws {
            vs_this.add(log);
        } else if hand == other_hand {
            vs_other.add(log);
        }
    }

    let native = if vs_this.avg() > 0.0 && vs_other.avg() > 0.0 {
        let split_diff = vs_this.avg() - vs_other.avg();
        (base * 0.3 + split_diff * 10.0 * 0.7) * confidence(history.len(), 20.0)
    } else {
        base
    };

    FactorReading::new(
        rescale(native, NATIVE_BOUND),
        format!(
            "bats {} vs {}HP ({:.3} vs this hand, {:.3} vs other)",
            match ctx.bats {
                Hand::Unknown => "?",
                h => h.code(),
            },
            throws.code(),
            vs_this.avg(),
            vs_other.avg()
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DatasetInputs;
    use crate::test_support::*;
    use dugout_core::data::PlayerInfo;

    #[test]
    fn base_advantages() {
        assert_eq!(base_advantage(Hand::Left, Hand::Right), 1.0);
        assert_eq!(base_advantage(Hand::Right, Hand::Left), 1.0);
        assert_eq!(base_advantage(Hand::Left, Hand::Left), -1.0);
        assert_eq!(base_advantage(Hand::Right, Hand::Right), -0.5);
        assert_eq!(base_advantage(Hand::Switch, Hand::Left), 0.0);
    }

    #[test]
    fn without_splits_uses_base() {
        let data = dataset_with_logs(Vec::new());
        let mut c = ctx("2024-06-01");
        c.bats = Hand::Left;
        c.opposing_pitcher_throws = Hand::Right;
        assert_close(analyze(&c, &data).score, 1.0 / 1.5);

        c.opposing_pitcher_throws = Hand::Left;
        assert_close(analyze(&c, &data).score, -1.0 / 1.5);
    }

    #[test]
    fn unknown_hand_and_pitchers_are_neutral() {
        let data = dataset_with_logs(Vec::new());
        let mut c = ctx("2024-06-01");
        c.bats = Hand::Left;
        assert_eq!(analyze(&c, &data).score, 0.0);

        c.opposing_pitcher_throws = Hand::Right;
        c.role = Role::Pitcher;
        assert_eq!(analyze(&c, &data).score, 0.0);
    }

    #[test]
    fn real_splits_blend_with_base() {
        // 10 games vs a lefty (.250), 10 vs a righty (.500).
        let lefty = PlayerInfo {
            player_id: 901,
            throws: "L".into(),
            ..pitcher_info("L")
        };
        let righty = PlayerInfo {
            player_id: 902,
            throws: "R".into(),
            ..pitcher_info("R")
        };
        let mut logs = daily_logs("2024-05-01", &[(4, 1); 10]);
        logs.extend(daily_logs("2024-05-11", &[(4, 2); 10]));
        let mut schedule = Vec::new();
        for (i, l) in logs.iter().enumerate() {
            let mut g = final_game(l.game_pk, &l.game_date.to_string(), "Yankee Stadium", 5, "");
            g.away_probable_pitcher_id = Some(if i < 10 { 901 } else { 902 });
            schedule.push(g);
        }
        let data = Dataset::build(DatasetInputs {
            schedule,
            game_logs: logs,
            players: vec![lefty, righty],
            ..Default::default()
        });

        let mut c = ctx("2024-06-01");
        c.bats = Hand::Left;
        c.opposing_pitcher_throws = Hand::Right;
        // (1.0 * 0.3 + 0.25 * 10 * 0.7) * 1.0 = 2.05, clamped to 1.5
        assert_close(analyze(&c, &data).score, 1.0);

        c.opposing_pitcher_throws = Hand::Left;
        // (-1.0 * 0.3 - 0.25 * 10 * 0.7) = -2.05, clamped to -1.5
        assert_close(analyze(&c, &data).score, -1.0);
    }
}
