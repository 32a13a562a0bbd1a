// Home/away batting-average split.

use super::FactorReading;
use crate::context::{Dataset, GameContext};
use crate::stats::{confidence, rescale, BattingLine};

const NATIVE_BOUND: f64 = 2.0;

pub fn analyze(ctx: &GameContext, data: &Dataset) -> FactorReading {
    let history = data.history_before(ctx.player_id, ctx.date);
    let here = BattingLine::from_logs(history.iter().filter(|l| l.is_home == ctx.is_home));
    let other = BattingLine::from_logs(history.iter().filter(|l| l.is_home != ctx.is_home));
    let setting = if ctx.is_home { "home" } else { "away" };

    if here.ab == 0 || other.ab == 0 {
        return FactorReading::neutral(format!("not enough {setting} split history"));
    }
    let native = (here.avg() - other.avg()) * 10.0 * confidence(here.games, 10.0);
    FactorReading::new(
        rescale(native, NATIVE_BOUND),
        format!(
            "{:.3} {setting} vs {:.3} otherwise ({} games)",
            here.avg(),
            other.avg(),
            here.games
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    #[test]
    fn better_at_home_is_positive() {
        let mut logs = daily_logs("2024-05-01", &[(4, 2); 10]);
        logs.extend(daily_logs("2024-05-11", &[(4, 1); 10]));
        for l in logs.iter_mut().skip(10) {
            l.is_home = false;
        }
        let data = dataset_with_logs(logs);
        // (.500 - .250) * 10 * 1.0 = 2.5, clamped to 2
        assert_close(analyze(&ctx("2024-06-01"), &data).score, 1.0);

        let mut away = ctx("2024-06-01");
        away.is_home = false;
        assert_close(analyze(&away, &data).score, -1.0);
    }

    #[test]
    fn small_sample_is_scaled() {
        // 5 home games at .300 vs away .250: 0.5 * 0.5 = 0.25 native
        let mut logs = daily_logs("2024-05-01", &[(10, 3); 5]);
        logs.extend(daily_logs("2024-05-06", &[(4, 1); 4]));
        for l in logs.iter_mut().skip(5) {
            l.is_home = false;
        }
        let data = dataset_with_logs(logs);
        assert_close(analyze(&ctx("2024-06-01"), &data).score, 0.125);
    }

    #[test]
    fn one_sided_history_is_neutral() {
        let data = dataset_with_logs(daily_logs("2024-05-01", &[(4, 2); 10]));
        assert_eq!(analyze(&ctx("2024-06-01"), &data).score, 0.0);
    }
}
