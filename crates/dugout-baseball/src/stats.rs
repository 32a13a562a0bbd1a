// Aggregated batting lines over a set of game logs.

use dugout_core::data::GameLog;

/// League-average batting average used as the neutral point by several factors.
pub const LEAGUE_AVG: f64 = 0.250;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BattingLine {
    pub games: usize,
    pub ab: u32,
    pub h: u32,
    pub bb: u32,
    pub hr: u32,
    pub tb: u32,
}

impl BattingLine {
    pub fn from_logs<'a>(logs: impl IntoIterator<Item = &'a GameLog>) -> BattingLine {
        let mut line = BattingLine::default();
        for log in logs {
            line.add(log);
        }
        line
    }

    pub fn add(&mut self, log: &GameLog) {
        self.games += 1;
        self.ab += log.ab;
        self.h += log.h;
        self.bb += log.bb;
        self.hr += log.hr;
        self.tb += log.total_bases();
    }

    pub fn avg(&self) -> f64 {
        ratio(self.h, self.ab)
    }

    /// On-base percentage without HBP/SF, which the logs do not carry.
    pub fn obp(&self) -> f64 {
        ratio(self.h + self.bb, self.ab + self.bb)
    }

    pub fn slg(&self) -> f64 {
        ratio(self.tb, self.ab)
    }

    pub fn ops(&self) -> f64 {
        self.obp() + self.slg()
    }
}

fn ratio(num: u32, den: u32) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Clamp a score with a native range of ±`bound` and rescale it to [-1, 1].
pub fn rescale(native: f64, bound: f64) -> f64 {
    if !native.is_finite() || bound <= 0.0 {
        return 0.0;
    }
    native.clamp(-bound, bound) / bound
}

/// Linear sample-size confidence, saturating at 1.
pub fn confidence(n: usize, full_at: f64) -> f64 {
    (n as f64 / full_at).min(1.0)
}
