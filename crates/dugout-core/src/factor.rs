// The fixed set of start/sit factors and a per-factor score vector.

use std::fmt;
use std::ops::{Index, IndexMut};

/// One independent scoring heuristic.
///
/// The discriminant doubles as the index into [`FactorScores`] and
/// [`crate::weights::FactorWeights`], so the order here is the column order
/// of every CSV and table the tool writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Factor {
    Wind,
    Matchup,
    HomeAway,
    Platoon,
    ParkFactors,
    RestDay,
    Injury,
    Umpire,
    Temperature,
    PitchMix,
    LineupPosition,
    TimeOfDay,
    DefensivePositions,
    RecentForm,
}

impl Factor {
    pub const COUNT: usize = 14;

    pub const ALL: [Factor; Factor::COUNT] = [
        Factor::Wind,
        Factor::Matchup,
        Factor::HomeAway,
        Factor::Platoon,
        Factor::ParkFactors,
        Factor::RestDay,
        Factor::Injury,
        Factor::Umpire,
        Factor::Temperature,
        Factor::PitchMix,
        Factor::LineupPosition,
        Factor::TimeOfDay,
        Factor::DefensivePositions,
        Factor::RecentForm,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Stable snake_case key used in JSON weight files and CSV headers.
    pub fn key(self) -> &'static str {
        match self {
            Factor::Wind => "wind",
            Factor::Matchup => "matchup",
            Factor::HomeAway => "home_away",
            Factor::Platoon => "platoon",
            Factor::ParkFactors => "park_factors",
            Factor::RestDay => "rest_day",
            Factor::Injury => "injury",
            Factor::Umpire => "umpire",
            Factor::Temperature => "temperature",
            Factor::PitchMix => "pitch_mix",
            Factor::LineupPosition => "lineup_position",
            Factor::TimeOfDay => "time_of_day",
            Factor::DefensivePositions => "defensive_positions",
            Factor::RecentForm => "recent_form",
        }
    }

    pub fn from_key(key: &str) -> Option<Factor> {
        let key = key.trim();
        Factor::ALL.into_iter().find(|f| f.key() == key)
    }

    /// Default weight. The defaults sum to exactly 1.0.
    pub fn default_weight(self) -> f64 {
        match self {
            Factor::Wind => 0.09,
            Factor::Matchup => 0.14,
            Factor::HomeAway => 0.11,
            Factor::Platoon => 0.10,
            Factor::ParkFactors => 0.08,
            Factor::RestDay => 0.07,
            Factor::Injury => 0.11,
            Factor::Umpire => 0.04,
            Factor::Temperature => 0.05,
            Factor::PitchMix => 0.05,
            Factor::LineupPosition => 0.05,
            Factor::TimeOfDay => 0.03,
            Factor::DefensivePositions => 0.02,
            Factor::RecentForm => 0.06,
        }
    }

    pub fn score_column(self) -> String {
        format!("{}_score", self.key())
    }

    pub fn weight_column(self) -> String {
        format!("{}_weight", self.key())
    }
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// FactorScores
// ---------------------------------------------------------------------------

/// One score per factor, each in [-1, 1]. Positive favors starting the player.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FactorScores([f64; Factor::COUNT]);

impl FactorScores {
    pub fn new(values: [f64; Factor::COUNT]) -> Self {
        FactorScores(values)
    }

    pub fn get(&self, factor: Factor) -> f64 {
        self.0[factor.index()]
    }

    /// Store a score, clamping it into [-1, 1]. Non-finite input becomes 0.
    pub fn set(&mut self, factor: Factor, score: f64) {
        self.0[factor.index()] = clamp_unit(score);
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Factor, f64)> + '_ {
        Factor::ALL.into_iter().map(move |f| (f, self.get(f)))
    }
}

impl Index<Factor> for FactorScores {
    type Output = f64;

    fn index(&self, factor: Factor) -> &f64 {
        &self.0[factor.index()]
    }
}

impl IndexMut<Factor> for FactorScores {
    fn index_mut(&mut self, factor: Factor) -> &mut f64 {
        &mut self.0[factor.index()]
    }
}

/// Clamp into [-1, 1]; NaN and infinities map to a neutral 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}
