// Sit/start labels and the recommendations CSV.
//
// The CSV carries one `{factor}_score` and one `{factor}_weight` column per
// factor, so it is written and read by header name rather than through a
// fixed serde struct.

use chrono::NaiveDate;
use dugout_core::config::RecommendConfig;
use dugout_core::data::{DataError, RECOMMENDATIONS_PREFIX};
use dugout_core::factor::{Factor, FactorScores};
use dugout_core::io::{file_timestamp, write_atomic};
use dugout_core::weights::FactorWeights;
use std::collections::HashMap;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Recommendation {
    StrongStart,
    Start,
    Neutral,
    Sit,
    StrongSit,
}

impl Recommendation {
    pub const ALL: [Recommendation; 5] = [
        Recommendation::StrongStart,
        Recommendation::Start,
        Recommendation::Neutral,
        Recommendation::Sit,
        Recommendation::StrongSit,
    ];

    pub fn classify(score: f64, thresholds: &RecommendConfig) -> Recommendation {
        if score >= thresholds.strong_start {
            Recommendation::StrongStart
        } else if score >= thresholds.start {
            Recommendation::Start
        } else if score > thresholds.sit {
            Recommendation::Neutral
        } else if score > thresholds.strong_sit {
            Recommendation::Sit
        } else {
            Recommendation::StrongSit
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Recommendation::StrongStart => "STRONG START",
            Recommendation::Start => "START",
            Recommendation::Neutral => "NEUTRAL",
            Recommendation::Sit => "SIT",
            Recommendation::StrongSit => "STRONG SIT",
        }
    }

    pub fn parse(label: &str) -> Option<Recommendation> {
        let label = label.trim();
        Recommendation::ALL
            .into_iter()
            .find(|r| r.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One scored player-game.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationRow {
    pub date: NaiveDate,
    pub player_name: String,
    pub fantasy_team: String,
    pub mlb_team: String,
    pub position: String,
    pub game_pk: u64,
    pub opponent: String,
    /// Local start time, `HH:MM`, or empty when unknown.
    pub game_time: String,
    pub final_score: f64,
    pub recommendation: Recommendation,
    /// "player" or "global".
    pub weight_source: String,
    pub scores: FactorScores,
    pub weights: FactorWeights,
}

const BASE_COLUMNS: [&str; 11] = [
    "date",
    "player_name",
    "fantasy_team",
    "mlb_team",
    "position",
    "game_pk",
    "opponent",
    "game_time",
    "final_score",
    "recommendation",
    "weight_source",
];

pub fn recommendations_path(dir: &Path, now: chrono::NaiveDateTime) -> PathBuf {
    dir.join(format!("{RECOMMENDATIONS_PREFIX}{}.csv", file_timestamp(now)))
}

fn header() -> Vec<String> {
    let mut cols: Vec<String> = BASE_COLUMNS.iter().map(|c| c.to_string()).collect();
    cols.extend(Factor::ALL.iter().map(|f| f.score_column()));
    cols.extend(Factor::ALL.iter().map(|f| f.weight_column()));
    cols
}

fn to_record(row: &RecommendationRow) -> Vec<String> {
    let mut rec = vec![
        row.date.to_string(),
        row.player_name.clone(),
        row.fantasy_team.clone(),
        row.mlb_team.clone(),
        row.position.clone(),
        row.game_pk.to_string(),
        row.opponent.clone(),
        row.game_time.clone(),
        format!("{:.4}", row.final_score),
        row.recommendation.label().to_string(),
        row.weight_source.clone(),
    ];
    rec.extend(Factor::ALL.iter().map(|&f| format!("{:.4}", row.scores.get(f))));
    rec.extend(Factor::ALL.iter().map(|&f| format!("{:.4}", row.weights.get(f))));
    rec
}

pub fn write_recommendations(path: &Path, rows: &[RecommendationRow]) -> Result<(), DataError> {
    let csv_err = |e: csv::Error| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    };
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header()).map_err(csv_err)?;
    for row in rows {
        writer.write_record(to_record(row)).map_err(csv_err)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| csv_err(csv::Error::from(e.into_error())))?;
    write_atomic(path, &bytes).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

fn recommendations_from_reader<R: Read>(
    rdr: R,
    thresholds: &RecommendConfig,
) -> Result<Vec<RecommendationRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(rdr);
    let columns: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, h)| (h.trim().to_string(), i))
        .collect();

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record?;
        let text = |name: &str| -> &str {
            columns
                .get(name)
                .and_then(|&i| record.get(i))
                .map(str::trim)
                .unwrap_or("")
        };
        let number = |name: &str| -> Option<f64> { text(name).parse::<f64>().ok() };

        let Some(final_score) = number("final_score") else {
            warn!("skipping recommendation row {}: no final_score", line + 2);
            continue;
        };
        let player_name = text("player_name").to_string();
        if player_name.is_empty() {
            warn!("skipping recommendation row {}: no player_name", line + 2);
            continue;
        }

        let mut scores = FactorScores::default();
        let mut weights = FactorWeights::default();
        for f in Factor::ALL {
            scores.set(f, number(&f.score_column()).unwrap_or(0.0));
            if let Some(w) = number(&f.weight_column()) {
                weights.set(f, w);
            }
        }

        rows.push(RecommendationRow {
            date: text("date").parse().unwrap_or_default(),
            player_name,
            fantasy_team: text("fantasy_team").to_string(),
            mlb_team: text("mlb_team").to_string(),
            position: text("position").to_string(),
            game_pk: text("game_pk").parse().unwrap_or(0),
            opponent: text("opponent").to_string(),
            game_time: text("game_time").to_string(),
            final_score,
            recommendation: Recommendation::parse(text("recommendation"))
                .unwrap_or_else(|| Recommendation::classify(final_score, thresholds)),
            weight_source: text("weight_source").to_string(),
            scores,
            weights,
        });
    }
    Ok(rows)
}

/// Load a recommendations CSV. Missing factor columns read as 0 (scores) or
/// the default weight; a missing label is recomputed from the score.
pub fn load_recommendations(
    path: &Path,
    thresholds: &RecommendConfig,
) -> Result<Vec<RecommendationRow>, DataError> {
    let file = std::fs::File::open(path).map_err(|e| DataError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    recommendations_from_reader(file, thresholds).map_err(|e| DataError::Csv {
        path: path.display().to_string(),
        source: e,
    })
}
