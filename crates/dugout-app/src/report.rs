// The latest recommendations file, summarized for the report viewer.

use anyhow::{Context, Result};
use dugout_baseball::combiner::contributions;
use dugout_baseball::recommend::{load_recommendations, Recommendation, RecommendationRow};
use dugout_core::config::RecommendConfig;
use dugout_core::data::{normalize_name, RECOMMENDATIONS_PREFIX};
use dugout_core::factor::Factor;
use dugout_core::io::latest_file;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const HISTOGRAM_BINS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// One factor's part in a player's final score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FactorLine {
    pub factor: Factor,
    pub score: f64,
    pub weight: f64,
    pub contribution: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Breakdown<'a> {
    pub row: &'a RecommendationRow,
    /// Largest contribution (by magnitude) first.
    pub lines: Vec<FactorLine>,
}

#[derive(Debug, Clone, Default)]
pub struct ReportData {
    pub path: PathBuf,
    /// Best score first.
    pub rows: Vec<RecommendationRow>,
    pub counts: BTreeMap<Recommendation, usize>,
    pub histogram: Vec<HistogramBin>,
}

/// Equal-width bins spanning the observed scores. A single distinct score
/// gets one bin holding every row.
pub fn histogram(scores: &[f64], bins: usize) -> Vec<HistogramBin> {
    if scores.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max - min < 1e-12 {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: scores.len(),
        }];
    }
    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + width * i as f64,
            upper: min + width * (i + 1) as f64,
            count: 0,
        })
        .collect();
    for &s in scores {
        let i = (((s - min) / width) as usize).min(bins - 1);
        out[i].count += 1;
    }
    out
}

impl ReportData {
    pub fn from_rows(path: PathBuf, mut rows: Vec<RecommendationRow>) -> ReportData {
        rows.sort_by(|a, b| b.final_score.total_cmp(&a.final_score));
        let mut counts: BTreeMap<Recommendation, usize> =
            Recommendation::ALL.iter().map(|&r| (r, 0)).collect();
        for row in &rows {
            *counts.entry(row.recommendation).or_default() += 1;
        }
        let scores: Vec<f64> = rows.iter().map(|r| r.final_score).collect();
        ReportData {
            path,
            histogram: histogram(&scores, HISTOGRAM_BINS),
            rows,
            counts,
        }
    }

    pub fn count(&self, label: Recommendation) -> usize {
        self.counts.get(&label).copied().unwrap_or(0)
    }

    pub fn top_starts(&self, n: usize) -> Vec<&RecommendationRow> {
        self.rows.iter().take(n).collect()
    }

    /// Lowest scores first.
    pub fn bottom_sits(&self, n: usize) -> Vec<&RecommendationRow> {
        self.rows.iter().rev().take(n).collect()
    }

    pub fn breakdown(&self, player: &str) -> Option<Breakdown<'_>> {
        let key = normalize_name(player);
        let row = self
            .rows
            .iter()
            .find(|r| normalize_name(&r.player_name) == key)?;
        Some(breakdown_of(row))
    }
}

pub fn breakdown_of(row: &RecommendationRow) -> Breakdown<'_> {
    let lines = contributions(&row.scores, &row.weights)
        .into_iter()
        .map(|(factor, contribution)| FactorLine {
            factor,
            score: row.scores.get(factor),
            weight: row.weights.get(factor),
            contribution,
        })
        .collect();
    Breakdown { row, lines }
}

pub fn load_report(path: &Path, thresholds: &RecommendConfig) -> Result<ReportData> {
    let rows = load_recommendations(path, thresholds)?;
    Ok(ReportData::from_rows(path.to_path_buf(), rows))
}

/// The newest `sitstart_recommendations_*.csv` in `dir`.
pub fn load_latest_report(dir: &Path, thresholds: &RecommendConfig) -> Result<ReportData> {
    let path = latest_file(dir, RECOMMENDATIONS_PREFIX, "csv").with_context(|| {
        format!(
            "no {RECOMMENDATIONS_PREFIX}*.csv in {}; run `dugout recommend` first",
            dir.display()
        )
    })?;
    load_report(&path, thresholds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dugout_baseball::recommend::write_recommendations;
    use dugout_core::factor::FactorScores;
    use dugout_core::weights::FactorWeights;

    fn row(name: &str, score: f64) -> RecommendationRow {
        let mut scores = FactorScores::default();
        scores.set(Factor::Matchup, score * 2.0);
        scores.set(Factor::Wind, -0.1);
        RecommendationRow {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            player_name: name.into(),
            fantasy_team: "Bronx Bombers".into(),
            mlb_team: "NYY".into(),
            position: "OF".into(),
            game_pk: 1,
            opponent: "Boston Red Sox".into(),
            game_time: "19:05".into(),
            final_score: score,
            recommendation: Recommendation::classify(score, &RecommendConfig::default()),
            weight_source: "global".into(),
            scores,
            weights: FactorWeights::default(),
        }
    }

    fn report() -> ReportData {
        ReportData::from_rows(
            PathBuf::from("x.csv"),
            vec![
                row("Low", -0.3),
                row("High", 0.3),
                row("Mid", 0.0),
                row("Start", 0.12),
            ],
        )
    }

    #[test]
    fn counts_and_order() {
        let r = report();
        assert_eq!(r.rows[0].player_name, "High");
        assert_eq!(r.count(Recommendation::StrongStart), 1);
        assert_eq!(r.count(Recommendation::Start), 1);
        assert_eq!(r.count(Recommendation::Neutral), 1);
        assert_eq!(r.count(Recommendation::Sit), 0);
        assert_eq!(r.count(Recommendation::StrongSit), 1);

        let top: Vec<&str> = r.top_starts(2).iter().map(|x| x.player_name.as_str()).collect();
        assert_eq!(top, vec!["High", "Start"]);
        let bottom: Vec<&str> = r.bottom_sits(1).iter().map(|x| x.player_name.as_str()).collect();
        assert_eq!(bottom, vec!["Low"]);
        assert_eq!(r.top_starts(10).len(), 4);
    }

    #[test]
    fn histogram_bins_cover_range() {
        let bins = histogram(&[-0.3, 0.0, 0.12, 0.3], 3);
        assert_eq!(bins.len(), 3);
        assert_eq!(bins.iter().map(|b| b.count).sum::<usize>(), 4);
        assert_eq!(bins[2].count, 2);
        assert!((bins[0].lower + 0.3).abs() < 1e-12);
        assert!((bins[2].upper - 0.3).abs() < 1e-12);

        assert!(histogram(&[], 10).is_empty());
        let flat = histogram(&[0.1, 0.1], 10);
        assert_eq!(flat.len(), 1);
        assert_eq!(flat[0].count, 2);
    }

    #[test]
    fn breakdown_orders_contributions() {
        let r = report();
        let b = r.breakdown("high").unwrap();
        assert_eq!(b.lines.len(), Factor::COUNT);
        assert_eq!(b.lines[0].factor, Factor::Matchup);
        assert!((b.lines[0].contribution - 0.6 * 0.14).abs() < 1e-9);
        assert!(r.breakdown("nobody").is_none());
    }

    #[test]
    fn loads_newest_file() {
        let dir = std::env::temp_dir().join("dugout_report_latest");
        let _ = std::fs::remove_dir_all(&dir);
        write_recommendations(
            &dir.join("sitstart_recommendations_20240601_080000.csv"),
            &[row("Old", 0.0)],
        )
        .unwrap();
        write_recommendations(
            &dir.join("sitstart_recommendations_20240602_080000.csv"),
            &[row("New", 0.2), row("Newer", -0.2)],
        )
        .unwrap();
        let r = load_latest_report(&dir, &RecommendConfig::default()).unwrap();
        assert_eq!(r.rows.len(), 2);
        assert_eq!(r.rows[0].player_name, "New");
        assert!(load_latest_report(&dir.join("missing"), &RecommendConfig::default()).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
