// The `dugout` command line: argument parsing, console tables, and the
// terminal report viewer.

pub mod cli;
pub mod print;
pub mod tui;

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::NaiveDate;
    use dugout_app::report::ReportData;
    use dugout_baseball::recommend::{Recommendation, RecommendationRow};
    use dugout_core::config::RecommendConfig;
    use dugout_core::factor::{Factor, FactorScores};
    use dugout_core::weights::FactorWeights;
    use std::path::PathBuf;

    pub fn row(name: &str, score: f64) -> RecommendationRow {
        let mut scores = FactorScores::default();
        scores.set(Factor::Matchup, (score * 2.0).clamp(-1.0, 1.0));
        scores.set(Factor::Injury, -0.2);
        RecommendationRow {
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            player_name: name.into(),
            fantasy_team: "Bronx Bombers".into(),
            mlb_team: "NYY".into(),
            position: "OF".into(),
            game_pk: 745001,
            opponent: "Boston Red Sox".into(),
            game_time: "19:05".into(),
            final_score: score,
            recommendation: Recommendation::classify(score, &RecommendConfig::default()),
            weight_source: "global".into(),
            scores,
            weights: FactorWeights::default(),
        }
    }

    pub fn sample_report() -> ReportData {
        ReportData::from_rows(
            PathBuf::from("data/sitstart_recommendations_20240601_080000.csv"),
            vec![
                row("Aaron Judge", 0.31),
                row("Juan Soto", 0.14),
                row("Anthony Volpe", 0.02),
                row("Gleyber Torres", -0.12),
                row("Giancarlo Stanton", -0.34),
            ],
        )
    }

    /// Every cell symbol of a rendered buffer, row by row.
    pub fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|line| line.iter().map(|c| c.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
