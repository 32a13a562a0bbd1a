// Console tables for the batch commands.

use chrono::Local;
use dugout_app::backfill::BackfillSummary;
use dugout_app::backtest::BacktestReport;
use dugout_app::refresh::RefreshSummary;
use dugout_app::report::{Breakdown, ReportData};
use dugout_app::schedule_helper::RosterGame;
use dugout_baseball::recommend::{Recommendation, RecommendationRow};
use dugout_core::weights::FactorWeights;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use stanza::style::{HAlign, Header, MinWidth, Separator, Styles};
use stanza::table::{Col, Row, Table};

pub fn render(table: &Table) -> String {
    Console::default().render(table).to_string()
}

/// A table whose first column is left-aligned text and the rest numbers.
fn with_header(headers: &[&str], text_cols: usize) -> Table {
    let cols = (0..headers.len())
        .map(|i| {
            let align = if i < text_cols {
                HAlign::Left
            } else {
                HAlign::Right
            };
            Col::new(Styles::default().with(MinWidth(6)).with(align))
        })
        .collect();
    Table::default().with_cols(cols).with_row(Row::new(
        Styles::default().with(Header(true)).with(Separator(true)),
        headers.iter().map(|h| h.to_string().into()).collect(),
    ))
}

fn plain_row(cells: Vec<String>) -> Row {
    Row::new(Styles::default(), cells.into_iter().map(Into::into).collect())
}

fn opt_count(n: Option<usize>) -> String {
    n.map_or_else(|| "-".to_string(), |n| n.to_string())
}

pub fn recommendations_table(rows: &[RecommendationRow]) -> Table {
    let mut table = with_header(
        &["Player", "Team", "Pos", "Opponent", "Time", "Score", "Call", "Weights"],
        5,
    );
    for row in rows {
        table.push_row(plain_row(vec![
            row.player_name.clone(),
            row.mlb_team.clone(),
            row.position.clone(),
            row.opponent.clone(),
            row.game_time.clone(),
            format!("{:+.3}", row.final_score),
            row.recommendation.label().to_string(),
            row.weight_source.clone(),
        ]));
    }
    table
}

pub fn backtest_table(report: &BacktestReport) -> Table {
    let mut table = with_header(
        &["Player", "Games", "Accuracy", "MAE", "RMSE", "Optimized"],
        1,
    );
    for p in &report.players {
        let cells = match (&p.baseline, &p.skipped) {
            (Some(b), _) => vec![
                p.player_name.clone(),
                p.games.to_string(),
                format!("{:.4}", b.accuracy),
                format!("{:.4}", b.mae),
                format!("{:.4}", b.rmse),
                p.optimized
                    .as_ref()
                    .map_or_else(|| "-".to_string(), |o| format!("{:.4}", o.accuracy)),
            ],
            (None, reason) => vec![
                p.player_name.clone(),
                p.games.to_string(),
                format!("skipped: {}", reason.as_deref().unwrap_or("no data")),
                String::new(),
                String::new(),
                String::new(),
            ],
        };
        table.push_row(plain_row(cells));
    }
    if let Some(b) = &report.global_baseline {
        table.push_row(plain_row(vec![
            "(all players)".to_string(),
            b.games.to_string(),
            format!("{:.4}", b.accuracy),
            format!("{:.4}", b.mae),
            format!("{:.4}", b.rmse),
            report
                .global
                .as_ref()
                .map_or_else(|| "-".to_string(), |o| format!("{:.4}", o.accuracy)),
        ]));
    }
    table
}

/// Weights largest first.
pub fn weights_table(weights: &FactorWeights) -> Table {
    let mut table = with_header(&["Factor", "Weight"], 1);
    for (factor, w) in weights.sorted_descending() {
        table.push_row(plain_row(vec![factor.to_string(), format!("{w:.4}")]));
    }
    table
}

pub fn schedule_table(games: &[RosterGame<'_>]) -> Table {
    let mut table = with_header(&["Start", "Matchup", "Venue", "Players"], 4);
    for g in games {
        let start = g.game.game_datetime.map_or_else(
            || "TBD".to_string(),
            |t| t.with_timezone(&Local).format("%H:%M").to_string(),
        );
        table.push_row(plain_row(vec![
            start,
            format!("{} @ {}", g.game.away_team, g.game.home_team),
            g.game.venue.clone(),
            g.players.join(", "),
        ]));
    }
    table
}

pub fn refresh_table(summary: &RefreshSummary) -> Table {
    let mut table = with_header(&["Source", "Rows"], 1);
    for (label, n) in [
        ("schedule", summary.schedule_games),
        ("players", summary.players),
        ("roster", summary.roster_entries),
        ("game logs", summary.game_logs),
        ("weather", summary.weather_rows),
    ] {
        table.push_row(plain_row(vec![label.to_string(), opt_count(n)]));
    }
    table
}

pub fn backfill_table(summary: &BackfillSummary) -> Table {
    let mut table = with_header(&["Dates", "Processed", "Existing", "Rows", "Failed"], 0);
    table.push_row(plain_row(vec![
        summary.total_dates.to_string(),
        summary.processed.to_string(),
        summary.skipped_existing.to_string(),
        summary.rows_written.to_string(),
        summary.failed.len().to_string(),
    ]));
    table
}

pub fn report_summary_table(report: &ReportData) -> Table {
    let mut table = with_header(&["Call", "Players"], 1);
    for label in Recommendation::ALL {
        table.push_row(plain_row(vec![
            label.label().to_string(),
            report.count(label).to_string(),
        ]));
    }
    table.push_row(Row::new(
        Styles::default().with(Separator(true)),
        vec!["Total".into(), report.rows.len().to_string().into()],
    ));
    table
}

pub fn breakdown_table(breakdown: &Breakdown<'_>) -> Table {
    let mut table = with_header(&["Factor", "Score", "Weight", "Contribution"], 1);
    for line in &breakdown.lines {
        table.push_row(plain_row(vec![
            line.factor.to_string(),
            format!("{:+.3}", line.score),
            format!("{:.3}", line.weight),
            format!("{:+.4}", line.contribution),
        ]));
    }
    table
}
