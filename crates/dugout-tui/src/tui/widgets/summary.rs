// Summary tab: how many players landed in each call, and the score range.

use dugout_baseball::recommend::Recommendation;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::recommendation_color;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(summary_lines(state))
        .block(Block::default().borders(Borders::ALL).title("Summary"));
    frame.render_widget(paragraph, area);
}

pub fn summary_lines(state: &ViewState) -> Vec<Line<'static>> {
    let report = &state.report;
    if report.rows.is_empty() {
        return vec![Line::from("No recommendations in this file.")];
    }

    let mut lines = Vec::new();
    if let Some(first) = report.rows.first() {
        lines.push(Line::from(format!(
            "Date {}   Players {}",
            first.date,
            report.rows.len()
        )));
    }
    let scores: Vec<f64> = report.rows.iter().map(|r| r.final_score).collect();
    let mean = scores.iter().sum::<f64>() / scores.len() as f64;
    let best = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let worst = scores.iter().copied().fold(f64::INFINITY, f64::min);
    lines.push(Line::from(format!(
        "Score mean {mean:+.3}   best {best:+.3}   worst {worst:+.3}"
    )));
    lines.push(Line::from(""));

    for rec in Recommendation::ALL {
        let count = report.count(rec);
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<14}", rec.label()),
                Style::default()
                    .fg(recommendation_color(rec))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("{count:>4}  ")),
            Span::styled(
                "\u{2588}".repeat(count.min(60)),
                Style::default().fg(recommendation_color(rec)),
            ),
        ]));
    }
    lines
}
