// Histogram tab: final-score distribution as horizontal bars.

use dugout_app::report::HistogramBin;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use super::signed_color;
use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    // Label, count and borders take about 30 columns.
    let bar_width = area.width.saturating_sub(30).max(1) as usize;
    let lines = if state.report.histogram.is_empty() {
        vec![Line::from("No scores to plot.")]
    } else {
        histogram_lines(&state.report.histogram, bar_width)
    };
    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Histogram"));
    frame.render_widget(paragraph, area);
}

pub fn histogram_lines(bins: &[HistogramBin], bar_width: usize) -> Vec<Line<'static>> {
    let most = bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    bins.iter()
        .map(|b| {
            let len = (b.count * bar_width).div_ceil(most);
            let mid = (b.lower + b.upper) / 2.0;
            Line::from(vec![
                Span::raw(format!("{:+.3} .. {:+.3} ", b.lower, b.upper)),
                Span::raw(format!("{:>4} ", b.count)),
                Span::styled("\u{2588}".repeat(len), Style::default().fg(signed_color(mid))),
            ])
        })
        .collect()
}
