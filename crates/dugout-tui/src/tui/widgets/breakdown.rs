// Breakdown tab: each factor's score, weight and contribution for the
// selected player, largest contribution first.

use dugout_app::report::breakdown_of;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use super::{recommendation_color, signed_color};
use crate::tui::ViewState;

/// Width of the contribution bar at the largest contribution.
const BAR_WIDTH: usize = 20;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let Some(row) = state.selected_row() else {
        let paragraph = Paragraph::new("No player selected.")
            .block(Block::default().borders(Borders::ALL).title("Breakdown"));
        frame.render_widget(paragraph, area);
        return;
    };
    let breakdown = breakdown_of(row);

    let [head, body] = Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);

    let heading = Line::from(vec![
        Span::styled(
            format!("{} ", row.player_name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "({} {}) vs {} at {}  ",
            row.mlb_team, row.position, row.opponent, row.game_time
        )),
        Span::styled(
            format!("{:+.3} {}", row.final_score, row.recommendation.label()),
            Style::default().fg(recommendation_color(row.recommendation)),
        ),
        Span::raw(format!("  [{} weights]", row.weight_source)),
    ]);
    frame.render_widget(
        Paragraph::new(heading).block(Block::default().borders(Borders::ALL).title("Breakdown")),
        head,
    );

    let largest = breakdown
        .lines
        .iter()
        .map(|l| l.contribution.abs())
        .fold(0.0, f64::max);
    let rows: Vec<Row> = breakdown
        .lines
        .iter()
        .map(|l| {
            Row::new(vec![
                Cell::from(l.factor.to_string()),
                Cell::from(format!("{:+.3}", l.score)),
                Cell::from(format!("{:.3}", l.weight)),
                Cell::from(format!("{:+.4}", l.contribution))
                    .style(Style::default().fg(signed_color(l.contribution))),
                Cell::from(contribution_bar(l.contribution, largest))
                    .style(Style::default().fg(signed_color(l.contribution))),
            ])
        })
        .collect();

    let header = Row::new(vec!["Factor", "Score", "Weight", "Contrib", ""])
        .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Length(20),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(8),
        Constraint::Min(BAR_WIDTH as u16),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Factors"));
    frame.render_widget(table, body);
}

/// A bar proportional to `|contribution|`, scaled so `largest` fills it.
pub fn contribution_bar(contribution: f64, largest: f64) -> String {
    if largest <= 0.0 {
        return String::new();
    }
    let len = ((contribution.abs() / largest) * BAR_WIDTH as f64).round() as usize;
    "\u{2588}".repeat(len.min(BAR_WIDTH))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use crate::tui::Tab;
    use dugout_app::report::ReportData;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn bars_scale_to_largest() {
        assert_eq!(contribution_bar(0.1, 0.1).chars().count(), BAR_WIDTH);
        assert_eq!(contribution_bar(-0.05, 0.1).chars().count(), BAR_WIDTH / 2);
        assert_eq!(contribution_bar(0.0, 0.0), "");
    }

    #[test]
    fn shows_selected_player_factors() {
        let mut state = ViewState::new(sample_report());
        state.active_tab = Tab::BottomSits;
        state.move_selection(0);
        let mut terminal = Terminal::new(TestBackend::new(100, 24)).unwrap();
        terminal.draw(|f| render(f, f.area(), &state)).unwrap();
        let text = buffer_text(terminal.backend().buffer());
        assert!(text.contains("Giancarlo Stanton"));
        assert!(text.contains("STRONG SIT"));
        let matchup = text.find("matchup").unwrap();
        let wind = text.find("wind").unwrap();
        assert!(matchup < wind, "largest contribution first");
    }

    #[test]
    fn nothing_selected() {
        let state = ViewState::new(ReportData::default());
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        terminal.draw(|f| render(f, f.area(), &state)).unwrap();
        assert!(buffer_text(terminal.backend().buffer()).contains("No player selected."));
    }
}
