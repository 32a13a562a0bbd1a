// Top Starts / Bottom Sits tables with a movable cursor.

use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};
use ratatui::Frame;

use super::{recommendation_color, signed_color};
use crate::tui::{ListKind, ViewState};

pub fn title(kind: ListKind) -> &'static str {
    match kind {
        ListKind::Top => "Top Starts",
        ListKind::Bottom => "Bottom Sits",
    }
}

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState, kind: ListKind) {
    let header = Row::new(vec![
        Cell::from("#"),
        Cell::from("Player"),
        Cell::from("Team"),
        Cell::from("Pos"),
        Cell::from("Opponent"),
        Cell::from("Time"),
        Cell::from("Score"),
        Cell::from("Call"),
    ])
    .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state
        .list(kind)
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            Row::new(vec![
                Cell::from(format!("{}", i + 1)),
                Cell::from(r.player_name.clone()),
                Cell::from(r.mlb_team.clone()),
                Cell::from(r.position.clone()),
                Cell::from(r.opponent.clone()),
                Cell::from(r.game_time.clone()),
                Cell::from(format!("{:+.3}", r.final_score))
                    .style(Style::default().fg(signed_color(r.final_score))),
                Cell::from(r.recommendation.label())
                    .style(Style::default().fg(recommendation_color(r.recommendation))),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(3),
        Constraint::Min(18),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(13),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title(kind)))
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol(">> ");

    let mut table_state = TableState::default().with_selected(Some(state.cursor(kind)));
    frame.render_stateful_widget(table, area, &mut table_state);
}
