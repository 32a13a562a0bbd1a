// Terminal report viewer for the latest recommendations file.
//
// The viewer owns a `ViewState` built from `ReportData`; key presses mutate it
// and a ~30 fps tick re-renders. Nothing is written back to disk.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use dugout_app::report::ReportData;
use dugout_baseball::recommend::RecommendationRow;
use futures_util::StreamExt;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use input::Action;
use layout::{build_layout, AppLayout};

/// Rows shown in the Top Starts and Bottom Sits lists.
pub const LIST_LEN: usize = 25;

// ---------------------------------------------------------------------------
// Tabs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Summary,
    TopStarts,
    BottomSits,
    Breakdown,
    Histogram,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Summary,
        Tab::TopStarts,
        Tab::BottomSits,
        Tab::Breakdown,
        Tab::Histogram,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Summary => "Summary",
            Tab::TopStarts => "Top Starts",
            Tab::BottomSits => "Bottom Sits",
            Tab::Breakdown => "Breakdown",
            Tab::Histogram => "Histogram",
        }
    }

    /// `'1'..='5'` in display order.
    pub fn from_digit(c: char) -> Option<Tab> {
        let i = c.to_digit(10)? as usize;
        Tab::ALL.get(i.checked_sub(1)?).copied()
    }

    pub fn next(self) -> Tab {
        let i = Tab::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Tab::ALL[(i + 1) % Tab::ALL.len()]
    }

    pub fn previous(self) -> Tab {
        let i = Tab::ALL.iter().position(|&t| t == self).unwrap_or(0);
        Tab::ALL[(i + Tab::ALL.len() - 1) % Tab::ALL.len()]
    }
}

/// Which list the breakdown follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    Top,
    Bottom,
}

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

pub struct ViewState {
    pub report: ReportData,
    pub active_tab: Tab,
    pub top_cursor: usize,
    pub bottom_cursor: usize,
    pub focus: ListKind,
}

impl ViewState {
    pub fn new(report: ReportData) -> Self {
        ViewState {
            report,
            active_tab: Tab::Summary,
            top_cursor: 0,
            bottom_cursor: 0,
            focus: ListKind::Top,
        }
    }

    pub fn list(&self, kind: ListKind) -> Vec<&RecommendationRow> {
        match kind {
            ListKind::Top => self.report.top_starts(LIST_LEN),
            ListKind::Bottom => self.report.bottom_sits(LIST_LEN),
        }
    }

    pub fn cursor(&self, kind: ListKind) -> usize {
        match kind {
            ListKind::Top => self.top_cursor,
            ListKind::Bottom => self.bottom_cursor,
        }
    }

    /// The player the Breakdown tab shows.
    pub fn selected_row(&self) -> Option<&RecommendationRow> {
        self.list(self.focus).get(self.cursor(self.focus)).copied()
    }

    /// Move the cursor of the list on screen (or the focused list on the
    /// Breakdown tab). Other tabs ignore it.
    pub fn move_selection(&mut self, delta: isize) {
        let kind = match self.active_tab {
            Tab::TopStarts => ListKind::Top,
            Tab::BottomSits => ListKind::Bottom,
            Tab::Breakdown => self.focus,
            Tab::Summary | Tab::Histogram => return,
        };
        let len = self.list(kind).len();
        if len == 0 {
            return;
        }
        let cursor = match kind {
            ListKind::Top => &mut self.top_cursor,
            ListKind::Bottom => &mut self.bottom_cursor,
        };
        *cursor = cursor.saturating_add_signed(delta).min(len - 1);
        self.focus = kind;
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::status_bar::render(frame, layout.status_bar, state);
    render_main_panel(frame, &layout, state);
    render_help_bar(frame, &layout);
}

fn render_main_panel(frame: &mut Frame, layout: &AppLayout, state: &ViewState) {
    let area = layout.main_panel;
    match state.active_tab {
        Tab::Summary => widgets::summary::render(frame, area, state),
        Tab::TopStarts => widgets::player_list::render(frame, area, state, ListKind::Top),
        Tab::BottomSits => widgets::player_list::render(frame, area, state, ListKind::Bottom),
        Tab::Breakdown => widgets::breakdown::render(frame, area, state),
        Tab::Histogram => widgets::histogram::render(frame, area, state),
    }
}

fn render_help_bar(frame: &mut Frame, layout: &AppLayout) {
    let text = " q:Quit | 1-5/Tab:Switch tab | \u{2191}/\u{2193}:Select | PgUp/PgDn:Page";
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        text,
        Style::default().fg(Color::White).add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, layout.help_bar);
}

// ---------------------------------------------------------------------------
// Main loop
// ---------------------------------------------------------------------------

/// Run the viewer until the user quits.
pub async fn run(report: ReportData) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::new(report);
    let mut event_stream = EventStream::new();
    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    let result = loop {
        tokio::select! {
            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if input::handle_key(key_event, &mut view_state) == Some(Action::Quit) {
                            break Ok(());
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => break Err(anyhow::Error::from(e)),
                    None => break Ok(()),
                }
            }

            _ = render_tick.tick() => {
                if let Err(e) = terminal.draw(|frame| render_frame(frame, &view_state)) {
                    break Err(e.into());
                }
            }
        }
    };

    ratatui::restore();
    result
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
