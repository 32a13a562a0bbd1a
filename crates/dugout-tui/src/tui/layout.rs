// Screen layout for the report viewer.
//
// +--------------------------------------------------+
// | Status Bar (1 row): file, player count, tabs      |
// +--------------------------------------------------+
// | Main Panel (tab content)                          |
// +--------------------------------------------------+
// | Help Bar (1 row)                                  |
// +--------------------------------------------------+

use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Debug, Clone)]
pub struct AppLayout {
    pub status_bar: Rect,
    pub main_panel: Rect,
    pub help_bar: Rect,
}

pub fn build_layout(area: Rect) -> AppLayout {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(area);

    AppLayout {
        status_bar: vertical[0],
        main_panel: vertical[1],
        help_bar: vertical[2],
    }
}

/// Rows visible in a bordered table with a header row.
pub fn visible_rows(panel: Rect) -> usize {
    panel.height.saturating_sub(3) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bars_are_one_row_and_panel_fills() {
        let layout = build_layout(Rect::new(0, 0, 120, 40));
        assert_eq!(layout.status_bar.height, 1);
        assert_eq!(layout.help_bar.height, 1);
        assert_eq!(layout.main_panel.height, 38);
        assert_eq!(layout.main_panel.y, 1);
        assert_eq!(layout.help_bar.y, 39);
    }

    #[test]
    fn visible_rows_leaves_room_for_borders() {
        assert_eq!(visible_rows(Rect::new(0, 0, 80, 20)), 17);
        assert_eq!(visible_rows(Rect::new(0, 0, 80, 2)), 0);
    }
}
