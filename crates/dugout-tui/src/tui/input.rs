// Keyboard handling for the report viewer.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::{Tab, ViewState};

const PAGE: isize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
}

/// Apply a key press to `view_state`. Returns `Some(Action::Quit)` when the
/// viewer should close.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<Action> {
    // crossterm reports releases too on some platforms.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }
    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(Action::Quit);
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => return Some(Action::Quit),
        KeyCode::Char(c @ '1'..='5') => {
            if let Some(tab) = Tab::from_digit(c) {
                view_state.active_tab = tab;
            }
        }
        KeyCode::Tab | KeyCode::Right => view_state.active_tab = view_state.active_tab.next(),
        KeyCode::BackTab | KeyCode::Left => {
            view_state.active_tab = view_state.active_tab.previous()
        }
        KeyCode::Up | KeyCode::Char('k') => view_state.move_selection(-1),
        KeyCode::Down | KeyCode::Char('j') => view_state.move_selection(1),
        KeyCode::PageUp => view_state.move_selection(-PAGE),
        KeyCode::PageDown => view_state.move_selection(PAGE),
        KeyCode::Home => view_state.move_selection(isize::MIN),
        KeyCode::End => view_state.move_selection(isize::MAX),
        KeyCode::Enter => {
            if matches!(view_state.active_tab, Tab::TopStarts | Tab::BottomSits) {
                view_state.active_tab = Tab::Breakdown;
            }
        }
        _ => {}
    }
    None
}
