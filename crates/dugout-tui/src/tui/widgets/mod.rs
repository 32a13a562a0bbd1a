// Report viewer widgets, one per tab plus the status bar.

pub mod breakdown;
pub mod histogram;
pub mod player_list;
pub mod status_bar;
pub mod summary;

use dugout_baseball::recommend::Recommendation;
use ratatui::style::Color;

pub fn recommendation_color(rec: Recommendation) -> Color {
    match rec {
        Recommendation::StrongStart => Color::LightGreen,
        Recommendation::Start => Color::Green,
        Recommendation::Neutral => Color::Gray,
        Recommendation::Sit => Color::Yellow,
        Recommendation::StrongSit => Color::Red,
    }
}

/// Green for positive, red for negative.
pub fn signed_color(value: f64) -> Color {
    if value > 0.0 {
        Color::Green
    } else if value < 0.0 {
        Color::Red
    } else {
        Color::Gray
    }
}
