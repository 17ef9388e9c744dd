//! Color palette and style constants for the pharmacy TUI.

use ratatui::style::{Color, Modifier, Style};

use shifa_proto::projection::StyleToken;

// ── Color palette ─────────────────────────────────────────────────────────────

pub const C_BG: Color = Color::Rgb(16, 20, 20);
pub const C_ACCENT: Color = Color::Rgb(16, 185, 129); // emerald, the brand colour
pub const C_ERROR: Color = Color::Rgb(239, 68, 68);
pub const C_MUTED: Color = Color::Rgb(72, 80, 88);
pub const C_SEPARATOR: Color = Color::Rgb(38, 46, 48);
pub const C_SECONDARY: Color = Color::Rgb(120, 132, 140);
pub const C_PRIMARY: Color = Color::Rgb(214, 222, 226);
pub const C_SELECTION_BG: Color = Color::Rgb(26, 36, 36);
pub const C_PANEL_BORDER: Color = Color::Rgb(38, 46, 48);
pub const C_PANEL_BORDER_FOCUSED: Color = Color::Rgb(16, 185, 129);
pub const C_NUMBER_HINT: Color = Color::Rgb(88, 100, 108);
pub const C_FILTER_BG: Color = Color::Rgb(20, 28, 30);
pub const C_FILTER_FG: Color = Color::Rgb(250, 204, 21);
pub const C_PRICE: Color = Color::Rgb(110, 200, 160);
pub const C_CLASS: Color = Color::Rgb(96, 150, 210);
pub const C_OVERLAY_BG: Color = Color::Rgb(14, 18, 20);

// Semantic tones. Pharmacy status and badges resolve to these via `token_color`.
pub const C_SUCCESS: Color = Color::Rgb(34, 197, 94);
pub const C_DANGER: Color = Color::Rgb(239, 68, 68);
pub const C_INFO: Color = Color::Rgb(59, 130, 246);
pub const C_WARNING: Color = Color::Rgb(245, 158, 11);

pub const C_MODE_NORMAL: Color = Color::Rgb(120, 132, 140);
pub const C_MODE_FILTER: Color = Color::Rgb(250, 204, 21);

pub fn token_color(token: StyleToken) -> Color {
    match token {
        StyleToken::Success => C_SUCCESS,
        StyleToken::Danger => C_DANGER,
        StyleToken::Info => C_INFO,
        StyleToken::Warning => C_WARNING,
    }
}

/// Filled badge: dark text on the tone colour.
pub fn style_badge(token: StyleToken) -> Style {
    Style::default()
        .fg(C_BG)
        .bg(token_color(token))
        .add_modifier(Modifier::BOLD)
}

// ── Predefined styles ─────────────────────────────────────────────────────────

pub fn style_secondary() -> Style {
    Style::default().fg(C_SECONDARY)
}

pub fn style_heading() -> Style {
    Style::default().fg(C_PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn style_focused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER_FOCUSED)
}

pub fn style_unfocused_border() -> Style {
    Style::default().fg(C_PANEL_BORDER)
}

#[cfg(test)]
mod tests {
    use super::*;
    use shifa_proto::projection::status_style;
    use shifa_proto::protocol::PharmacyStatus;

    #[test]
    fn status_tones_map_to_distinct_colours() {
        let open = token_color(status_style(PharmacyStatus::Open));
        let closed = token_color(status_style(PharmacyStatus::Closed));
        let duty = token_color(status_style(PharmacyStatus::OnDuty));
        assert_eq!(open, C_SUCCESS);
        assert_eq!(closed, C_DANGER);
        assert_eq!(duty, C_INFO);
        assert_ne!(open, closed);
        assert_ne!(closed, duty);
    }
}
