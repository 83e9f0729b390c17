use crate::domain::{BackgroundTint, ColorToken, UrgencyLevel};
use ratatui::style::{Color, Modifier, Style};

/// Default text style
pub fn default_style() -> Style {
    Style::default().fg(Color::White)
}

/// Selected row highlight style
pub fn selected_style() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(Color::LightCyan)
        .add_modifier(Modifier::BOLD)
}

/// Title style for panes
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD)
}

/// Border style
pub fn border_style() -> Style {
    Style::default().fg(Color::Gray)
}

/// Modal background style
pub fn modal_bg_style() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}

/// Modal title style
pub fn modal_title_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// Keybinding hint style
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Error message style
pub fn error_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

/// Dimmed secondary text
pub fn muted_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn rgb(token: ColorToken) -> (u8, u8, u8) {
    match token {
        ColorToken::Green => (52, 199, 89),
        ColorToken::Yellow => (255, 204, 0),
        ColorToken::Orange => (255, 149, 0),
        ColorToken::Red => (255, 59, 48),
    }
}

/// Terminal colour for a colour token
pub fn token_color(token: ColorToken) -> Color {
    let (r, g, b) = rgb(token);
    Color::Rgb(r, g, b)
}

/// A tint blended over a black background
pub fn tint_color(tint: BackgroundTint) -> Color {
    let (r, g, b) = rgb(tint.color);
    let opacity = tint.opacity.clamp(0.0, 1.0);
    let blend = |c: u8| (c as f32 * opacity).round() as u8;
    Color::Rgb(blend(r), blend(g), blend(b))
}

/// Foreground style for an urgency badge
pub fn urgency_style(level: UrgencyLevel) -> Style {
    Style::default()
        .fg(token_color(level.color()))
        .add_modifier(Modifier::BOLD)
}

/// Urgency badge on its tinted background. Pulsing levels alternate
/// between bold and dim on each tick.
pub fn urgency_badge_style(level: UrgencyLevel, pulse_on: bool) -> Style {
    let style = urgency_style(level).bg(tint_color(level.background()));
    if level.should_pulse() && !pulse_on {
        style.remove_modifier(Modifier::BOLD).add_modifier(Modifier::DIM)
    } else {
        style
    }
}

/// Year gauge style, coloured by quarter
pub fn gauge_style(token: ColorToken) -> Style {
    Style::default().fg(token_color(token)).bg(Color::DarkGray)
}
