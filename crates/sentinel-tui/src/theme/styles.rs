//! Semantic style builders.

use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders};
use sentinel_core::ConnectionPhase;

use super::palette;

// --- Text styles ---
pub fn text_primary() -> Style {
    Style::default().fg(palette::TEXT_PRIMARY)
}

pub fn text_secondary() -> Style {
    Style::default().fg(palette::TEXT_SECONDARY)
}

pub fn text_muted() -> Style {
    Style::default().fg(palette::TEXT_MUTED)
}

// --- Accent styles ---
pub fn accent_bold() -> Style {
    Style::default()
        .fg(palette::ACCENT)
        .add_modifier(Modifier::BOLD)
}

// --- Alert styles ---
pub fn alert_title() -> Style {
    Style::default()
        .fg(palette::STATUS_RED)
        .add_modifier(Modifier::BOLD)
}

pub fn alert_label() -> Style {
    Style::default()
        .fg(palette::TEXT_PRIMARY)
        .add_modifier(Modifier::BOLD)
}

pub fn keybinding() -> Style {
    Style::default().fg(palette::STATUS_YELLOW)
}

// --- Block builders ---

/// Rounded container; red border while an alert is shown.
pub fn glass_block(alerting: bool) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(if alerting {
            palette::BORDER_ALERT
        } else {
            palette::BORDER_DIM
        }))
}

/// Indicator glyph, label and style for a connection phase.
pub fn connection_indicator(phase: &ConnectionPhase) -> (&'static str, String, Style) {
    let style = match phase {
        ConnectionPhase::Open => Style::default().fg(palette::STATUS_GREEN),
        ConnectionPhase::Connecting | ConnectionPhase::Reconnecting { .. } => {
            Style::default().fg(palette::STATUS_YELLOW)
        }
        ConnectionPhase::Closed => Style::default().fg(palette::STATUS_RED),
    };
    let icon = if phase.is_open() { "●" } else { "○" };
    (icon, phase.label(), style)
}
