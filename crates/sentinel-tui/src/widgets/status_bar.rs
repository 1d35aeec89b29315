//! Status bar widget
//!
//! One row: connection indicator, endpoint, and the last transport error
//! while not connected.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use sentinel_app::state::AppState;
use sentinel_core::ConnectionPhase;

use crate::theme::styles;

/// Status bar widget showing connection state
pub struct StatusBar<'a> {
    state: &'a AppState,
}

impl<'a> StatusBar<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn indicator(&self) -> Span<'static> {
        let (icon, label, style) = styles::connection_indicator(&self.state.connection);
        let label = match (self.state.connection, self.state.reconnect_max_attempts) {
            (ConnectionPhase::Reconnecting { attempt }, Some(max)) => {
                format!("Reconnecting ({}/{})", attempt, max)
            }
            _ => label,
        };
        let label = match (self.state.connection, self.state.close_reason) {
            (ConnectionPhase::Closed, Some(reason)) if reason.is_failure() => {
                format!("{} ({})", label, reason)
            }
            _ => label,
        };
        Span::styled(format!("{} {}", icon, label), style)
    }

    fn error(&self) -> Option<Span<'a>> {
        if self.state.connection.is_open() {
            return None;
        }
        self.state
            .last_error
            .as_deref()
            .map(|message| Span::styled(message, styles::alert_title()))
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = vec![
            self.indicator(),
            Span::raw("  "),
            Span::styled(self.state.endpoint.as_str(), styles::text_muted()),
        ];
        if let Some(error) = self.error() {
            spans.push(Span::raw("  "));
            spans.push(error);
        }
        Paragraph::new(Line::from(spans)).render(area, buf);
    }
}
