//! Screen layout definitions for the TUI

use ratatui::layout::{Constraint, Layout, Rect};

/// Screen areas for the main layout
#[derive(Debug, Clone, Copy)]
pub struct ScreenAreas {
    /// Title bar (glass container)
    pub header: Rect,

    /// Alert panel or listening indicator
    pub body: Rect,

    /// One-row connection status; `None` when hidden in settings
    pub status: Option<Rect>,
}

/// Split the screen into header, body and optional status row.
pub fn create(area: Rect, show_status: bool) -> ScreenAreas {
    let status_height = if show_status { 1 } else { 0 };

    let chunks = Layout::vertical([
        Constraint::Length(3),             // Header: border + title + border
        Constraint::Min(3),                // Body
        Constraint::Length(status_height), // Status bar
    ])
    .split(area);

    ScreenAreas {
        header: chunks[0],
        body: chunks[1],
        status: show_status.then_some(chunks[2]),
    }
}
