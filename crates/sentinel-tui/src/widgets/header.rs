//! Header bar widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::theme::styles;

pub const APP_NAME: &str = "Scam Sentinel";
pub const APP_SUBTITLE: &str = "Elder Fraud/Scam Voice Detector";

const HINT_WIDTH: u16 = 9;

/// Title bar with the quit hint on the right
pub struct MainHeader;

impl MainHeader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MainHeader {
    fn default() -> Self {
        Self::new()
    }
}

impl Widget for MainHeader {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false);
        let inner = block.inner(area);
        block.render(area, buf);

        // Title wins on narrow terminals
        let show_hint = inner.width >= 60;
        let [title_area, hint_area] = Layout::horizontal([
            Constraint::Min(0),
            Constraint::Length(if show_hint { HINT_WIDTH } else { 0 }),
        ])
        .areas(inner);

        let title = Line::from(vec![
            Span::styled(format!(" {}", APP_NAME), styles::accent_bold()),
            Span::styled("  ", styles::text_muted()),
            Span::styled(APP_SUBTITLE, styles::text_secondary()),
        ]);
        Paragraph::new(title).render(title_area, buf);

        let hint = Line::from(vec![
            Span::styled("[", styles::text_muted()),
            Span::styled("q", styles::keybinding()),
            Span::styled("] Quit ", styles::text_muted()),
        ]);
        if show_hint {
            Paragraph::new(hint)
                .alignment(Alignment::Right)
                .render(hint_area, buf);
        }
    }
}
