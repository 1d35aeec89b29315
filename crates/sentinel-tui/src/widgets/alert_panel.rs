//! Alert panel: the listening indicator or the current alert block.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Paragraph, Widget, Wrap},
};
use sentinel_app::AlertView;

use crate::theme::styles;

pub const LISTENING_TEXT: &str = "Listening for suspicious activity...";
pub const ALERT_TITLE: &str = " ⚠ Scam Alert! ";
pub const DETECTED_LABEL: &str = "Detected Text:";
pub const REASONING_LABEL: &str = "Reasoning:";

/// Renders an [`AlertView`]. Text is shown verbatim; long lines wrap and
/// embedded line breaks are kept.
pub struct AlertPanel<'a> {
    view: &'a AlertView,
}

impl<'a> AlertPanel<'a> {
    pub fn new(view: &'a AlertView) -> Self {
        Self { view }
    }

    fn render_listening(area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(false);
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.height == 0 {
            return;
        }
        let row = Rect::new(inner.x, inner.y + inner.height / 2, inner.width, 1);
        Paragraph::new(Span::styled(LISTENING_TEXT, styles::text_muted()))
            .alignment(Alignment::Center)
            .render(row, buf);
    }

    fn render_alert(detected_text: &str, reasoning: &str, area: Rect, buf: &mut Buffer) {
        let block = styles::glass_block(true)
            .title(Line::styled(ALERT_TITLE, styles::alert_title()));

        let mut lines = vec![Line::styled(DETECTED_LABEL, styles::alert_label())];
        lines.extend(
            text_lines(detected_text)
                .map(|line| Line::styled(line, styles::text_primary())),
        );
        lines.push(Line::default());
        lines.push(Line::styled(REASONING_LABEL, styles::alert_label()));
        lines.extend(
            text_lines(reasoning)
                .map(|line| Line::styled(line, styles::text_secondary())),
        );

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .render(area, buf);
    }
}

/// Split on line breaks, keeping trailing empty lines. A `\r` before the
/// break belongs to the break.
fn text_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}

impl Widget for AlertPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.view {
            AlertView::Listening => Self::render_listening(area, buf),
            AlertView::Alert {
                detected_text,
                reasoning,
            } => Self::render_alert(detected_text, reasoning, area, buf),
        }
    }
}
