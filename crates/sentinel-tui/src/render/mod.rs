//! Main render/view function (View in TEA pattern)


use ratatui::style::Style;
use ratatui::widgets::Block;
use ratatui::Frame;
use sentinel_app::state::AppState;
use sentinel_app::AlertView;

use crate::theme::palette;
use crate::{layout, widgets};

/// Render the complete UI (View function in TEA)
///
/// Pure: reads state, never modifies it.
pub fn view(frame: &mut Frame, state: &AppState) {
    let area = frame.area();

    frame.render_widget(
        Block::default().style(Style::default().bg(palette::DEEPEST_BG)),
        area,
    );

    let areas = layout::create(area, state.settings.ui.show_connection_status);

    frame.render_widget(widgets::MainHeader::new(), areas.header);

    let alert_view = AlertView::from(&state.alert);
    frame.render_widget(widgets::AlertPanel::new(&alert_view), areas.body);

    if let Some(status_area) = areas.status {
        frame.render_widget(widgets::StatusBar::new(state), status_area);
    }
}
