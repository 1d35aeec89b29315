//! Custom widget components

mod alert_panel;
mod header;
mod status_bar;

pub use alert_panel::{AlertPanel, LISTENING_TEXT};
pub use header::MainHeader;
pub use status_bar::StatusBar;
