//! Centralized theme for the TUI.
//!
//! - `palette`: raw color constants
//! - `styles`: semantic style builders

pub mod palette;
pub mod styles;
