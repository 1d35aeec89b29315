//! Configuration for Scam Sentinel
//!
//! Supports `<config_dir>/scam-sentinel/config.toml` (or an explicit path)
//! layered under command-line overrides.

pub mod settings;
pub mod types;

pub use settings::{
    default_config_path, load_explicit_settings, load_settings, load_settings_from, CONFIG_FILENAME,
};
pub use types::*;
