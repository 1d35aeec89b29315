//! Settings parser for config.toml

use std::path::{Path, PathBuf};

use super::types::Settings;
use sentinel_core::prelude::*;

pub const CONFIG_FILENAME: &str = "config.toml";
const APP_DIR: &str = "scam-sentinel";

/// `<config_dir>/scam-sentinel/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILENAME))
}

/// Load settings from the default location, falling back to defaults.
pub fn load_settings() -> Settings {
    match default_config_path() {
        Some(path) => load_settings_from(&path),
        None => {
            debug!("No config directory on this platform, using defaults");
            Settings::default()
        }
    }
}

/// Load settings from `config_path`.
///
/// A missing file yields defaults; so does a file that cannot be read or
/// parsed, with a warning.
pub fn load_settings_from(config_path: &Path) -> Settings {
    if !config_path.exists() {
        debug!("No config file at {:?}, using defaults", config_path);
        return Settings::default();
    }

    match parse_settings_file(config_path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("{}, using defaults", e);
            Settings::default()
        }
    }
}

/// Load settings from a path named on the command line. Unlike the default
/// location, the file must exist and parse.
pub fn load_explicit_settings(config_path: &Path) -> Result<Settings> {
    if !config_path.exists() {
        return Err(Error::ConfigNotFound {
            path: config_path.to_path_buf(),
        });
    }
    parse_settings_file(config_path)
}

fn parse_settings_file(config_path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(config_path)
        .map_err(|e| Error::config(format!("Failed to read {:?}: {}", config_path, e)))?;
    let settings = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {:?}: {}", config_path, e)))?;
    debug!("Loaded settings from {:?}", config_path);
    Ok(settings)
}
