//! Scam Sentinel Library
//!
//! Real-time scam alert surface for a voice monitoring backend. The binary
//! parses the command line; everything after that lives here.

pub mod headless;

use std::path::Path;

use sentinel_app::config::{self, Overrides, Settings};
use sentinel_app::Engine;
use sentinel_core::prelude::*;
use sentinel_transport::WebSocketTransport;

use headless::HeadlessEvent;

/// Resolve settings from the config file (explicit or default location)
/// with command-line overrides on top.
pub fn resolve_settings(config_path: Option<&Path>, overrides: &Overrides) -> Result<Settings> {
    let mut settings = match config_path {
        Some(path) => config::load_explicit_settings(path)?,
        None => config::load_settings(),
    };
    settings.apply_overrides(overrides);
    Ok(settings)
}

/// Main application entry point: the full-screen alert panel.
pub async fn run(config_path: Option<&Path>, overrides: &Overrides) -> Result<()> {
    // Initialize error handling
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;

    // Initialize logging (to file, since the TUI owns stdout)
    sentinel_core::logging::init()?;

    let settings = resolve_settings(config_path, overrides)?;
    let endpoint = settings.endpoint()?;
    info!("Endpoint: {}", endpoint);

    let transport = WebSocketTransport::new(settings.reconnect_policy());
    let engine = Engine::new(transport, endpoint, settings);

    let result = sentinel_tui::run(engine).await;

    if let Err(ref e) = result {
        error!("Application error: {:?}", e);
    }

    info!("Scam Sentinel exiting");
    result
}

/// Headless entry point: NDJSON events on stdout instead of the TUI.
pub async fn run_headless(config_path: Option<&Path>, overrides: &Overrides) -> Result<()> {
    color_eyre::install().map_err(|e| Error::terminal(e.to_string()))?;
    sentinel_core::logging::init()?;

    let setup = resolve_settings(config_path, overrides)
        .and_then(|settings| settings.endpoint().map(|endpoint| (settings, endpoint)));
    let (settings, endpoint) = match setup {
        Ok(resolved) => resolved,
        Err(e) => {
            error!("Headless startup failed: {}", e);
            HeadlessEvent::error(&e.to_string(), e.is_fatal()).emit();
            return Err(e);
        }
    };

    let transport = WebSocketTransport::new(settings.reconnect_policy());
    let engine = Engine::new(transport, endpoint, settings);

    let result = headless::runner::run_headless(engine).await;

    if let Err(ref e) = result {
        error!("Headless error: {:?}", e);
    }
    result
}
