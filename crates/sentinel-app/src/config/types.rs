//! Configuration types

use std::time::Duration;

use sentinel_core::prelude::*;
use sentinel_core::{Endpoint, DEFAULT_HOST, DEFAULT_PORT};
use sentinel_transport::ReconnectPolicy;
use serde::{Deserialize, Serialize};

/// Settings from config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub connection: ConnectionSettings,

    #[serde(default)]
    pub reconnect: ReconnectSettings,

    #[serde(default)]
    pub ui: UiSettings,
}

impl Settings {
    /// Resolve the backend endpoint. `url` wins over `host`/`port`/`path`.
    pub fn endpoint(&self) -> Result<Endpoint> {
        match &self.connection.url {
            Some(url) => Endpoint::parse(url),
            None => Endpoint::from_parts(
                &self.connection.host,
                self.connection.port,
                &self.connection.path,
            ),
        }
    }

    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        self.reconnect.policy()
    }

    /// Layer command-line overrides on top of file settings.
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(endpoint) = &overrides.endpoint {
            self.connection.url = Some(endpoint.clone());
        } else if overrides.host.is_some() || overrides.port.is_some() {
            // host/port on the command line replace a file-level url
            self.connection.url = None;
        }
        if let Some(host) = &overrides.host {
            self.connection.host = host.clone();
        }
        if let Some(port) = overrides.port {
            self.connection.port = port;
        }
        if overrides.reconnect {
            self.reconnect.enabled = true;
        }
    }
}

/// Command-line values that take precedence over the settings file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub reconnect: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_path")]
    pub path: String,

    /// Full `ws://` / `wss://` URL; overrides host, port and path
    #[serde(default)]
    pub url: Option<String>,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            path: default_path(),
            url: None,
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_path() -> String {
    "/".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconnectSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

impl Default for ReconnectSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: default_max_attempts(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

impl ReconnectSettings {
    pub fn policy(&self) -> ReconnectPolicy {
        ReconnectPolicy {
            enabled: self.enabled,
            max_attempts: self.max_attempts,
            initial_backoff: Duration::from_millis(self.initial_backoff_ms),
            max_backoff: Duration::from_millis(self.max_backoff_ms),
        }
    }
}

fn default_max_attempts() -> u32 {
    sentinel_transport::MAX_RECONNECT_ATTEMPTS
}

fn default_initial_backoff_ms() -> u64 {
    sentinel_transport::INITIAL_BACKOFF.as_millis() as u64
}

fn default_max_backoff_ms() -> u64 {
    sentinel_transport::MAX_BACKOFF.as_millis() as u64
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UiSettings {
    /// Show the connection phase in the status bar
    #[serde(default = "default_true")]
    pub show_connection_status: bool,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            show_connection_status: true,
        }
    }
}

fn default_true() -> bool {
    true
}
