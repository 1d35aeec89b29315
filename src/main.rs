//! Scam Sentinel - real-time scam alerts from a voice monitoring backend
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::Parser;
use sentinel_app::config::Overrides;
use sentinel_core::prelude::*;

/// Scam Sentinel - shows the backend's latest scam alert as it happens
#[derive(Parser, Debug)]
#[command(name = "sentinel")]
#[command(about = "Real-time elder fraud/scam voice alert display", long_about = None)]
struct Args {
    /// Full backend URL (ws:// or wss://); overrides --host/--port
    #[arg(long, value_name = "URL")]
    endpoint: Option<String>,

    /// Backend host
    #[arg(long)]
    host: Option<String>,

    /// Backend port
    #[arg(long)]
    port: Option<u16>,

    /// Retry lost connections with exponential backoff
    #[arg(long)]
    reconnect: bool,

    /// Settings file (default: <config dir>/scam-sentinel/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Run in headless mode (JSON output, no TUI)
    #[arg(long)]
    headless: bool,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            endpoint: self.endpoint.clone(),
            host: self.host.clone(),
            port: self.port,
            reconnect: self.reconnect,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let overrides = args.overrides();
    let config_path = args.config.as_deref();

    if args.headless {
        scam_sentinel::run_headless(config_path, &overrides).await
    } else {
        scam_sentinel::run(config_path, &overrides).await
    }
}
