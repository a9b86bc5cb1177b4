//! Headless host for the GridWorld map overlay.
//!
//! Reads events as JSON lines on stdin, drives the overlay against an
//! in-memory surface, and writes every outbound intent as a JSON line on
//! stdout. Logs go to stderr.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `gridworld-config.yaml` (or `GRIDWORLD_CONFIG`)
//! 2. Initialize structured logging (tracing), default level from config
//! 3. Run the session: spawn the intent writer, mount the overlay, feed it
//!    stdin until EOF, `detach`, or a read error
//! 4. Drain the intent writer, then report any read error

mod error;
mod events;
mod host;
mod session;
mod viewport;

use std::path::PathBuf;

use gridworld_overlay::config::OverlayConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::error::ViewerError;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG_PATH: &str = "gridworld-config.yaml";

/// Application entry point for the viewer.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or stdin/stdout fail.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (config, config_path) = load_config()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    info!("gridworld-viewer starting");
    match &config_path {
        Some(path) => info!(path = %path.display(), "Configuration loaded"),
        None => info!("Config file not found, using defaults"),
    }

    let report = session::run_session(tokio::io::stdin(), tokio::io::stdout(), &config).await?;
    info!(
        events = report.events,
        live = report.live,
        intents = report.intents,
        "gridworld-viewer stopped"
    );
    if let Some(e) = report.read_error {
        return Err(ViewerError::from(e).into());
    }
    Ok(())
}

/// Load configuration from `GRIDWORLD_CONFIG` or `gridworld-config.yaml`.
///
/// A missing file yields the defaults. Returns the path that was read, if
/// any.
fn load_config() -> Result<(OverlayConfig, Option<PathBuf>), ViewerError> {
    let path = std::env::var_os("GRIDWORLD_CONFIG")
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    if path.exists() {
        let config = OverlayConfig::from_file(&path)?;
        Ok((config, Some(path)))
    } else {
        Ok((OverlayConfig::default(), None))
    }
}
