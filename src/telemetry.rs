//! # Telemetry
//!
//! Tracing subscriber initialization.
//!
//! The crate itself only emits `tracing` events; hosts that want them on
//! stdout call [`init_tracing`] once at startup with their [`LogConfig`].

use crate::config::{LogConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// Initializes the global tracing subscriber from a log configuration.
///
/// The `RUST_LOG` environment variable, when set, overrides the configured
/// level. Calling this twice panics (the global subscriber can only be set
/// once), so it belongs in the host's entry point, not in library code.
pub fn init_tracing(config: &LogConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match config.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
    }
}
