//! Subscriber setup for the `tracing` ecosystem.
//!
//! Logs always go to stderr so they never interleave with the interactive
//! prompts written to stdout.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing_subscriber::EnvFilter;

use crate::errors::SiteprobeError;

/// Directive used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "siteprobe=info";

/// Log line format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human readable lines.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Builds the filter from `RUST_LOG`, falling back to `default_directive`.
pub fn build_filter(default_directive: &str) -> Result<EnvFilter, SiteprobeError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(default_directive)
            .map_err(|e| SiteprobeError::Config(format!("invalid log filter: {e}"))),
    }
}

/// Installs the global subscriber.
///
/// Fails if a subscriber is already installed.
pub fn init_tracing(format: LogFormat, default_directive: &str) -> Result<(), SiteprobeError> {
    let filter = build_filter(default_directive)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let installed = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().with_current_span(true).try_init(),
    };
    installed.map_err(|e| SiteprobeError::Config(format!("logging already initialized: {e}")))
}
