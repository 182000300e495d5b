//! Tracing setup for salarysheet.
//!
//! ```ignore
//! use salarysheet_core::tracing::{init_tracing, TracingConfig};
//!
//! init_tracing(TracingConfig::server())?;
//! ```

use std::str::FromStr;

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Target prefix used for the default filter directive.
const CRATE_TARGET: &str = "salarysheet";

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    #[error("failed to parse env filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),

    #[error("unknown log format `{0}` (expected pretty, compact or json)")]
    UnknownFormat(String),
}

/// Output format for log lines
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    #[default]
    Pretty,
    Compact,
    /// One JSON object per line, for log shippers.
    Json,
}

impl FromStr for TracingOutputFormat {
    type Err = TracingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "compact" => Ok(Self::Compact),
            "json" => Ok(Self::Json),
            other => Err(TracingError::UnknownFormat(other.to_string())),
        }
    }
}

/// Configuration for tracing initialization
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Level used when neither `RUST_LOG` nor `env_filter` is set.
    pub default_level: Level,
    pub output_format: TracingOutputFormat,
    /// Include file and line of the log call.
    pub include_location: bool,
    pub include_target: bool,
    /// Explicit filter directive; wins over `RUST_LOG`.
    pub env_filter: Option<String>,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: Level::INFO,
            output_format: TracingOutputFormat::Pretty,
            include_location: false,
            include_target: true,
            env_filter: None,
        }
    }
}

impl TracingConfig {
    /// Preset for the long-running HTTP service.
    #[must_use]
    pub fn server() -> Self {
        Self {
            output_format: TracingOutputFormat::Compact,
            ..Self::default()
        }
    }

    /// Preset for `--debug` runs.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            default_level: Level::DEBUG,
            output_format: TracingOutputFormat::Compact,
            include_location: true,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_level(mut self, level: Level) -> Self {
        self.default_level = level;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: TracingOutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// The filter directive applied when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> String {
        format!(
            "{CRATE_TARGET}={level},tower_http={level}",
            level = self.default_level
        )
    }

    fn build_filter(&self) -> Result<EnvFilter, TracingError> {
        match self.env_filter {
            Some(ref filter) => Ok(EnvFilter::try_new(filter)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }
}

/// Installs the global subscriber. Call once at startup.
///
/// # Errors
///
/// Fails if a global subscriber is already set or the filter directive does
/// not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.build_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    let layer = fmt::layer()
        .with_file(config.include_location)
        .with_line_number(config.include_location)
        .with_target(config.include_target);

    match config.output_format {
        TracingOutputFormat::Pretty => {
            tracing::subscriber::set_global_default(registry.with(layer.pretty()))?
        }
        TracingOutputFormat::Compact => {
            tracing::subscriber::set_global_default(registry.with(layer.compact()))?
        }
        TracingOutputFormat::Json => {
            tracing::subscriber::set_global_default(registry.with(layer.json()))?
        }
    }

    Ok(())
}
