//! Log output for the barbershop binaries.
//!
//! Normalization never fails loudly. Fallbacks are `trace` events, skipped
//! records are `warn` events, and requests are `debug` events, all under
//! `barbershop_*` targets. Events go to stderr so `--json` output on stdout
//! stays parseable.
//!
//! Three presets cover the CLI:
//! - [`TracingConfig::cli`]: warnings only
//! - [`TracingConfig::cli_debug`]: requests and session handling
//! - [`TracingConfig::diagnostics`]: every fallback, as JSON lines
//!
//! `RUST_LOG` overrides the preset level unless an explicit filter is set
//! with [`TracingConfig::with_env_filter`].

use thiserror::Error;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Errors that can occur during tracing initialization
#[derive(Debug, Error)]
pub enum TracingError {
    /// Failed to set global subscriber
    #[error("failed to set global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),

    /// Failed to parse env filter directive
    #[error("failed to parse log filter: {0}")]
    EnvFilter(#[from] tracing_subscriber::filter::ParseError),
}

/// How events are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TracingOutputFormat {
    /// One short line per event.
    #[default]
    Compact,
    /// One JSON object per event, for `jq` and log collectors.
    Json,
}

/// Verbosity and layout of log output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingConfig {
    /// Level for `barbershop*` targets when no filter applies.
    pub level: Level,
    pub output_format: TracingOutputFormat,
    /// File and line of each event.
    pub include_location: bool,
    /// Timestamp and target of each event.
    pub include_metadata: bool,
    /// Explicit filter directive; wins over `RUST_LOG` and `level`.
    pub env_filter: Option<String>,
}

impl TracingConfig {
    /// Warnings only: skipped records and failed logouts.
    #[must_use]
    pub fn cli() -> Self {
        Self {
            level: Level::WARN,
            output_format: TracingOutputFormat::Compact,
            include_location: false,
            include_metadata: false,
            env_filter: None,
        }
    }

    /// Requests, session loading and fixture calls.
    #[must_use]
    pub fn cli_debug() -> Self {
        Self {
            level: Level::DEBUG,
            include_location: true,
            ..Self::cli()
        }
    }

    /// Every normalization fallback, one JSON object per line.
    #[must_use]
    pub fn diagnostics() -> Self {
        Self {
            level: Level::TRACE,
            output_format: TracingOutputFormat::Json,
            include_location: true,
            include_metadata: true,
            env_filter: None,
        }
    }

    /// Set an explicit filter directive, e.g. `barbershop_core::json=trace`.
    #[must_use]
    pub fn with_env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Returns the directive used when neither a filter nor `RUST_LOG` is set.
    pub fn default_directive(&self) -> String {
        format!("barbershop={}", self.level)
    }

    fn filter(&self) -> Result<EnvFilter, TracingError> {
        match self.env_filter {
            Some(ref directive) => Ok(EnvFilter::try_new(directive)?),
            None => Ok(EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(self.default_directive()))),
        }
    }
}

/// Installs the global subscriber. Call once, early in `main`.
///
/// # Errors
///
/// Returns an error if a subscriber is already installed or the filter
/// directive does not parse.
pub fn init_tracing(config: TracingConfig) -> Result<(), TracingError> {
    let filter = config.filter()?;

    let layer = match config.output_format {
        TracingOutputFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_target(config.include_metadata);
            if config.include_metadata {
                layer.boxed()
            } else {
                layer.without_time().boxed()
            }
        }
        TracingOutputFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_file(config.include_location)
            .with_line_number(config.include_location)
            .with_target(config.include_metadata)
            .boxed(),
    };

    tracing::subscriber::set_global_default(tracing_subscriber::registry().with(filter).with(layer))?;
    Ok(())
}
