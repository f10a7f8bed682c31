//! Tracing subscriber installation.
//!
//! # Design
//! - One entry point installs the global subscriber for the whole invocation.
//! - `RUST_LOG` takes precedence over the configured level.
//! - Output goes to stderr so command output on stdout stays machine-readable.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;

use crate::error::{Result, TelemetryError};

/// Level used when neither configuration nor `RUST_LOG` provide one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Configure and install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if the level is not a valid filter directive or if a
/// global subscriber has already been installed.
pub fn init_logging(config: &LoggingConfig<'_>) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(config.level)?,
    };

    let builder = fmt::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false);

    let installed = match config.format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Compact => builder.compact().try_init(),
    };

    installed.map_err(|source| TelemetryError::SubscriberInstall {
        message: source.to_string(),
    })
}

fn build_filter(level: &str) -> Result<EnvFilter> {
    let level = if level.trim().is_empty() {
        DEFAULT_LOG_LEVEL
    } else {
        level.trim()
    };
    EnvFilter::try_new(level).map_err(|source| TelemetryError::InvalidFilter {
        directive: level.to_string(),
        source,
    })
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig<'a> {
    /// Filter directive, e.g. `info` or `cozy_cli=debug`.
    pub level: &'a str,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig<'_> {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL,
            format: LogFormat::infer(),
        }
    }
}

/// Available output formats for the logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Multi-line, human-oriented output.
    Pretty,
    /// Single-line, human-oriented output.
    Compact,
}

impl LogFormat {
    /// Choose a sensible default for the current build.
    #[must_use]
    pub const fn infer() -> Self {
        if cfg!(debug_assertions) {
            Self::Pretty
        } else {
            Self::Compact
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_filter_falls_back_on_blank_level() {
        assert!(build_filter("  ").is_ok());
    }

    #[test]
    fn build_filter_rejects_garbage() {
        let Err(err) = build_filter("cozy=loud") else {
            panic!("expected invalid directive to be rejected");
        };
        assert!(matches!(err, TelemetryError::InvalidFilter { .. }));
    }

    #[test]
    fn default_config_uses_info() {
        let config = LoggingConfig::default();
        assert_eq!(config.level, DEFAULT_LOG_LEVEL);
        assert_eq!(config.format, LogFormat::infer());
    }
}
