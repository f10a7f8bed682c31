//! Error types for telemetry operations.

use std::error::Error;
use std::fmt::{self, Display, Formatter};

use tracing_subscriber::filter::ParseError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Errors raised by telemetry helpers.
#[derive(Debug)]
pub enum TelemetryError {
    /// The configured level is not a valid filter directive.
    InvalidFilter {
        /// Directive that failed to parse.
        directive: String,
        /// Underlying parse error.
        source: ParseError,
    },
    /// Installing the tracing subscriber failed.
    SubscriberInstall {
        /// Rendered installation error.
        message: String,
    },
}

impl Display for TelemetryError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFilter { directive, .. } => {
                write!(formatter, "invalid log level '{directive}'")
            }
            Self::SubscriberInstall { message } => {
                write!(formatter, "failed to install tracing subscriber: {message}")
            }
        }
    }
}

impl Error for TelemetryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidFilter { source, .. } => Some(source),
            Self::SubscriberInstall { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::EnvFilter;

    #[test]
    fn telemetry_error_display_and_source() -> std::result::Result<(), Box<dyn Error>> {
        let Err(parse_error) = EnvFilter::try_new("cozy=loud") else {
            return Err("expected parse failure".into());
        };
        let invalid = TelemetryError::InvalidFilter {
            directive: "cozy=loud".to_string(),
            source: parse_error,
        };
        assert_eq!(invalid.to_string(), "invalid log level 'cozy=loud'");
        assert!(invalid.source().is_some());

        let install = TelemetryError::SubscriberInstall {
            message: "already set".to_string(),
        };
        assert_eq!(
            install.to_string(),
            "failed to install tracing subscriber: already set"
        );
        assert!(install.source().is_none());
        Ok(())
    }
}
