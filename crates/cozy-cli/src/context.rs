//! Per-invocation context and the CLI error type.

use std::error::Error as StdError;
use std::io;

use cozy_client::ClientError;
use cozy_config::{ConfigError, ConfigStore, Environment, Settings};
use cozy_telemetry::TelemetryError;
use thiserror::Error;

/// CLI-level error type. Every variant ends the invocation; only the
/// dispatcher turns one into an exit code.
#[derive(Debug, Error)]
pub(crate) enum CliError {
    /// Command arguments were rejected before any work started.
    #[error("{0}")]
    Validation(String),
    /// Configuration could not be resolved.
    #[error("configuration error")]
    Config(#[source] ConfigError),
    /// Logging could not be initialised.
    #[error("logging setup failed")]
    Telemetry(#[source] TelemetryError),
    /// The administrative password could not be read from the terminal.
    #[error("failed to read the administrative password")]
    SecretRead {
        /// Terminal read failure.
        source: io::Error,
    },
    /// The administrative token exchange failed.
    #[error("could not generate access to domain {domain}")]
    TokenExchange {
        /// Domain the token was requested for.
        domain: String,
        /// Underlying client failure.
        source: ClientError,
    },
    /// A request against the API failed.
    #[error("request failed")]
    Client(#[source] ClientError),
    /// Any other operational failure.
    #[error(transparent)]
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_)
            | Self::Telemetry(_)
            | Self::SecretRead { .. }
            | Self::TokenExchange { .. }
            | Self::Client(_)
            | Self::Failure(_) => 1,
        }
    }

    /// Render the error and its causes on one line, outermost first.
    pub(crate) fn display_message(&self) -> String {
        if let Self::Failure(error) = self {
            return format!("{error:#}");
        }
        let mut message = self.to_string();
        let mut source = StdError::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}

/// Application context passed to command handlers.
///
/// Built once, after configuration resolution, and only read afterwards.
#[derive(Debug, Clone)]
pub(crate) struct AppContext {
    pub(crate) store: ConfigStore,
    pub(crate) settings: Settings,
    pub(crate) environment: Environment,
    pub(crate) http: reqwest::Client,
}

impl AppContext {
    /// Derive typed settings from a resolved store and build the shared HTTP
    /// transport.
    pub(crate) fn new(store: ConfigStore, environment: Environment) -> CliResult<Self> {
        let settings = Settings::from_store(&store).map_err(CliError::Config)?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("cozy-stack/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| CliError::failure(anyhow::anyhow!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            store,
            settings,
            environment,
            http,
        })
    }
}
