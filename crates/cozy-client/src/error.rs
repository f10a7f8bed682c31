//! Error types for API clients.

use thiserror::Error;

/// Errors raised while building or sending API requests.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The HTTP transport could not be initialised.
    #[error("failed to initialise HTTP transport")]
    Transport {
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The target domain and path do not form a valid URL.
    #[error("invalid URL '{url}'")]
    InvalidUrl {
        /// URL that failed to parse.
        url: String,
        /// Source parse error.
        source: url::ParseError,
    },
    /// The credential cannot be carried in an HTTP header.
    #[error("{kind} credential contains characters not allowed in a header")]
    InvalidCredential {
        /// Authorizer kind (`basic` or `bearer`).
        kind: &'static str,
    },
    /// A scoped token was requested without any scope.
    #[error("token scope must not be empty")]
    EmptyScope,
    /// The request could not be sent or the response not read.
    #[error("request to {url} failed")]
    Request {
        /// Operation identifier.
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// Source HTTP client error.
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("{url} returned status {status}{}", detail_suffix(.body))]
    Status {
        /// Operation identifier.
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
        /// Response body, trimmed.
        body: String,
    },
    /// The server answered successfully with an unusable payload.
    #[error("malformed response from {url}: {reason}")]
    MalformedResponse {
        /// Operation identifier.
        operation: &'static str,
        /// URL used for the request.
        url: String,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
}

impl ClientError {
    /// HTTP status carried by the error, if the server answered.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn detail_suffix(body: &str) -> String {
    if body.is_empty() {
        String::new()
    } else {
        format!(": {body}")
    }
}

/// Convenience alias for client results.
pub type ClientResult<T> = Result<T, ClientError>;
