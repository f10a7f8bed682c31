//! Credential strategies attached to a [`crate::Client`].

use std::fmt::{self, Debug, Formatter};

use base64::{Engine as _, engine::general_purpose};

/// How a client authenticates its requests.
#[derive(Clone, PartialEq, Eq)]
pub enum Authorizer {
    /// Administrative password sent with an empty username.
    Basic {
        /// Administrative password, possibly empty in development mode.
        password: String,
    },
    /// Pre-issued token sent verbatim.
    Bearer {
        /// Opaque token returned by the token exchange.
        token: String,
    },
}

impl Authorizer {
    /// Basic credential for the administrative API.
    #[must_use]
    pub fn basic(password: impl Into<String>) -> Self {
        Self::Basic {
            password: password.into(),
        }
    }

    /// Bearer credential for a scoped token.
    #[must_use]
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Value of the `Authorization` header for outgoing requests.
    #[must_use]
    pub fn header_value(&self) -> String {
        match self {
            Self::Basic { password } => {
                let encoded = general_purpose::STANDARD.encode(format!(":{password}"));
                format!("Basic {encoded}")
            }
            Self::Bearer { token } => format!("Bearer {token}"),
        }
    }

    /// Short name of the strategy, safe to log.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Basic { .. } => "basic",
            Self::Bearer { .. } => "bearer",
        }
    }
}

impl Debug for Authorizer {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Authorizer")
            .field("kind", &self.kind())
            .finish_non_exhaustive()
    }
}
