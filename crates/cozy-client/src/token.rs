//! Administrative token exchange.
//!
//! The administrative API mints short-lived tokens restricted to a domain,
//! an audience, and a set of scopes. The endpoint expects its parameters as
//! query arguments and answers with the bare token, either as plain text or
//! as a JSON string.

use reqwest::Method;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::client::{Client, read_success_body};
use crate::error::{ClientError, ClientResult};

/// Subject recorded on tokens minted for the CLI.
pub const CLI_SUBJECT: &str = "CLI";
/// Audience tag marking a token as issued for CLI use.
pub const CLI_AUDIENCE: &str = "cli";

const TOKEN_PATH: &str = "/instances/token";

/// Parameters of a token request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenOptions {
    /// Domain of the instance the token grants access to.
    pub domain: String,
    /// Who the token is issued to.
    pub subject: String,
    /// Kind of consumer the token is issued for.
    pub audience: String,
    /// Capabilities granted by the token. Must not be empty.
    pub scope: Vec<String>,
}

impl TokenOptions {
    /// Options for a CLI token on `domain` restricted to `scope`.
    #[must_use]
    pub fn cli(domain: impl Into<String>, scope: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            subject: CLI_SUBJECT.to_string(),
            audience: CLI_AUDIENCE.to_string(),
            scope: vec![scope.into()],
        }
    }

    fn validate(&self) -> ClientResult<()> {
        if self.scope.iter().all(|scope| scope.trim().is_empty()) {
            return Err(ClientError::EmptyScope);
        }
        Ok(())
    }

    fn query(&self) -> [(&'static str, String); 4] {
        [
            ("Domain", self.domain.clone()),
            ("Subject", self.subject.clone()),
            ("Audience", self.audience.clone()),
            ("Scope", self.scope.join(" ")),
        ]
    }
}

impl Client {
    /// Exchange this client's credential for a scoped token.
    ///
    /// # Errors
    ///
    /// Returns an error if the scope is empty, the request fails, the server
    /// answers with a non-success status, or the body holds no token.
    #[instrument(name = "client.get_token", skip(self, options), fields(domain = %options.domain))]
    pub async fn get_token(&self, options: &TokenOptions) -> ClientResult<String> {
        const OPERATION: &str = "client.get_token";
        options.validate()?;

        let url = self.url(TOKEN_PATH)?.to_string();
        let response = self
            .request(Method::POST, TOKEN_PATH)?
            .query(&options.query())
            .send()
            .await
            .map_err(|source| ClientError::Request {
                operation: OPERATION,
                url: url.clone(),
                source,
            })?;

        let body = read_success_body(OPERATION, url.clone(), response).await?;
        let token = parse_token(&body).ok_or(ClientError::MalformedResponse {
            operation: OPERATION,
            url,
            reason: "response did not contain a token",
        })?;
        debug!(audience = %options.audience, "token issued");
        Ok(token)
    }
}

/// Extract the token from a response body. Surrounding whitespace is dropped;
/// JSON objects and arrays are never tokens.
fn parse_token(body: &str) -> Option<String> {
    let trimmed = body.trim();
    let token = match trimmed.chars().next() {
        Some('"') => serde_json::from_str::<String>(trimmed).ok()?,
        Some('{' | '[') | None => return None,
        Some(_) => trimmed.to_string(),
    };
    (!token.is_empty()).then_some(token)
}
