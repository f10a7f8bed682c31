//! Authorized request handles.
//!
//! # Design
//! - A `Client` is cheap, created per operation, and never shared across targets.
//! - [`Client::request`] is the only place credentials are written onto a request.

use std::fmt::{self, Display, Formatter};

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, Url};
use tracing::debug;

use crate::auth::Authorizer;
use crate::error::{ClientError, ClientResult};

/// URL scheme used to reach a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scheme {
    /// Plain HTTP, the default for a locally reachable stack.
    #[default]
    Http,
    /// HTTP over TLS.
    Https,
}

impl Scheme {
    #[must_use]
    /// Render the scheme as used in URLs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
        }
    }
}

impl Display for Scheme {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// A target domain paired with the credential used to reach it.
#[derive(Debug, Clone)]
pub struct Client {
    domain: String,
    scheme: Scheme,
    authorizer: Authorizer,
    http: reqwest::Client,
}

impl Client {
    /// Build a client for `domain` (a host, optionally with `:port`) with its
    /// own HTTP transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP transport cannot be initialised.
    pub fn new(domain: impl Into<String>, authorizer: Authorizer) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|source| ClientError::Transport { source })?;
        Ok(Self::with_transport(domain, authorizer, http))
    }

    /// Build a client for `domain` on an existing HTTP transport.
    #[must_use]
    pub fn with_transport(
        domain: impl Into<String>,
        authorizer: Authorizer,
        http: reqwest::Client,
    ) -> Self {
        Self {
            domain: domain.into(),
            scheme: Scheme::default(),
            authorizer,
            http,
        }
    }

    /// Override the URL scheme.
    #[must_use]
    pub const fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Target domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// URL scheme.
    #[must_use]
    pub const fn scheme(&self) -> Scheme {
        self.scheme
    }

    /// Credential attached to every request.
    #[must_use]
    pub const fn authorizer(&self) -> &Authorizer {
        &self.authorizer
    }

    /// Underlying HTTP transport.
    #[must_use]
    pub const fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Resolve `path` against the client's domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the domain or path do not form a valid URL.
    pub fn url(&self, path: &str) -> ClientResult<Url> {
        let base = format!("{}://{}/", self.scheme, self.domain);
        let base = Url::parse(&base).map_err(|source| ClientError::InvalidUrl {
            url: base.clone(),
            source,
        })?;
        base.join(path.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{base}{path}"),
                source,
            })
    }

    /// Start an authorized request.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the credential cannot be
    /// encoded as a header.
    pub fn request(&self, method: Method, path: &str) -> ClientResult<RequestBuilder> {
        let url = self.url(path)?;
        let mut credential = HeaderValue::from_str(&self.authorizer.header_value()).map_err(
            |_| ClientError::InvalidCredential {
                kind: self.authorizer.kind(),
            },
        )?;
        credential.set_sensitive(true);

        debug!(%method, %url, authorizer = self.authorizer.kind(), "preparing request");
        Ok(self
            .http
            .request(method, url)
            .header(AUTHORIZATION, credential))
    }

    /// Fetch the server version string (`GET /version`).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the server answers with a
    /// non-success status.
    pub async fn version(&self) -> ClientResult<String> {
        const OPERATION: &str = "client.version";
        let url = self.url("/version")?.to_string();
        let response = self
            .request(Method::GET, "/version")?
            .send()
            .await
            .map_err(|source| ClientError::Request {
                operation: OPERATION,
                url: url.clone(),
                source,
            })?;
        read_success_body(OPERATION, url, response).await
    }
}

/// Read a response body, turning non-success statuses into errors.
pub(crate) async fn read_success_body(
    operation: &'static str,
    url: String,
    response: reqwest::Response,
) -> ClientResult<String> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| ClientError::Request {
            operation,
            url: url.clone(),
            source,
        })?;

    if status.is_success() {
        Ok(body)
    } else {
        Err(ClientError::Status {
            operation,
            url,
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}
