//! Construction of administrative and domain-scoped API clients.
//!
//! Scoped access is always obtained through the administrative API: the CLI
//! authenticates there with the administrative password, asks for a token
//! restricted to one domain and scope, and then talks to the domain with that
//! token. There is no retry; a failed exchange ends the invocation.

use cozy_client::{Authorizer, Client, TokenOptions};
use tracing::{error, info};

use crate::context::{AppContext, CliError, CliResult};
use crate::secret::{PasswordPrompt, obtain_admin_password};

/// Builds clients for command handlers.
pub(crate) struct ClientFactory<'a> {
    ctx: &'a AppContext,
    prompt: &'a dyn PasswordPrompt,
}

impl<'a> ClientFactory<'a> {
    pub(crate) fn new(ctx: &'a AppContext, prompt: &'a dyn PasswordPrompt) -> Self {
        Self { ctx, prompt }
    }

    /// Client for the administrative API, authenticated with the
    /// administrative password.
    pub(crate) fn new_admin_client(&self) -> CliResult<Client> {
        let password = obtain_admin_password(
            self.ctx.settings.mode,
            &self.ctx.environment,
            self.prompt,
        )?;
        Ok(Client::with_transport(
            self.ctx.settings.admin_server_addr(),
            Authorizer::basic(password),
            self.ctx.http.clone(),
        ))
    }

    /// Client for `domain`, carrying a CLI token restricted to `scope`.
    pub(crate) async fn new_client(&self, domain: &str, scope: &str) -> CliResult<Client> {
        let admin = self.new_admin_client()?;
        let options = TokenOptions::cli(domain, scope);

        match admin.get_token(&options).await {
            Ok(token) => {
                info!(domain = %domain, scope = %scope, "issued CLI token");
                Ok(Client::with_transport(
                    domain,
                    Authorizer::bearer(token),
                    self.ctx.http.clone(),
                ))
            }
            Err(source) => {
                error!(domain = %domain, error = %source, "could not generate access to domain");
                Err(CliError::TokenExchange {
                    domain: domain.to_string(),
                    source,
                })
            }
        }
    }
}
