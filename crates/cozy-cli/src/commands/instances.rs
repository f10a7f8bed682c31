use cozy_client::Authorizer;

use crate::cli::TokenCliArgs;
use crate::context::{AppContext, CliError, CliResult};
use crate::factory::ClientFactory;
use crate::secret::PasswordPrompt;

pub(crate) async fn handle_instances_status(
    ctx: &AppContext,
    prompt: &dyn PasswordPrompt,
) -> CliResult<()> {
    let admin = ClientFactory::new(ctx, prompt).new_admin_client()?;
    let version = admin.version().await.map_err(CliError::Client)?;
    println!("{} {}", admin.domain(), version.trim());
    Ok(())
}

pub(crate) async fn handle_token_cli(
    ctx: &AppContext,
    prompt: &dyn PasswordPrompt,
    args: TokenCliArgs,
) -> CliResult<()> {
    let token = issue_cli_token(ctx, prompt, &args).await?;
    println!("{token}");
    Ok(())
}

async fn issue_cli_token(
    ctx: &AppContext,
    prompt: &dyn PasswordPrompt,
    args: &TokenCliArgs,
) -> CliResult<String> {
    let domain = args.domain.trim();
    if domain.is_empty() {
        return Err(CliError::validation("domain must not be empty"));
    }
    let scope = args.scope.trim();
    if scope.is_empty() {
        return Err(CliError::validation("scope must not be empty"));
    }

    let client = ClientFactory::new(ctx, prompt)
        .new_client(domain, scope)
        .await?;
    match client.authorizer() {
        Authorizer::Bearer { token } => Ok(token.clone()),
        Authorizer::Basic { .. } => Err(CliError::failure(anyhow::anyhow!(
            "scoped client for {domain} was not issued a token"
        ))),
    }
}
