//! Command-line surface, configuration bootstrap, and command dispatch.

use clap::{Args, CommandFactory, Parser, Subcommand};
use cozy_config::defaults::{KEY_ADMIN_HOST, KEY_ADMIN_PORT, KEY_HOST, KEY_LOG_LEVEL, KEY_PORT};
use cozy_config::{ConfigSources, ConfigStore, Environment, resolve};
use cozy_telemetry::{LogFormat, LoggingConfig};
use tracing::debug;

use crate::commands::config::handle_config_show;
use crate::commands::instances::{handle_instances_status, handle_token_cli};
use crate::context::{AppContext, CliError, CliResult};
use crate::output::OutputFormat;
use crate::secret::{PasswordPrompt, TerminalPrompt};

/// Parses CLI arguments, resolves configuration, and executes the requested
/// command. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    let environment = Environment::from_process();

    match execute(cli, environment, &TerminalPrompt).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn execute(
    cli: Cli,
    environment: Environment,
    prompt: &dyn PasswordPrompt,
) -> CliResult<()> {
    let store = configure(&cli, environment.clone())?;
    let ctx = AppContext::new(store, environment)?;

    cozy_telemetry::init_logging(&LoggingConfig {
        level: &ctx.settings.log.level,
        format: LogFormat::infer(),
    })
    .map_err(CliError::Telemetry)?;
    if let Some(path) = &ctx.settings.config_file {
        debug!(path = %path.display(), "using config file");
    }

    match cli.command {
        Some(command) => dispatch(command, &ctx, prompt).await,
        None => Cli::command()
            .print_help()
            .map_err(|err| CliError::failure(anyhow::anyhow!("failed to print help: {err}"))),
    }
}

async fn dispatch(
    command: Command,
    ctx: &AppContext,
    prompt: &dyn PasswordPrompt,
) -> CliResult<()> {
    match command {
        Command::Config(config) => match config {
            ConfigCommand::Show(args) => handle_config_show(ctx, args.output),
        },
        Command::Instances(instances) => match instances {
            InstancesCommand::Status => handle_instances_status(ctx, prompt).await,
            InstancesCommand::TokenCli(args) => handle_token_cli(ctx, prompt, args).await,
        },
    }
}

/// Resolve configuration from the global flags, the environment, and the
/// discovered or explicit configuration file.
fn configure(cli: &Cli, environment: Environment) -> CliResult<ConfigStore> {
    resolve(config_sources(cli, environment)).map_err(CliError::Config)
}

fn config_sources(cli: &Cli, environment: Environment) -> ConfigSources {
    let mut sources = ConfigSources::new(environment);
    if let Some(path) = cli.config.as_deref() {
        sources = sources.with_explicit_path(path);
    }
    if let Some(host) = &cli.host {
        sources = sources.with_override(KEY_HOST, host.as_str());
    }
    if let Some(port) = cli.port {
        sources = sources.with_override(KEY_PORT, port);
    }
    if let Some(host) = &cli.admin_host {
        sources = sources.with_override(KEY_ADMIN_HOST, host.as_str());
    }
    if let Some(port) = cli.admin_port {
        sources = sources.with_override(KEY_ADMIN_PORT, port);
    }
    if let Some(level) = &cli.log_level {
        sources = sources.with_override(KEY_LOG_LEVEL, level.as_str());
    }
    sources
}

#[derive(Parser)]
#[command(
    name = "cozy-stack",
    version,
    about = "cozy-stack is the main command",
    long_about = "Cozy is a platform that brings all your web services in the same private space.\n\
                  With it, your web apps and your devices can share data easily, providing you\n\
                  with a new experience. You can install Cozy on your own hardware where no one\n\
                  profiles you."
)]
pub(crate) struct Cli {
    /// Configuration file (default: cozy.yaml in ., $HOME/.cozy, or /etc/cozy)
    #[arg(short = 'c', long = "config", global = true, value_name = "PATH")]
    config: Option<String>,
    /// Server host [default: localhost]
    #[arg(long, global = true)]
    host: Option<String>,
    /// Server port [default: 8080]
    #[arg(short = 'p', long, global = true)]
    port: Option<u16>,
    /// Administration server host [default: localhost]
    #[arg(long = "admin-host", global = true)]
    admin_host: Option<String>,
    /// Administration server port [default: 6060]
    #[arg(long = "admin-port", global = true)]
    admin_port: Option<u16>,
    /// Define the log level [default: info]
    #[arg(long = "log-level", global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Inspect the resolved configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Manage instances through the administration server
    #[command(subcommand)]
    Instances(InstancesCommand),
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print resolved settings and where each value came from
    Show(ConfigShowArgs),
}

#[derive(Args)]
struct ConfigShowArgs {
    #[arg(long = "output", alias = "format", value_enum, default_value_t = OutputFormat::Table)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum InstancesCommand {
    /// Check that the administration server answers with the admin credential
    Status,
    /// Generate a CLI token for an instance
    TokenCli(TokenCliArgs),
}

#[derive(Args)]
pub(crate) struct TokenCliArgs {
    /// Domain of the instance
    pub(crate) domain: String,
    /// Permission scope of the token, e.g. io.cozy.files
    pub(crate) scope: String,
}
