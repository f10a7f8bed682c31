//! Administrative password acquisition.

use std::io;

use cozy_config::defaults::ADMIN_PASSWORD_ENV;
use cozy_config::{DeployMode, Environment};
use tracing::debug;

use crate::context::{CliError, CliResult};

const PASSWORD_PROMPT: &str = "Password:";

/// Source of interactively entered secrets.
pub(crate) trait PasswordPrompt: Sync {
    /// Print `prompt` and read one line without echoing it.
    fn read_masked(&self, prompt: &str) -> io::Result<String>;
}

/// Reads from the controlling terminal with echo disabled.
pub(crate) struct TerminalPrompt;

impl PasswordPrompt for TerminalPrompt {
    fn read_masked(&self, prompt: &str) -> io::Result<String> {
        rpassword::prompt_password(prompt)
    }
}

/// Obtain the administrative password.
///
/// Development deployments do not authenticate the administrative API, so an
/// empty password is returned without prompting. Otherwise a non-empty
/// `COZY_ADMIN_PASSWORD` is used verbatim, and the terminal is the last resort.
pub(crate) fn obtain_admin_password(
    mode: DeployMode,
    environment: &Environment,
    prompt: &dyn PasswordPrompt,
) -> CliResult<String> {
    if mode.is_development() {
        return Ok(String::new());
    }

    if let Some(password) = environment
        .get(ADMIN_PASSWORD_ENV)
        .filter(|value| !value.is_empty())
    {
        debug!(variable = ADMIN_PASSWORD_ENV, "using administrative password from environment");
        return Ok(password.to_string());
    }

    prompt
        .read_masked(PASSWORD_PROMPT)
        .map_err(|source| CliError::SecretRead { source })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Prompt that replays a fixed answer and counts how often it was asked.
    pub(crate) struct ScriptedPrompt {
        answer: Option<String>,
        calls: AtomicUsize,
    }

    impl ScriptedPrompt {
        pub(crate) fn answering(answer: &str) -> Self {
            Self {
                answer: Some(answer.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                answer: None,
                calls: AtomicUsize::new(0),
            }
        }

        pub(crate) fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl PasswordPrompt for ScriptedPrompt {
        fn read_masked(&self, prompt: &str) -> io::Result<String> {
            assert_eq!(prompt, PASSWORD_PROMPT);
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .clone()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no tty available"))
        }
    }

    #[test]
    fn development_mode_never_prompts() -> CliResult<()> {
        let prompt = ScriptedPrompt::answering("typed");
        let environment = Environment::from_pairs([(ADMIN_PASSWORD_ENV, "from-env")]);

        let password = obtain_admin_password(DeployMode::Development, &environment, &prompt)?;
        assert_eq!(password, "");
        assert_eq!(prompt.calls(), 0);
        Ok(())
    }

    #[test]
    fn environment_password_is_used_verbatim() -> CliResult<()> {
        let prompt = ScriptedPrompt::failing();
        let environment = Environment::from_pairs([(ADMIN_PASSWORD_ENV, " s3cret \n")]);

        let password = obtain_admin_password(DeployMode::Production, &environment, &prompt)?;
        assert_eq!(password, " s3cret \n");
        assert_eq!(prompt.calls(), 0);
        Ok(())
    }

    #[test]
    fn empty_environment_password_falls_back_to_prompt() -> CliResult<()> {
        let prompt = ScriptedPrompt::answering("typed");
        let environment = Environment::from_pairs([(ADMIN_PASSWORD_ENV, "")]);

        let password = obtain_admin_password(DeployMode::Production, &environment, &prompt)?;
        assert_eq!(password, "typed");
        assert_eq!(prompt.calls(), 1);
        Ok(())
    }

    #[test]
    fn prompt_failure_is_a_secret_read_error() {
        let prompt = ScriptedPrompt::failing();
        let result = obtain_admin_password(DeployMode::Production, &Environment::default(), &prompt);
        assert!(matches!(result, Err(CliError::SecretRead { .. })));
        assert_eq!(prompt.calls(), 1);
    }
}
