use crate::context::{AppContext, CliResult};
use crate::output::{OutputFormat, render_settings};

pub(crate) fn handle_config_show(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let rendered = render_settings(&ctx.settings, &ctx.store, format)?;
    println!("{rendered}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cozy_config::{ConfigSources, Environment, resolve};

    #[test]
    fn config_show_renders_resolved_context() -> CliResult<()> {
        let store = resolve(
            ConfigSources::new(Environment::default()).with_search_paths(Vec::<String>::new()),
        )
        .map_err(crate::context::CliError::Config)?;
        let ctx = AppContext::new(store, Environment::default())?;

        handle_config_show(&ctx, OutputFormat::Table)?;
        handle_config_show(&ctx, OutputFormat::Json)?;
        Ok(())
    }
}
