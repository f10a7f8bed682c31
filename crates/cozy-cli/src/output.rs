//! Output renderers and formatting helpers for CLI commands.

use std::collections::BTreeMap;

use anyhow::anyhow;
use clap::ValueEnum;
use cozy_config::{ConfigStore, Settings};
use serde_json::json;

use crate::context::{CliError, CliResult};

/// Output format for commands that render structured data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Render resolved settings together with the layer each key came from.
pub(crate) fn render_settings(
    settings: &Settings,
    store: &ConfigStore,
    format: OutputFormat,
) -> CliResult<String> {
    let sources: BTreeMap<String, &'static str> = store
        .keys()
        .into_iter()
        .filter_map(|key| {
            let layer = store.source_of(&key)?;
            Some((key, layer.as_str()))
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let document = json!({ "settings": settings, "sources": sources });
            serde_json::to_string_pretty(&document)
                .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
        }
        OutputFormat::Table => {
            let rows = [
                ("host", settings.host.clone()),
                ("port", settings.port.to_string()),
                ("admin.host", settings.admin.host.clone()),
                ("admin.port", settings.admin.port.to_string()),
                ("log.level", settings.log.level.clone()),
                ("mode", settings.mode.to_string()),
            ];
            let mut lines = vec![format!("{:<12} {:<24} SOURCE", "KEY", "VALUE")];
            for (key, value) in rows {
                let source = sources.get(key).copied().unwrap_or("-");
                lines.push(format!("{key:<12} {value:<24} {source}"));
            }
            let file = settings
                .config_file
                .as_ref()
                .map_or_else(|| "<none>".to_string(), |path| path.display().to_string());
            lines.push(format!("config file: {file}"));
            Ok(lines.join("\n"))
        }
    }
}
