//! Configuration file discovery and layer merging.
//!
//! # Design
//! - An explicit path means "this file and nothing else": missing is an error.
//! - Discovery without an explicit path is best effort: finding nothing is fine.
//! - The store is only returned once every layer has loaded, so callers never
//!   see a partial merge.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::debug;

use crate::defaults::{
    CONFIG_EXTENSIONS, CONFIG_FILE_NAME, ENV_PREFIX, compiled_defaults, config_search_paths,
};
use crate::env::Environment;
use crate::error::{ConfigError, ConfigResult, ParseError};
use crate::store::{ConfigStore, env_key, normalize_key};

/// Inputs to a single configuration resolution.
#[derive(Debug, Clone)]
pub struct ConfigSources {
    /// File requested explicitly (e.g. via `--config`). Empty means "search".
    pub explicit_path: Option<PathBuf>,
    /// Prefix for environment variables, without the trailing underscore.
    pub env_prefix: String,
    /// Environment snapshot consulted for overrides.
    pub environment: Environment,
    /// Directories searched, in order, when no explicit path is given.
    pub search_paths: Vec<String>,
    /// Base name of the discovered file, without extension.
    pub file_name: String,
    /// Lowest-precedence values, keyed by dot path.
    pub defaults: BTreeMap<String, Value>,
    /// Values from flags explicitly passed on the command line.
    pub overrides: BTreeMap<String, Value>,
}

impl ConfigSources {
    /// Sources using the standard prefix, file name, search paths, and
    /// compiled defaults.
    #[must_use]
    pub fn new(environment: Environment) -> Self {
        Self {
            explicit_path: None,
            env_prefix: ENV_PREFIX.to_string(),
            environment,
            search_paths: config_search_paths(),
            file_name: CONFIG_FILE_NAME.to_string(),
            defaults: compiled_defaults(),
            overrides: BTreeMap::new(),
        }
    }

    /// Restrict discovery to exactly `path`.
    #[must_use]
    pub fn with_explicit_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.explicit_path = Some(path.into());
        self
    }

    /// Replace the search directories.
    #[must_use]
    pub fn with_search_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    /// Record a value from an explicitly passed flag.
    #[must_use]
    pub fn with_override(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.overrides.insert(normalize_key(key), value.into());
        self
    }

    /// Replace or add a default value.
    #[must_use]
    pub fn with_default(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.defaults.insert(normalize_key(key), value.into());
        self
    }
}

/// Resolve every configuration layer into a single read-only store.
///
/// # Errors
///
/// - [`ConfigError::NotFound`] if an explicit path was given and no file exists there.
/// - [`ConfigError::Parse`] if the selected file is malformed.
/// - [`ConfigError::Io`] if the selected file exists but cannot be read.
pub fn resolve(sources: ConfigSources) -> ConfigResult<ConfigStore> {
    let config_file = locate_config_file(&sources)?;
    let file = match &config_file {
        Some(path) => read_config_file(path)?,
        None => BTreeMap::new(),
    };

    let env_prefix = env_key(&sources.env_prefix, "");
    let env = sources
        .environment
        .with_prefix(&env_prefix)
        .filter(|(_, value)| !value.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    Ok(ConfigStore {
        env_prefix: sources.env_prefix,
        overrides: normalize_layer(sources.overrides),
        env,
        file,
        defaults: normalize_layer(sources.defaults),
        config_file,
    })
}

fn locate_config_file(sources: &ConfigSources) -> ConfigResult<Option<PathBuf>> {
    if let Some(path) = sources
        .explicit_path
        .as_ref()
        .filter(|path| !path.as_os_str().is_empty())
    {
        if path.is_file() {
            return Ok(Some(path.clone()));
        }
        return Err(ConfigError::NotFound { path: path.clone() });
    }

    for entry in &sources.search_paths {
        let Some(dir) = expand_search_path(entry, &sources.environment) else {
            debug!(path = %entry, "skipping search path that cannot be expanded");
            continue;
        };
        for extension in CONFIG_EXTENSIONS {
            let candidate = dir.join(format!("{}.{extension}", sources.file_name));
            if candidate.is_file() {
                return Ok(Some(candidate));
            }
        }
    }

    Ok(None)
}

fn expand_search_path(entry: &str, environment: &Environment) -> Option<PathBuf> {
    let home_relative = entry
        .strip_prefix("$HOME")
        .or_else(|| entry.strip_prefix('~'));
    match home_relative {
        Some(rest) => {
            let home = environment.home_dir()?;
            let rest = rest.trim_start_matches('/');
            Some(if rest.is_empty() { home } else { home.join(rest) })
        }
        None => Some(PathBuf::from(entry)),
    }
}

fn read_config_file(path: &Path) -> ConfigResult<BTreeMap<String, Value>> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        operation: "config.read",
        path: path.to_path_buf(),
        source,
    })?;
    let document = parse_document(path, &contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let mut flat = BTreeMap::new();
    flatten_into(&mut flat, None, document);
    Ok(flat)
}

fn parse_document(path: &Path, contents: &str) -> Result<Map<String, Value>, ParseError> {
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let value: Value = if is_json {
        serde_json::from_str(contents)?
    } else {
        serde_yaml::from_str(contents)?
    };

    match value {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        _ => Err(ParseError::NotAMapping),
    }
}

fn flatten_into(out: &mut BTreeMap<String, Value>, prefix: Option<&str>, map: Map<String, Value>) {
    for (key, value) in map {
        let key = match prefix {
            Some(prefix) => format!("{prefix}.{}", normalize_key(&key)),
            None => normalize_key(&key),
        };
        match value {
            Value::Object(nested) if !nested.is_empty() => {
                flatten_into(out, Some(&key), nested);
            }
            other => {
                out.insert(key, other);
            }
        }
    }
}

fn normalize_layer(layer: BTreeMap<String, Value>) -> BTreeMap<String, Value> {
    layer
        .into_iter()
        .map(|(key, value)| (normalize_key(&key), value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Layer;
    use std::error::Error;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, Box<dyn Error>> {
        let path = dir.join(name);
        fs::write(&path, contents)?;
        Ok(path)
    }

    fn sources_in(dir: &TempDir, environment: Environment) -> ConfigSources {
        ConfigSources::new(environment).with_search_paths([dir.path().display().to_string()])
    }

    #[test]
    fn nested_yaml_is_flattened_into_dot_paths() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        write(
            dir.path(),
            "cozy.yaml",
            "host: cozy.example\nadmin:\n  Host: admin.example\n  port: 7000\nlog:\n  level: debug\n",
        )?;

        let store = resolve(sources_in(&dir, Environment::default()))?;
        assert_eq!(store.get_string("admin.host")?, "admin.example");
        assert_eq!(store.get_u16("admin.port")?, 7000);
        assert_eq!(store.get_string("log.level")?, "debug");
        assert_eq!(store.source_of("host"), Some(Layer::File));
        Ok(())
    }

    #[test]
    fn yaml_extension_wins_over_json_in_same_directory() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        let yaml = write(dir.path(), "cozy.yaml", "host: from-yaml\n")?;
        write(dir.path(), "cozy.json", "{\"host\": \"from-json\"}")?;

        let store = resolve(sources_in(&dir, Environment::default()))?;
        assert_eq!(store.config_file_used(), Some(yaml.as_path()));
        assert_eq!(store.get_string("host")?, "from-yaml");
        Ok(())
    }

    #[test]
    fn json_documents_are_accepted() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        write(dir.path(), "cozy.json", "{\n\t\"admin\": {\"port\": 6161}\n}")?;

        let store = resolve(sources_in(&dir, Environment::default()))?;
        assert_eq!(store.get_u16("admin.port")?, 6161);
        Ok(())
    }

    #[test]
    fn search_stops_at_first_directory_with_a_file() -> Result<(), Box<dyn Error>> {
        let first = TempDir::new()?;
        let second = TempDir::new()?;
        write(second.path(), "cozy.yaml", "host: second\n")?;
        let expected = write(first.path(), "cozy.yml", "host: first\n")?;

        let sources = ConfigSources::new(Environment::default()).with_search_paths([
            first.path().display().to_string(),
            second.path().display().to_string(),
        ]);
        let store = resolve(sources)?;
        assert_eq!(store.config_file_used(), Some(expected.as_path()));
        assert_eq!(store.get_string("host")?, "first");
        Ok(())
    }

    #[test]
    fn home_search_path_expands_from_environment() -> Result<(), Box<dyn Error>> {
        let home = TempDir::new()?;
        fs::create_dir(home.path().join(".cozy"))?;
        write(&home.path().join(".cozy"), "cozy.yaml", "port: 9090\n")?;

        let environment = Environment::from_pairs([("HOME", home.path().display().to_string())]);
        let sources = ConfigSources::new(environment).with_search_paths(["$HOME/.cozy"]);
        let store = resolve(sources)?;
        assert_eq!(store.get_u16("port")?, 9090);
        Ok(())
    }

    #[test]
    fn home_search_path_falls_back_to_account_home() {
        assert_eq!(
            expand_search_path("~/.cozy", &Environment::default()),
            dirs::home_dir().map(|home| home.join(".cozy"))
        );
        assert_eq!(
            expand_search_path("/etc/cozy", &Environment::default()),
            Some(PathBuf::from("/etc/cozy"))
        );
    }

    #[test]
    fn empty_file_resolves_to_defaults() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        write(dir.path(), "cozy.yaml", "")?;

        let store = resolve(sources_in(&dir, Environment::default()))?;
        assert_eq!(store.source_of("host"), Some(Layer::Default));
        Ok(())
    }

    #[test]
    fn scalar_document_is_a_parse_error() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        let path = write(dir.path(), "cozy.yaml", "just a string\n")?;

        let err = resolve(sources_in(&dir, Environment::default()))
            .err()
            .ok_or("expected parse failure")?;
        assert!(matches!(
            err,
            ConfigError::Parse { path: failed, source: ParseError::NotAMapping } if failed == path
        ));
        Ok(())
    }

    #[test]
    fn explicit_flag_overrides_environment() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        let environment = Environment::from_pairs([("COZY_PORT", "9000")]);
        let sources = sources_in(&dir, environment).with_override("port", 9500);

        let store = resolve(sources)?;
        assert_eq!(store.get_u16("port")?, 9500);
        assert_eq!(store.source_of("port"), Some(Layer::Flag));
        Ok(())
    }

    #[test]
    fn unrelated_environment_is_not_captured() -> Result<(), Box<dyn Error>> {
        let dir = TempDir::new()?;
        let environment = Environment::from_pairs([("PORT", "1234"), ("COZYPORT", "4321")]);

        let store = resolve(sources_in(&dir, environment))?;
        assert_eq!(store.get_u16("port")?, 8080);
        Ok(())
    }
}
