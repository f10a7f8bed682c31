//! Compiled defaults, key names, and discovery conventions.
//!
//! # Design
//! - Centralize key names so flags, files, and environment agree on spelling.
//! - Compiled defaults form the lowest configuration layer.

use std::collections::BTreeMap;

use serde_json::Value;

/// Prefix applied to every configuration environment variable.
pub const ENV_PREFIX: &str = "cozy";
/// Base name of the discovered configuration file (without extension).
pub const CONFIG_FILE_NAME: &str = "cozy";
/// Extensions probed, in order, for each search directory.
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];
/// Directories searched when no explicit configuration file is given.
pub const CONFIG_SEARCH_PATHS: &[&str] = &[".", "$HOME/.cozy", "/etc/cozy"];
/// Environment variable carrying the administrative password.
pub const ADMIN_PASSWORD_ENV: &str = "COZY_ADMIN_PASSWORD";

/// Main API host key.
pub const KEY_HOST: &str = "host";
/// Main API port key.
pub const KEY_PORT: &str = "port";
/// Administrative API host key.
pub const KEY_ADMIN_HOST: &str = "admin.host";
/// Administrative API port key.
pub const KEY_ADMIN_PORT: &str = "admin.port";
/// Log verbosity key.
pub const KEY_LOG_LEVEL: &str = "log.level";
/// Deployment mode key.
pub const KEY_MODE: &str = "mode";

/// Default main API host.
pub const DEFAULT_HOST: &str = "localhost";
/// Default main API port.
pub const DEFAULT_PORT: u16 = 8080;
/// Default administrative API host.
pub const DEFAULT_ADMIN_HOST: &str = "localhost";
/// Default administrative API port.
pub const DEFAULT_ADMIN_PORT: u16 = 6060;
/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";
/// Default deployment mode.
pub const DEFAULT_MODE: &str = "production";

/// Build the compiled default layer.
#[must_use]
pub fn compiled_defaults() -> BTreeMap<String, Value> {
    BTreeMap::from([
        (KEY_HOST.to_string(), Value::from(DEFAULT_HOST)),
        (KEY_PORT.to_string(), Value::from(DEFAULT_PORT)),
        (KEY_ADMIN_HOST.to_string(), Value::from(DEFAULT_ADMIN_HOST)),
        (KEY_ADMIN_PORT.to_string(), Value::from(DEFAULT_ADMIN_PORT)),
        (KEY_LOG_LEVEL.to_string(), Value::from(DEFAULT_LOG_LEVEL)),
        (KEY_MODE.to_string(), Value::from(DEFAULT_MODE)),
    ])
}

/// Search directories as owned strings, ready for a `ConfigSources`.
#[must_use]
pub fn config_search_paths() -> Vec<String> {
    CONFIG_SEARCH_PATHS.iter().map(ToString::to_string).collect()
}
