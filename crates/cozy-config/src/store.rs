//! Read-only, layered key/value store produced by [`crate::resolve`].
//!
//! # Design
//! - Each layer is kept intact; lookups walk them in precedence order.
//! - Keys are dot paths, compared case-insensitively.
//! - Environment lookups transliterate the key on demand, so any key can be
//!   overridden from the environment without being declared first.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};
use crate::validate::{coerce_string, coerce_u16};

/// Configuration layer a value was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Layer {
    /// Flag explicitly passed on the command line.
    Flag,
    /// Prefixed environment variable.
    Env,
    /// Configuration file.
    File,
    /// Flag-bound or compiled default.
    Default,
}

impl Layer {
    #[must_use]
    /// Render the layer as its lowercase string representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Flag => "flag",
            Self::Env => "env",
            Self::File => "file",
            Self::Default => "default",
        }
    }
}

/// Map a dot-path key to its environment variable name.
///
/// `env_key("cozy", "admin.host")` yields `COZY_ADMIN_HOST`.
#[must_use]
pub fn env_key(prefix: &str, key: &str) -> String {
    let flat = key.replace('.', "_").to_ascii_uppercase();
    if prefix.is_empty() {
        flat
    } else {
        format!("{}_{flat}", prefix.to_ascii_uppercase())
    }
}

pub(crate) fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

/// Merged configuration for one invocation.
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    pub(crate) env_prefix: String,
    pub(crate) overrides: BTreeMap<String, Value>,
    pub(crate) env: BTreeMap<String, String>,
    pub(crate) file: BTreeMap<String, Value>,
    pub(crate) defaults: BTreeMap<String, Value>,
    pub(crate) config_file: Option<PathBuf>,
}

impl ConfigStore {
    /// Look up a key, returning the value from the highest-precedence layer.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lookup(key).map(|(_, value)| value)
    }

    /// Report which layer supplies the value for `key`.
    #[must_use]
    pub fn source_of(&self, key: &str) -> Option<Layer> {
        self.lookup(key).map(|(layer, _)| layer)
    }

    /// Whether any layer supplies `key`.
    #[must_use]
    pub fn is_set(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Resolve `key` as a string. Numbers and booleans are rendered as text.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or holds a sequence or mapping.
    pub fn get_string(&self, key: &str) -> ConfigResult<String> {
        let value = self.require(key)?;
        coerce_string(key, &value)
    }

    /// Resolve `key` as a `u16`, parsing string values from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is missing or is not an integer in range.
    pub fn get_u16(&self, key: &str) -> ConfigResult<u16> {
        let value = self.require(key)?;
        coerce_u16(key, &value)
    }

    /// Every key known from flags, the file, or the defaults.
    #[must_use]
    pub fn keys(&self) -> BTreeSet<String> {
        self.overrides
            .keys()
            .chain(self.file.keys())
            .chain(self.defaults.keys())
            .cloned()
            .collect()
    }

    /// Path of the configuration file that was read, if any.
    #[must_use]
    pub fn config_file_used(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Environment prefix used for lookups.
    #[must_use]
    pub fn env_prefix(&self) -> &str {
        &self.env_prefix
    }

    fn require(&self, key: &str) -> ConfigResult<Value> {
        self.get(key).ok_or_else(|| ConfigError::MissingKey {
            key: key.to_string(),
        })
    }

    fn lookup(&self, key: &str) -> Option<(Layer, Value)> {
        let key = normalize_key(key);
        if let Some(value) = self.overrides.get(&key) {
            return Some((Layer::Flag, value.clone()));
        }
        if let Some(value) = self.env.get(&env_key(&self.env_prefix, &key)) {
            return Some((Layer::Env, Value::String(value.clone())));
        }
        if let Some(value) = self.file.get(&key) {
            return Some((Layer::File, value.clone()));
        }
        self.defaults
            .get(&key)
            .map(|value| (Layer::Default, value.clone()))
    }
}
