//! Typed view over a resolved [`ConfigStore`].
//!
//! # Design
//! - Pure data carriers handed to command handlers by reference.
//! - Built once from the store; nothing mutates them afterwards.

use std::fmt::{self, Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::defaults::{
    KEY_ADMIN_HOST, KEY_ADMIN_PORT, KEY_HOST, KEY_LOG_LEVEL, KEY_MODE, KEY_PORT,
};
use crate::error::{ConfigError, ConfigResult};
use crate::store::ConfigStore;
use crate::validate::validate_port;

/// Deployment mode of the stack the CLI talks to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeployMode {
    /// Administrative endpoints require a password.
    #[default]
    Production,
    /// Administrative endpoints are unauthenticated.
    Development,
}

impl DeployMode {
    #[must_use]
    /// Render the mode as its lowercase string representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }

    /// Whether administrative authentication is disabled.
    #[must_use]
    pub const fn is_development(self) -> bool {
        matches!(self, Self::Development)
    }
}

impl FromStr for DeployMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            _ => Err(ConfigError::InvalidValue {
                key: KEY_MODE.to_string(),
                value: s.to_string(),
                reason: "must be 'production' or 'development'",
            }),
        }
    }
}

impl Display for DeployMode {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Administrative API location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminSettings {
    /// Administrative API host.
    pub host: String,
    /// Administrative API port.
    pub port: u16,
}

/// Logging preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogSettings {
    /// Tracing filter directive, e.g. `info` or `debug`.
    pub level: String,
}

/// Settings consumed by every command of the CLI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Main API host.
    pub host: String,
    /// Main API port.
    pub port: u16,
    /// Administrative API location.
    pub admin: AdminSettings,
    /// Logging preferences.
    pub log: LogSettings,
    /// Deployment mode.
    pub mode: DeployMode,
    /// Configuration file that was read, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_file: Option<PathBuf>,
}

impl Settings {
    /// Extract typed settings from a resolved store.
    ///
    /// # Errors
    ///
    /// Returns an error if a key is missing, a port is not in `1..=65535`, or
    /// the mode is unknown.
    pub fn from_store(store: &ConfigStore) -> ConfigResult<Self> {
        Ok(Self {
            host: store.get_string(KEY_HOST)?,
            port: validate_port(KEY_PORT, store.get_u16(KEY_PORT)?)?,
            admin: AdminSettings {
                host: store.get_string(KEY_ADMIN_HOST)?,
                port: validate_port(KEY_ADMIN_PORT, store.get_u16(KEY_ADMIN_PORT)?)?,
            },
            log: LogSettings {
                level: store.get_string(KEY_LOG_LEVEL)?,
            },
            mode: store.get_string(KEY_MODE)?.parse()?,
            config_file: store.config_file_used().map(PathBuf::from),
        })
    }

    /// Address of the main API, as `host:port`.
    #[must_use]
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Address of the administrative API, as `host:port`.
    #[must_use]
    pub fn admin_server_addr(&self) -> String {
        format!("{}:{}", self.admin.host, self.admin.port)
    }
}
