//! Value coercion helpers shared by the store and typed settings.

use serde_json::Value;

use crate::error::{ConfigError, ConfigResult};

pub(crate) fn coerce_string(key: &str, value: &Value) -> ConfigResult<String> {
    match value {
        Value::String(text) => Ok(text.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Ok(String::new()),
        Value::Array(_) | Value::Object(_) => Err(invalid(key, value, "must be a scalar")),
    }
}

pub(crate) fn coerce_u16(key: &str, value: &Value) -> ConfigResult<u16> {
    let parsed = match value {
        Value::Number(number) => number.as_u64().and_then(|raw| u16::try_from(raw).ok()),
        Value::String(text) => text.trim().parse::<u16>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid(key, value, "must be an integer between 0 and 65535"))
}

pub(crate) fn validate_port(key: &str, port: u16) -> ConfigResult<u16> {
    if port == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: port.to_string(),
            reason: "must be between 1 and 65535",
        });
    }
    Ok(port)
}

fn invalid(key: &str, value: &Value, reason: &'static str) -> ConfigError {
    let value = match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    };
    ConfigError::InvalidValue {
        key: key.to_string(),
        value,
        reason,
    }
}
