//! `SYNTHSCHEMA_*` environment overrides.

use super::{ENV_PREFIX, merge};
use crate::ConfigError;
use log::debug;
use serde_json::{Map, Value};

#[derive(Clone, Copy)]
enum EnvKind {
    Bool,
    Integer,
    Text,
}

/// Recognized variable suffixes and the config field each one sets.
const ENV_FIELDS: &[(&str, &str, EnvKind)] = &[
    ("CACHE_ENABLED", "cache.enabled", EnvKind::Bool),
    ("CACHE_PATH", "cache.path", EnvKind::Text),
    ("CACHE_MAX_ENTRIES", "cache.max_entries", EnvKind::Integer),
    ("PROVIDER", "author.provider", EnvKind::Text),
    ("MODEL", "author.model", EnvKind::Text),
    ("API_KEY_ENV", "author.api_key_env", EnvKind::Text),
    (
        "REQUEST_TIMEOUT_SECS",
        "author.request_timeout_secs",
        EnvKind::Integer,
    ),
    ("MAX_ATTEMPTS", "author.max_attempts", EnvKind::Integer),
    (
        "REQUESTS_PER_MINUTE",
        "rate_limit.requests_per_minute",
        EnvKind::Integer,
    ),
    (
        "REQUESTS_PER_DAY",
        "rate_limit.requests_per_day",
        EnvKind::Integer,
    ),
    ("MAX_ROWS", "limits.max_rows", EnvKind::Integer),
    ("SEED", "generation.seed", EnvKind::Integer),
];

/// Build an override layer from environment variables, if any apply.
///
/// `SYNTHSCHEMA_DEMO_MODE=true` forces the demo provider and wins over
/// `SYNTHSCHEMA_PROVIDER`.
pub(super) fn overrides_from_env(vars: &[(String, String)]) -> Result<Option<Value>, ConfigError> {
    let mut root = Map::new();
    let mut demo_mode = false;

    for (name, raw) in vars {
        let Some(suffix) = name.strip_prefix(ENV_PREFIX) else {
            continue;
        };
        if suffix == "DEMO_MODE" {
            demo_mode = parse_bool(name, raw)?;
            continue;
        }
        let Some((_, path, kind)) = ENV_FIELDS.iter().find(|(key, _, _)| *key == suffix) else {
            debug!("ignoring unrecognized environment override (name={name})");
            continue;
        };
        let value = match kind {
            EnvKind::Bool => Value::Bool(parse_bool(name, raw)?),
            EnvKind::Integer => {
                let parsed = raw.trim().parse::<u64>().map_err(|err| ConfigError::InvalidEnv {
                    name: name.clone(),
                    message: err.to_string(),
                })?;
                Value::from(parsed)
            }
            EnvKind::Text => Value::String(raw.clone()),
        };
        merge::insert_dotted(&mut root, path, value);
    }

    if demo_mode {
        merge::insert_dotted(&mut root, "author.provider", Value::String("demo".into()));
    }

    if root.is_empty() {
        Ok(None)
    } else {
        Ok(Some(Value::Object(root)))
    }
}

fn parse_bool(name: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::InvalidEnv {
            name: name.to_string(),
            message: format!("expected a boolean, got {other:?}"),
        }),
    }
}
