//! Schema validation helpers for synthschema JSON5 configuration.

use crate::ConfigError;
use serde_json::{Map, Value};

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    let allowed = [
        "$schema",
        "cache",
        "author",
        "rate_limit",
        "limits",
        "generation",
    ];
    ensure_allowed_keys(map, &allowed, layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("cache") {
        validate_cache(value, layer, "cache")?;
    }
    if let Some(value) = map.get("author") {
        validate_author(value, layer, "author")?;
    }
    if let Some(value) = map.get("rate_limit") {
        validate_rate_limit(value, layer, "rate_limit")?;
    }
    if let Some(value) = map.get("limits") {
        validate_limits(value, layer, "limits")?;
    }
    if let Some(value) = map.get("generation") {
        let map = expect_object(value, layer, "generation")?;
        ensure_allowed_keys(map, &["seed"], layer, "generation")?;
        if let Some(value) = map.get("seed") {
            expect_optional_u64(value, layer, "generation.seed")?;
        }
    }

    Ok(())
}

/// Validate the "cache" block.
fn validate_cache(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(map, &["enabled", "path", "max_entries"], layer, path)?;

    if let Some(value) = map.get("enabled") {
        expect_bool(value, layer, &join_path(path, "enabled"))?;
    }
    if let Some(value) = map.get("path") {
        expect_string(value, layer, &join_path(path, "path"))?;
    }
    if let Some(value) = map.get("max_entries") {
        expect_optional_u64(value, layer, &join_path(path, "max_entries"))?;
    }
    Ok(())
}

/// Validate the "author" block.
fn validate_author(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    let allowed = [
        "provider",
        "model",
        "api_key_env",
        "request_timeout_secs",
        "max_attempts",
        "base_delay_ms",
        "single_flight",
    ];
    ensure_allowed_keys(map, &allowed, layer, path)?;

    if let Some(value) = map.get("provider") {
        validate_provider(value, layer, &join_path(path, "provider"))?;
    }
    if let Some(value) = map.get("model") {
        expect_string(value, layer, &join_path(path, "model"))?;
    }
    if let Some(value) = map.get("api_key_env") {
        expect_string(value, layer, &join_path(path, "api_key_env"))?;
    }
    for key in ["request_timeout_secs", "max_attempts", "base_delay_ms"] {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("single_flight") {
        expect_bool(value, layer, &join_path(path, "single_flight"))?;
    }
    Ok(())
}

/// Validate author provider values.
fn validate_provider(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Some(provider) = value.as_str() else {
        return Err(invalid_field(layer, path, "expected string"));
    };
    if matches!(provider, "openai" | "anthropic" | "demo") {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "unknown provider"))
    }
}

/// Validate the "rate_limit" block; `null` disables a window.
fn validate_rate_limit(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &["requests_per_minute", "requests_per_day"],
        layer,
        path,
    )?;
    for (key, value) in map {
        expect_optional_u64(value, layer, &join_path(path, key))?;
    }
    Ok(())
}

/// Validate the "limits" block.
fn validate_limits(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &[
            "min_description_chars",
            "max_description_chars",
            "min_rows",
            "max_rows",
        ],
        layer,
        path,
    )?;
    for (key, value) in map {
        expect_u64(value, layer, &join_path(path, key))?;
    }
    Ok(())
}

/// Expect a JSON object or return a typed error.
fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

/// Expect a JSON string or return a typed error.
fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.as_str().is_some() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Expect a JSON boolean or return a typed error.
fn expect_bool(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if matches!(value, Value::Bool(_)) {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected bool"))
    }
}

/// Expect a non-negative JSON integer or return a typed error.
fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

/// Like `expect_u64`, but accepts `null`.
fn expect_optional_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_null() {
        Ok(())
    } else {
        expect_u64(value, layer, path)
    }
}

/// Ensure an object contains only allowed keys.
fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(layer, &join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

/// Join nested paths for better error messages.
fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Build a structured invalid-field error.
fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let normalized_path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{normalized_path}"),
        message: message.to_string(),
    }
}
