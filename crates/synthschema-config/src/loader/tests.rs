//! Tests for layered configuration loading.

use super::*;
use crate::AuthorProvider;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write JSON5 contents to a path, creating parent directories if needed.
fn write_json5(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("dir");
    }
    fs::write(path, contents).expect("write");
}

/// Options rooted at `cwd` with no ambient system, user, or env layers.
fn isolated_options(cwd: &Path) -> LayeredConfigOptions {
    LayeredConfigOptions {
        cwd: cwd.to_path_buf(),
        system_config_path: None,
        user_config_path: None,
        runtime_paths: Vec::new(),
        project_root_markers: vec![".git".to_string()],
        env: Vec::new(),
    }
}

#[test]
fn parse_minimal_config() {
    let config = SynthConfig::load_from_str("{}").expect("config");
    assert_eq!(config.cache.path, "data/schemas.json");
    assert_eq!(config.author.max_attempts, 3);
    assert_eq!(config.rate_limit.requests_per_minute, Some(3));
    assert_eq!(config.rate_limit.requests_per_day, Some(200));
    assert_eq!(config.limits.max_rows, 10_000);
    assert_eq!(config.author.provider, AuthorProvider::OpenAi);
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = SynthConfig::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    assert!(format!("{err}").contains("unknown key"));
}

#[test]
fn rejects_unknown_provider() {
    let err = SynthConfig::load_from_str(r#"{ author: { provider: "gemini" } }"#).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("author.provider"));
    assert!(msg.contains("unknown provider"));
}

#[test]
fn rejects_negative_row_limit() {
    let err = SynthConfig::load_from_str(r#"{ limits: { max_rows: -5 } }"#).unwrap_err();
    assert!(format!("{err}").contains("limits.max_rows"));
}

#[test]
fn rejects_inverted_row_bounds() {
    let err =
        SynthConfig::load_from_str(r#"{ limits: { min_rows: 50, max_rows: 10 } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn rejects_zero_attempts() {
    let err = SynthConfig::load_from_str(r#"{ author: { max_attempts: 0 } }"#).unwrap_err();
    assert!(format!("{err}").contains("max_attempts"));
}

#[test]
fn null_rate_limit_disables_window() {
    let config = SynthConfig::load_from_str(
        r#"{ rate_limit: { requests_per_minute: null, requests_per_day: 10 } }"#,
    )
    .expect("config");
    assert_eq!(config.rate_limit.requests_per_minute, None);
    assert_eq!(config.rate_limit.requests_per_day, Some(10));
}

#[test]
fn layered_config_prefers_cwd_over_project_over_user() {
    let temp = TempDir::new().expect("tmp");
    let root = temp.path();
    let project_root = root.join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    let cwd = project_root.join("subdir");
    fs::create_dir_all(&cwd).expect("cwd");

    let system_config = root.join("system.json5");
    write_json5(
        &system_config,
        r#"{ author: { model: "system-model", max_attempts: 5 } }"#,
    );
    let user_config = root.join("user.json5");
    write_json5(&user_config, r#"{ author: { model: "user-model" } }"#);
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ cache: { path: "project/schemas.json" }, author: { model: "project-model" } }"#,
    );
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ author: { model: "cwd-model" } }"#,
    );

    let mut options = isolated_options(&cwd);
    options.system_config_path = Some(system_config);
    options.user_config_path = Some(user_config);

    let layered = SynthConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.author.model, "cwd-model");
    assert_eq!(layered.config.author.max_attempts, 5);
    assert_eq!(layered.config.cache.path, "project/schemas.json");

    let sources: Vec<_> = layered.layers.iter().map(|layer| layer.source).collect();
    assert_eq!(
        sources,
        vec![
            ConfigLayerSource::System,
            ConfigLayerSource::User,
            ConfigLayerSource::Project,
            ConfigLayerSource::Cwd,
        ]
    );
}

#[test]
fn project_and_cwd_layers_deduplicate() {
    let temp = TempDir::new().expect("tmp");
    let project_root = temp.path().join("project");
    fs::create_dir_all(project_root.join(".git")).expect("git");
    write_json5(
        &project_root.join(DEFAULT_CONFIG_FILE),
        r#"{ generation: { seed: 7 } }"#,
    );

    let layered =
        SynthConfig::load_layered_with_options(isolated_options(&project_root)).expect("layered");
    assert_eq!(layered.layers.len(), 1);
    assert_eq!(layered.config.generation.seed, Some(7));
}

#[test]
fn env_overrides_files_and_runtime_overrides_env() {
    let temp = TempDir::new().expect("tmp");
    let cwd = temp.path();
    write_json5(
        &cwd.join(DEFAULT_CONFIG_FILE),
        r#"{ author: { model: "file-model", request_timeout_secs: 10 } }"#,
    );
    let runtime = cwd.join("runtime.json5");
    write_json5(&runtime, r#"{ author: { request_timeout_secs: 90 } }"#);

    let options = isolated_options(cwd)
        .with_env([
            ("SYNTHSCHEMA_MODEL", "env-model"),
            ("SYNTHSCHEMA_REQUEST_TIMEOUT_SECS", "45"),
            ("SYNTHSCHEMA_CACHE_ENABLED", "false"),
        ])
        .with_runtime_path(&runtime);

    let layered = SynthConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.author.model, "env-model");
    assert_eq!(layered.config.author.request_timeout_secs, 90);
    assert!(!layered.config.cache.enabled);
    assert_eq!(
        layered.layers.last().map(|layer| layer.source),
        Some(ConfigLayerSource::Runtime)
    );
}

#[test]
fn demo_mode_env_forces_demo_provider() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_env([
        ("SYNTHSCHEMA_PROVIDER", "anthropic"),
        ("SYNTHSCHEMA_DEMO_MODE", "yes"),
    ]);
    let layered = SynthConfig::load_layered_with_options(options).expect("layered");
    assert_eq!(layered.config.author.provider, AuthorProvider::Demo);
}

#[test]
fn invalid_env_value_is_reported_by_name() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_env([("SYNTHSCHEMA_MAX_ROWS", "lots")]);
    let err = SynthConfig::load_layered_with_options(options).unwrap_err();
    match err {
        ConfigError::InvalidEnv { name, .. } => assert_eq!(name, "SYNTHSCHEMA_MAX_ROWS"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_runtime_layer_is_an_error() {
    let temp = TempDir::new().expect("tmp");
    let options = isolated_options(temp.path()).with_runtime_path(temp.path().join("absent.json5"));
    let err = SynthConfig::load_layered_with_options(options).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFailed(_)));
}

#[test]
fn invalid_layer_reports_layer_label() {
    let temp = TempDir::new().expect("tmp");
    write_json5(
        &temp.path().join(DEFAULT_CONFIG_FILE),
        r#"{ cache: { enabled: "sometimes" } }"#,
    );
    let err = SynthConfig::load_layered_with_options(isolated_options(temp.path())).unwrap_err();
    let msg = format!("{err}");
    assert!(msg.contains("cwd("));
    assert!(msg.contains("cache.enabled"));
}

#[test]
fn merge_replaces_scalars_and_keeps_siblings() {
    let mut base = serde_json::json!({ "author": { "model": "a", "max_attempts": 2 } });
    merge::merge_json_values(&mut base, &serde_json::json!({ "author": { "model": "b" } }));
    assert_eq!(
        base,
        serde_json::json!({ "author": { "model": "b", "max_attempts": 2 } })
    );
}
