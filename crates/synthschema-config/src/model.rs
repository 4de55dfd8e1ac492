//! Configuration schema for synthschema.

use serde::{Deserialize, Serialize};

/// Root config for the synthschema SDK and CLI.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SynthConfig {
    #[serde(default, rename = "$schema")]
    pub schema: Option<String>,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub author: AuthorConfig,
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    #[serde(default)]
    pub limits: RequestLimits,
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl SynthConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder() -> SynthConfigBuilder {
        SynthConfigBuilder::new()
    }
}

/// Builder for assembling a `SynthConfig` in code.
#[derive(Debug, Default, Clone)]
pub struct SynthConfigBuilder {
    config: SynthConfig,
}

impl SynthConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new() -> Self {
        Self {
            config: SynthConfig::default(),
        }
    }

    /// Replace the schema cache configuration.
    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.config.cache = cache;
        self
    }

    /// Replace the schema author configuration.
    pub fn author(mut self, author: AuthorConfig) -> Self {
        self.config.author = author;
        self
    }

    /// Replace the external call budget.
    pub fn rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.config.rate_limit = rate_limit;
        self
    }

    /// Replace the request policy limits.
    pub fn limits(mut self, limits: RequestLimits) -> Self {
        self.config.limits = limits;
        self
    }

    /// Replace the record generation settings.
    pub fn generation(mut self, generation: GenerationConfig) -> Self {
        self.config.generation = generation;
        self
    }

    /// Finalize and return the built `SynthConfig`.
    pub fn build(self) -> SynthConfig {
        self.config
    }
}

/// Persistent schema cache settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_enabled")]
    pub enabled: bool,
    #[serde(default = "default_cache_path")]
    pub path: String,
    /// Evict least recently used entries beyond this count; unbounded when unset.
    #[serde(default)]
    pub max_entries: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_cache_enabled(),
            path: default_cache_path(),
            max_entries: None,
        }
    }
}

fn default_cache_enabled() -> bool {
    true
}

/// Default cache file location, relative to the working directory.
fn default_cache_path() -> String {
    "data/schemas.json".to_string()
}

/// Backend used to author schemas from descriptions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AuthorProvider {
    #[default]
    OpenAi,
    Anthropic,
    /// Keyword templates, no network access.
    Demo,
}

impl AuthorProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthorProvider::OpenAi => "openai",
            AuthorProvider::Anthropic => "anthropic",
            AuthorProvider::Demo => "demo",
        }
    }
}

/// Schema authoring call settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorConfig {
    #[serde(default)]
    pub provider: AuthorProvider,
    #[serde(default = "default_model")]
    pub model: String,
    /// Name of the environment variable holding the provider API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,
    /// Share one in-flight authoring call between concurrent misses on a key.
    #[serde(default = "default_single_flight")]
    pub single_flight: bool,
}

impl Default for AuthorConfig {
    fn default() -> Self {
        Self {
            provider: AuthorProvider::default(),
            model: default_model(),
            api_key_env: None,
            request_timeout_secs: default_request_timeout_secs(),
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            single_flight: default_single_flight(),
        }
    }
}

impl AuthorConfig {
    /// Environment variable consulted for the API key.
    pub fn api_key_var(&self) -> &str {
        if let Some(name) = self.api_key_env.as_deref() {
            return name;
        }
        match self.provider {
            AuthorProvider::Anthropic => "ANTHROPIC_API_KEY",
            AuthorProvider::OpenAi | AuthorProvider::Demo => "OPENAI_API_KEY",
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_base_delay_ms() -> u64 {
    1000
}

fn default_single_flight() -> bool {
    true
}

/// Local budget for external authoring calls. `None` disables a window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_minute")]
    pub requests_per_minute: Option<u32>,
    #[serde(default = "default_requests_per_day")]
    pub requests_per_day: Option<u32>,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: default_requests_per_minute(),
            requests_per_day: default_requests_per_day(),
        }
    }
}

impl RateLimitConfig {
    /// Budget with no limits at all.
    pub fn unlimited() -> Self {
        Self {
            requests_per_minute: None,
            requests_per_day: None,
        }
    }
}

fn default_requests_per_minute() -> Option<u32> {
    Some(3)
}

fn default_requests_per_day() -> Option<u32> {
    Some(200)
}

/// Request policy enforced by the SDK before acquisition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestLimits {
    #[serde(default = "default_min_description_chars")]
    pub min_description_chars: usize,
    #[serde(default = "default_max_description_chars")]
    pub max_description_chars: usize,
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            min_description_chars: default_min_description_chars(),
            max_description_chars: default_max_description_chars(),
            min_rows: default_min_rows(),
            max_rows: default_max_rows(),
        }
    }
}

fn default_min_description_chars() -> usize {
    10
}

fn default_max_description_chars() -> usize {
    4000
}

fn default_min_rows() -> usize {
    1
}

fn default_max_rows() -> usize {
    10_000
}

/// Record generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GenerationConfig {
    /// Fixed RNG seed for reproducible output; entropy-seeded when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}
