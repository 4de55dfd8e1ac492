//! Schema model shared by the store, the acquirer and the expander.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Hex-encoded SHA-256 digest of a normalized description.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CacheKey(String);

/// A string that is not a 64-character hex digest.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid cache key {0:?}: expected 64 hex characters")]
pub struct InvalidCacheKey(pub String);

impl CacheKey {
    /// Parse a key, accepting upper or lower case hex and storing it lowercase.
    pub fn parse(raw: &str) -> Result<Self, InvalidCacheKey> {
        let trimmed = raw.trim();
        if trimmed.len() == 64 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            Ok(Self(trimmed.to_ascii_lowercase()))
        } else {
            Err(InvalidCacheKey(raw.to_string()))
        }
    }

    /// Wrap a digest already known to be lowercase hex.
    pub(crate) fn from_digest(hex: String) -> Self {
        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short prefix used in log lines.
    pub fn short(&self) -> &str {
        &self.0[..12]
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CacheKey {
    type Err = InvalidCacheKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CacheKey {
    type Error = InvalidCacheKey;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CacheKey> for String {
    fn from(key: CacheKey) -> Self {
        key.0
    }
}

/// Instructions for producing one column's values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum FieldSpec {
    /// A named generator from the built-in catalog.
    NativeMethod {
        method: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// A named generator with parameters such as bounds or precision.
    ParameterizedMethod {
        method: String,
        #[serde(default)]
        params: Map<String, Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
    /// A uniform pick from a fixed list of literal values.
    EnumeratedChoice {
        choices: Vec<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
    },
}

impl FieldSpec {
    pub fn native(method: impl Into<String>) -> Self {
        Self::NativeMethod {
            method: method.into(),
            description: None,
        }
    }

    pub fn parameterized(method: impl Into<String>, params: Map<String, Value>) -> Self {
        Self::ParameterizedMethod {
            method: method.into(),
            params,
            description: None,
        }
    }

    pub fn choice<I, V>(choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::EnumeratedChoice {
            choices: choices.into_iter().map(Into::into).collect(),
            description: None,
        }
    }

    /// Attach advisory text describing the field.
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            Self::NativeMethod { description, .. }
            | Self::ParameterizedMethod { description, .. }
            | Self::EnumeratedChoice { description, .. } => *description = text,
        }
        self
    }

    /// Generator name for method-backed specs.
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::NativeMethod { method, .. } | Self::ParameterizedMethod { method, .. } => {
                Some(method)
            }
            Self::EnumeratedChoice { .. } => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            Self::NativeMethod { description, .. }
            | Self::ParameterizedMethod { description, .. }
            | Self::EnumeratedChoice { description, .. } => description.as_deref(),
        }
    }
}

/// How a schema came into existence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SchemaOrigin {
    /// Produced by the external authoring service.
    #[default]
    Authored,
    /// Built-in generic schema used when authoring failed.
    Fallback,
    /// Keyword template served in demo mode.
    Template,
}

/// A structural problem in a schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The schema declares no fields.
    #[error("schema has no fields")]
    NoFields,
    /// A field name is empty or whitespace.
    #[error("schema contains an empty field name")]
    EmptyFieldName,
    /// A method-backed field has an empty method name.
    #[error("field {0:?} has an empty method name")]
    EmptyMethod(String),
    /// An enumerated field has no choices.
    #[error("field {0:?} has no choices")]
    EmptyChoices(String),
}

/// Ordered mapping of field names to generation instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub key: CacheKey,
    #[serde(default = "default_domain")]
    pub domain: String,
    pub fields: IndexMap<String, FieldSpec>,
    #[serde(default)]
    pub origin: SchemaOrigin,
}

fn default_domain() -> String {
    "general".to_string()
}

impl Schema {
    pub fn new(
        key: CacheKey,
        domain: impl Into<String>,
        fields: IndexMap<String, FieldSpec>,
        origin: SchemaOrigin,
    ) -> Self {
        Self {
            key,
            domain: domain.into(),
            fields,
            origin,
        }
    }

    /// Field names in declared order.
    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    /// Check that the schema can drive record generation.
    pub fn validate(&self) -> Result<(), SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::NoFields);
        }
        for (name, spec) in &self.fields {
            if name.trim().is_empty() {
                return Err(SchemaError::EmptyFieldName);
            }
            match spec {
                FieldSpec::NativeMethod { method, .. }
                | FieldSpec::ParameterizedMethod { method, .. } => {
                    if method.trim().is_empty() {
                        return Err(SchemaError::EmptyMethod(name.clone()));
                    }
                }
                FieldSpec::EnumeratedChoice { choices, .. } => {
                    if choices.is_empty() {
                        return Err(SchemaError::EmptyChoices(name.clone()));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Persisted schema plus usage bookkeeping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub schema: Schema,
    pub created_at: DateTime<Utc>,
    pub last_used_at: DateTime<Utc>,
    #[serde(default)]
    pub use_count: u64,
}

impl CacheEntry {
    pub fn new(schema: Schema) -> Self {
        let now = Utc::now();
        Self {
            schema,
            created_at: now,
            last_used_at: now,
            use_count: 0,
        }
    }

    /// Record a cache hit.
    pub(crate) fn touch(&mut self) {
        self.use_count = self.use_count.saturating_add(1);
        self.last_used_at = Utc::now();
    }
}

/// One generated row, keyed in schema field order.
pub type Record = IndexMap<String, Value>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn key() -> CacheKey {
        CacheKey::parse(&"ab".repeat(32)).expect("key")
    }

    #[test]
    fn cache_key_parse_normalizes_case() {
        let key = CacheKey::parse(&"AB".repeat(32)).expect("key");
        assert_eq!(key.as_str(), "ab".repeat(32));
        assert_eq!(key.short().len(), 12);
    }

    #[test]
    fn cache_key_rejects_bad_input() {
        assert!(CacheKey::parse("abc").is_err());
        assert!(CacheKey::parse(&"zz".repeat(32)).is_err());
        assert!(serde_json::from_value::<CacheKey>(json!("nope")).is_err());
    }

    #[test]
    fn field_spec_uses_kind_tag() {
        let spec: FieldSpec =
            serde_json::from_value(json!({"kind": "NativeMethod", "method": "productName"}))
                .expect("spec");
        assert_eq!(spec, FieldSpec::native("productName"));

        let spec: FieldSpec = serde_json::from_value(json!({
            "kind": "EnumeratedChoice",
            "choices": ["a", "b"],
            "description": "letters",
            "extra": 1
        }))
        .expect("spec");
        assert_eq!(spec, FieldSpec::choice(["a", "b"]).with_description("letters"));
    }

    #[test]
    fn schema_fields_keep_declared_order() {
        let raw = json!({
            "key": "ab".repeat(32),
            "fields": {
                "zeta": {"kind": "NativeMethod", "method": "word"},
                "alpha": {"kind": "NativeMethod", "method": "word"},
                "mid": {"kind": "NativeMethod", "method": "word"}
            }
        });
        let schema: Schema = serde_json::from_value(raw).expect("schema");
        assert_eq!(schema.field_names(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(schema.domain, "general");
        assert_eq!(schema.origin, SchemaOrigin::Authored);
    }

    #[test]
    fn validate_rejects_unusable_schemas() {
        let empty = Schema::new(key(), "general", IndexMap::new(), SchemaOrigin::Authored);
        assert_eq!(empty.validate(), Err(SchemaError::NoFields));

        let mut fields = IndexMap::new();
        fields.insert("tier".to_string(), FieldSpec::choice(Vec::<Value>::new()));
        let schema = Schema::new(key(), "general", fields, SchemaOrigin::Authored);
        assert_eq!(
            schema.validate(),
            Err(SchemaError::EmptyChoices("tier".to_string()))
        );

        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), FieldSpec::native(" "));
        let schema = Schema::new(key(), "general", fields, SchemaOrigin::Authored);
        assert_eq!(
            schema.validate(),
            Err(SchemaError::EmptyMethod("name".to_string()))
        );
    }

    #[test]
    fn touch_updates_bookkeeping() {
        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), FieldSpec::native("name"));
        let mut entry = CacheEntry::new(Schema::new(key(), "general", fields, SchemaOrigin::Authored));
        let before = entry.last_used_at;
        entry.touch();
        entry.touch();
        assert_eq!(entry.use_count, 2);
        assert!(entry.last_used_at >= before);
        assert_eq!(entry.created_at, before);
    }
}
