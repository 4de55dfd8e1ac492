//! Error types for schema acquisition and persistence.

use crate::author::AuthorError;
use crate::schema::SchemaError;
use std::fmt;
use thiserror::Error;

/// Errors raised while storing or reloading the schema cache.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem access failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// The cache document could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// The cross-process file lock could not be taken.
    #[error("failed to lock cache file: {0}")]
    Lock(std::io::Error),
}

/// Why an authoring response could not be turned into a schema.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    /// No JSON object could be located in the response.
    #[error("response does not contain a JSON object")]
    NotJson,
    /// JSON was found but is not valid.
    #[error("response JSON is invalid: {0}")]
    InvalidJson(String),
    /// The top-level JSON value is not an object.
    #[error("response JSON is not an object")]
    NotAnObject,
    /// The object declares no usable fields.
    #[error("response declares no fields")]
    NoFields,
    /// A specific field entry could not be interpreted.
    #[error("field {name:?} is invalid: {reason}")]
    InvalidField { name: String, reason: String },
    /// The resulting schema failed structural validation.
    #[error("schema is unusable: {0}")]
    Schema(#[from] SchemaError),
}

/// Stage of acquisition at which a hard failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquirePhase {
    /// Reading the cache.
    Lookup,
    /// Calling the external author.
    Authoring,
    /// Turning a response into a schema.
    Parsing,
    /// Writing the schema to the cache.
    Persisting,
}

impl fmt::Display for AcquirePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AcquirePhase::Lookup => "lookup",
            AcquirePhase::Authoring => "authoring",
            AcquirePhase::Parsing => "parsing",
            AcquirePhase::Persisting => "persisting",
        };
        f.write_str(label)
    }
}

/// Hard failures of `SchemaAcquirer::acquire`.
///
/// Transient external failures never surface here; they degrade to the
/// fallback schema.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// The author rejected the request permanently (e.g. bad credentials).
    #[error("schema authoring failed during {phase}: {source}")]
    Authoring {
        phase: AcquirePhase,
        #[source]
        source: AuthorError,
    },
    /// The local call budget is exhausted; retry later.
    #[error("schema authoring throttled: {reason}")]
    Throttled { reason: String },
    /// Even the fallback schema was unusable.
    #[error("no usable schema could be produced: {0}")]
    EmptySchema(SchemaError),
}

impl AcquireError {
    pub fn phase(&self) -> AcquirePhase {
        match self {
            AcquireError::Authoring { phase, .. } => *phase,
            AcquireError::Throttled { .. } => AcquirePhase::Authoring,
            AcquireError::EmptySchema(_) => AcquirePhase::Parsing,
        }
    }

    /// True when the caller may succeed by asking again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AcquireError::Throttled { .. })
    }
}
