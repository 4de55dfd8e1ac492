//! External schema authoring backends.

mod llm;
mod template;

pub use llm::LlmSchemaAuthor;
pub use template::TemplateAuthor;

use crate::schema::SchemaOrigin;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failures of a single authoring call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthorError {
    /// The call did not complete within its timeout.
    #[error("authoring call timed out after {0:?}")]
    Timeout(Duration),
    /// The provider asked us to slow down.
    #[error("authoring provider rate limited the request: {0}")]
    RateLimited(String),
    /// The provider failed in a way that may succeed on retry.
    #[error("authoring provider unavailable: {0}")]
    Unavailable(String),
    /// The provider refused the request; retrying will not help.
    #[error("authoring provider rejected the request: {0}")]
    Rejected(String),
}

impl AuthorError {
    pub fn is_transient(&self) -> bool {
        !matches!(self, AuthorError::Rejected(_))
    }
}

/// Produces raw schema text for a prompt.
#[async_trait]
pub trait SchemaAuthor: Send + Sync {
    /// Send `prompt` and return the raw response text.
    async fn request(&self, prompt: &str, timeout: Duration) -> Result<String, AuthorError>;

    /// Short backend label for logs.
    fn name(&self) -> &str;

    /// Origin recorded on schemas produced by this author.
    fn origin(&self) -> SchemaOrigin {
        SchemaOrigin::Authored
    }
}
