//! Schema authoring through an `autoagents_llm` chat provider.

use super::{AuthorError, SchemaAuthor};
use async_trait::async_trait;
use autoagents_llm::LLMProvider;
use autoagents_llm::chat::{ChatMessage, ChatProvider, ChatResponse, ChatRole, MessageType};
use autoagents_llm::error::LLMError;
use log::debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

const SYSTEM_PROMPT: &str = "You design tabular synthetic data schemas. \
Reply with a single JSON object and no commentary.";

/// `SchemaAuthor` backed by any configured LLM provider.
#[derive(Clone)]
pub struct LlmSchemaAuthor {
    llm: Arc<dyn LLMProvider>,
    label: String,
}

impl LlmSchemaAuthor {
    pub fn new(llm: Arc<dyn LLMProvider>) -> Self {
        Self {
            llm,
            label: "llm".to_string(),
        }
    }

    /// Override the label used in logs (e.g. `openai:gpt-4o-mini`).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}

#[async_trait]
impl SchemaAuthor for LlmSchemaAuthor {
    async fn request(&self, prompt: &str, timeout: Duration) -> Result<String, AuthorError> {
        let messages = vec![
            ChatMessage {
                role: ChatRole::System,
                message_type: MessageType::Text,
                content: SYSTEM_PROMPT.to_string(),
            },
            ChatMessage {
                role: ChatRole::User,
                message_type: MessageType::Text,
                content: prompt.to_string(),
            },
        ];
        let started = Instant::now();
        let response = tokio::time::timeout(timeout, self.llm.chat_with_tools(&messages, None, None))
            .await
            .map_err(|_| AuthorError::Timeout(timeout))?
            .map_err(|err| classify_llm_error(err, timeout))?;
        debug!(
            "llm authoring call finished (author={}, elapsed_ms={})",
            self.label,
            started.elapsed().as_millis()
        );
        response
            .text()
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| AuthorError::Unavailable("provider returned no text".to_string()))
    }

    fn name(&self) -> &str {
        &self.label
    }
}

/// Map a provider error onto the transient/permanent split.
///
/// Providers surface status codes only through messages, so this matches
/// on well-known fragments. Unrecognized errors are treated as transient.
/// Provider-side timeouts are reported against the configured `timeout`.
pub(crate) fn classify_llm_error(err: LLMError, timeout: Duration) -> AuthorError {
    let message = err.to_string();
    let lowered = message.to_ascii_lowercase();
    let has = |needles: &[&str]| needles.iter().any(|needle| lowered.contains(needle));

    if has(&[
        "401",
        "403",
        "unauthorized",
        "forbidden",
        "invalid api key",
        "invalid_api_key",
        "incorrect api key",
        "authentication",
        "auth error",
        "permission denied",
    ]) {
        AuthorError::Rejected(message)
    } else if has(&["429", "rate limit", "rate_limit", "too many requests", "quota"]) {
        AuthorError::RateLimited(message)
    } else if has(&["timed out", "timeout"]) {
        AuthorError::Timeout(timeout)
    } else {
        AuthorError::Unavailable(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const TIMEOUT: Duration = Duration::from_secs(30);

    #[test]
    fn classifies_auth_failures_as_permanent() {
        let err = classify_llm_error(
            LLMError::ProviderError("HTTP 401: invalid api key".into()),
            TIMEOUT,
        );
        assert!(matches!(err, AuthorError::Rejected(_)));
        assert!(!err.is_transient());
    }

    #[test]
    fn classifies_throttling_and_outages_as_transient() {
        let limited = classify_llm_error(
            LLMError::ProviderError("429 Too Many Requests".into()),
            TIMEOUT,
        );
        assert!(matches!(limited, AuthorError::RateLimited(_)));

        let overloaded =
            classify_llm_error(LLMError::ProviderError("503 overloaded".into()), TIMEOUT);
        assert!(matches!(overloaded, AuthorError::Unavailable(_)));

        let timeout =
            classify_llm_error(LLMError::ProviderError("request timed out".into()), TIMEOUT);
        assert_eq!(timeout, AuthorError::Timeout(TIMEOUT));

        assert!(limited.is_transient() && overloaded.is_transient() && timeout.is_transient());
    }
}
