//! Cache-first schema acquisition with retry, backoff and fallback.

use crate::author::{AuthorError, SchemaAuthor};
use crate::budget::CallBudget;
use crate::error::{AcquireError, AcquirePhase};
use crate::fallback::fallback_schema;
use crate::hasher::ContentHasher;
use crate::parse::ResponseParser;
use crate::prompt::PromptBuilder;
use crate::schema::{CacheKey, Schema};
use crate::store::SchemaStore;
use log::{debug, info, warn};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex as AsyncMutex;

/// Retry and request-shaping knobs for [`SchemaAcquirer`].
#[derive(Debug, Clone)]
pub struct AcquirerSettings {
    /// Total authoring attempts per miss, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles for each later one.
    pub base_delay: Duration,
    /// Bound on a single authoring call.
    pub request_timeout: Duration,
    /// Collapse concurrent misses for one key into a single authoring call.
    pub single_flight: bool,
    pub max_description_chars: usize,
}

impl Default for AcquirerSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            request_timeout: Duration::from_secs(30),
            single_flight: true,
            max_description_chars: 4000,
        }
    }
}

impl AcquirerSettings {
    /// Delay after the failed attempt number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

/// Orchestrates cache lookup, authoring and cache population.
pub struct SchemaAcquirer {
    store: Arc<SchemaStore>,
    author: Arc<dyn SchemaAuthor>,
    prompts: PromptBuilder,
    budget: CallBudget,
    settings: AcquirerSettings,
    in_flight: Mutex<HashMap<CacheKey, Arc<AsyncMutex<()>>>>,
}

impl SchemaAcquirer {
    pub fn new(store: Arc<SchemaStore>, author: Arc<dyn SchemaAuthor>) -> Self {
        let settings = AcquirerSettings::default();
        Self {
            store,
            author,
            prompts: PromptBuilder::new(settings.max_description_chars),
            budget: CallBudget::unlimited(),
            settings,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_settings(mut self, settings: AcquirerSettings) -> Self {
        self.prompts = PromptBuilder::new(settings.max_description_chars);
        self.settings = settings;
        self
    }

    pub fn with_budget(mut self, budget: CallBudget) -> Self {
        self.budget = budget;
        self
    }

    pub fn store(&self) -> &Arc<SchemaStore> {
        &self.store
    }

    pub fn settings(&self) -> &AcquirerSettings {
        &self.settings
    }

    /// Return the schema for `description`, authoring it on a cache miss.
    ///
    /// Transient authoring failures degrade to the fallback schema, which is
    /// cached like any other. Only permanent rejections, an exhausted call
    /// budget or an unusable fallback surface as errors.
    pub async fn acquire(&self, description: &str, rows: usize) -> Result<Schema, AcquireError> {
        let key = ContentHasher::hash(description);
        if let Some(entry) = self.store.lookup(&key) {
            info!(
                "schema cache hit (key={}, use_count={}, rows={rows})",
                key.short(),
                entry.use_count
            );
            return Ok(entry.schema);
        }
        info!(
            "schema cache miss (key={}, description_len={}, rows={rows})",
            key.short(),
            description.len()
        );

        if !self.settings.single_flight {
            return self.resolve(&key, description).await;
        }

        let flight = self.flight(&key);
        let result = {
            let _guard = flight.lock().await;
            match self.store.lookup(&key) {
                Some(entry) => {
                    debug!(
                        "schema authored by a concurrent request (key={})",
                        key.short()
                    );
                    Ok(entry.schema)
                }
                None => self.resolve(&key, description).await,
            }
        };
        self.release_flight(&key, flight);
        result
    }

    fn flight(&self, key: &CacheKey) -> Arc<AsyncMutex<()>> {
        self.in_flight
            .lock()
            .entry(key.clone())
            .or_default()
            .clone()
    }

    fn release_flight(&self, key: &CacheKey, flight: Arc<AsyncMutex<()>>) {
        let mut in_flight = self.in_flight.lock();
        drop(flight);
        if in_flight
            .get(key)
            .is_some_and(|registered| Arc::strong_count(registered) == 1)
        {
            in_flight.remove(key);
        }
    }

    async fn resolve(&self, key: &CacheKey, description: &str) -> Result<Schema, AcquireError> {
        self.budget.try_acquire().map_err(|reason| {
            warn!("schema authoring throttled (key={}): {reason}", key.short());
            AcquireError::Throttled { reason }
        })?;

        let schema = match self.author_schema(key, description).await? {
            Some(schema) => schema,
            None => {
                warn!(
                    "schema authoring unavailable; using fallback schema (key={})",
                    key.short()
                );
                fallback_schema(key)
            }
        };
        schema.validate().map_err(AcquireError::EmptySchema)?;

        let stored = self.store.upsert(key, schema.clone());
        if stored.schema != schema {
            debug!(
                "cache already held a schema for this key; keeping ours for this request (key={})",
                key.short()
            );
        }
        Ok(schema)
    }

    /// `Ok(None)` means every attempt failed transiently.
    async fn author_schema(
        &self,
        key: &CacheKey,
        description: &str,
    ) -> Result<Option<Schema>, AcquireError> {
        let max_attempts = self.settings.max_attempts.max(1);
        let mut refined = false;

        for attempt in 1..=max_attempts {
            let prompt = if refined {
                self.prompts.build_refined(description)
            } else {
                self.prompts.build(description)
            };
            let started = Instant::now();
            let timeout = self.settings.request_timeout;
            let outcome = tokio::time::timeout(timeout, self.author.request(&prompt, timeout))
                .await
                .unwrap_or(Err(AuthorError::Timeout(timeout)));
            debug!(
                "authoring call finished (author={}, attempt={attempt}, elapsed_ms={})",
                self.author.name(),
                started.elapsed().as_millis()
            );

            match outcome {
                Ok(text) => match ResponseParser::parse(&text, key, self.author.origin()) {
                    Ok(schema) => {
                        info!(
                            "schema authored (key={}, author={}, fields={}, attempt={attempt})",
                            key.short(),
                            self.author.name(),
                            schema.fields.len()
                        );
                        return Ok(Some(schema));
                    }
                    Err(err) if refined => {
                        warn!(
                            "refined authoring response malformed (key={}, attempt={attempt}): {err}",
                            key.short()
                        );
                        return Ok(None);
                    }
                    Err(err) => {
                        warn!(
                            "authoring response malformed; retrying with strict prompt (key={}, attempt={attempt}): {err}",
                            key.short()
                        );
                        refined = true;
                    }
                },
                Err(err) if !err.is_transient() => {
                    warn!(
                        "authoring rejected permanently (key={}, author={}): {err}",
                        key.short(),
                        self.author.name()
                    );
                    return Err(AcquireError::Authoring {
                        phase: AcquirePhase::Authoring,
                        source: err,
                    });
                }
                Err(err) => {
                    warn!(
                        "authoring attempt failed (key={}, attempt={attempt}/{max_attempts}): {err}",
                        key.short()
                    );
                }
            }

            if attempt < max_attempts {
                let delay = self.settings.backoff(attempt);
                debug!(
                    "backing off before next authoring attempt (key={}, delay_ms={})",
                    key.short(),
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
        }
        Ok(None)
    }
}
