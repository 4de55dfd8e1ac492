//! One-call dataset generation over the core acquisition stack.

use log::{debug, info};
use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use synthschema_config::{RequestLimits, SynthConfig};
use synthschema_core::{
    AcquireError, AcquirerSettings, CallBudget, LeastRecentlyUsed, Record, RecordExpander, Schema,
    SchemaAcquirer, SchemaAuthor, SchemaStore, StoreError,
};
use thiserror::Error;

/// Failures surfaced by [`Pipeline`].
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The request violates the configured description or row limits.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// Schema acquisition failed hard.
    #[error(transparent)]
    Acquire(#[from] AcquireError),
    /// The schema cache could not be opened.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PipelineError {
    /// True when asking again later may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            PipelineError::Acquire(err) => err.is_retryable(),
            PipelineError::InvalidRequest(_) | PipelineError::Store(_) => false,
        }
    }
}

/// Generated records plus the schema facts they were built from.
#[derive(Debug, Clone, Serialize)]
pub struct Dataset {
    pub domain: String,
    pub field_names: Vec<String>,
    pub records: Vec<Record>,
    pub generation_time: Duration,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Owns the store, the acquirer and the expander for one configuration.
pub struct Pipeline {
    acquirer: SchemaAcquirer,
    expander: Mutex<RecordExpander>,
    limits: RequestLimits,
}

impl Pipeline {
    /// Open the configured cache and wire `author` behind it.
    pub fn new(config: &SynthConfig, author: Arc<dyn SchemaAuthor>) -> Result<Self, PipelineError> {
        let store = if config.cache.enabled {
            SchemaStore::open(&config.cache.path)?
        } else {
            debug!("schema cache disabled, using in-memory store");
            SchemaStore::in_memory()
        };
        let store = match config.cache.max_entries {
            Some(max_entries) => store.with_eviction(LeastRecentlyUsed::new(max_entries)),
            None => store,
        };
        Ok(Self::with_store(config, Arc::new(store), author))
    }

    /// Build a pipeline over an already opened store.
    pub fn with_store(
        config: &SynthConfig,
        store: Arc<SchemaStore>,
        author: Arc<dyn SchemaAuthor>,
    ) -> Self {
        let settings = AcquirerSettings {
            max_attempts: config.author.max_attempts.max(1),
            base_delay: Duration::from_millis(config.author.base_delay_ms),
            request_timeout: Duration::from_secs(config.author.request_timeout_secs),
            single_flight: config.author.single_flight,
            max_description_chars: config.limits.max_description_chars,
        };
        let budget = CallBudget::new(
            config.rate_limit.requests_per_minute,
            config.rate_limit.requests_per_day,
        );
        let expander = match config.generation.seed {
            Some(seed) => RecordExpander::seeded(seed),
            None => RecordExpander::from_entropy(),
        };
        info!(
            "pipeline ready (author={}, cache_enabled={}, seeded={})",
            author.name(),
            config.cache.enabled,
            config.generation.seed.is_some()
        );
        Self {
            acquirer: SchemaAcquirer::new(store, author)
                .with_settings(settings)
                .with_budget(budget),
            expander: Mutex::new(expander),
            limits: config.limits.clone(),
        }
    }

    pub fn store(&self) -> &SchemaStore {
        self.acquirer.store()
    }

    /// Resolve the schema for `description` without generating records.
    pub async fn schema(&self, description: &str) -> Result<Schema, PipelineError> {
        self.check_description(description)?;
        Ok(self.acquirer.acquire(description, 0).await?)
    }

    /// Acquire the schema for `description` and expand it into `rows` records.
    pub async fn generate(&self, description: &str, rows: usize) -> Result<Dataset, PipelineError> {
        self.check_description(description)?;
        self.check_rows(rows)?;

        let started = Instant::now();
        let schema = self.acquirer.acquire(description, rows).await?;
        let records: Vec<Record> = self.expander.lock().expand(&schema, rows).collect();
        let generation_time = started.elapsed();
        info!(
            "dataset generated (key={}, domain={}, rows={}, elapsed_ms={})",
            schema.key.short(),
            schema.domain,
            records.len(),
            generation_time.as_millis()
        );
        Ok(Dataset {
            field_names: schema.field_names(),
            domain: schema.domain,
            records,
            generation_time,
        })
    }

    fn check_description(&self, description: &str) -> Result<(), PipelineError> {
        let chars = description.trim().chars().count();
        if chars < self.limits.min_description_chars {
            return Err(PipelineError::InvalidRequest(format!(
                "description must be at least {} characters (got {chars})",
                self.limits.min_description_chars
            )));
        }
        if chars > self.limits.max_description_chars {
            return Err(PipelineError::InvalidRequest(format!(
                "description must be at most {} characters (got {chars})",
                self.limits.max_description_chars
            )));
        }
        Ok(())
    }

    fn check_rows(&self, rows: usize) -> Result<(), PipelineError> {
        if rows < self.limits.min_rows || rows > self.limits.max_rows {
            return Err(PipelineError::InvalidRequest(format!(
                "rows must be between {} and {} (got {rows})",
                self.limits.min_rows, self.limits.max_rows
            )));
        }
        Ok(())
    }
}
