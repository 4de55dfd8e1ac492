use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use synthschema_core::{AuthorError, SchemaAuthor};

/// Answers every request with the same text.
#[derive(Debug, Default)]
pub struct FixedAuthor {
    response: String,
    calls: AtomicUsize,
}

impl FixedAuthor {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaAuthor for FixedAuthor {
    async fn request(&self, _prompt: &str, _timeout: Duration) -> Result<String, AuthorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.clone())
    }

    fn name(&self) -> &str {
        "fixed"
    }
}

/// Plays back a queue of outcomes, then reports itself unavailable.
#[derive(Debug, Default)]
pub struct ScriptedAuthor {
    script: Mutex<VecDeque<Result<String, AuthorError>>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedAuthor {
    pub fn new(steps: impl IntoIterator<Item = Result<String, AuthorError>>) -> Self {
        Self {
            script: Mutex::new(steps.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().len()
    }
}

#[async_trait]
impl SchemaAuthor for ScriptedAuthor {
    async fn request(&self, prompt: &str, _timeout: Duration) -> Result<String, AuthorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());
        self.script
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(AuthorError::Unavailable("script exhausted".to_string())))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// Fails every request with the same error.
#[derive(Debug)]
pub struct FailingAuthor {
    error: AuthorError,
    calls: AtomicUsize,
}

impl FailingAuthor {
    pub fn new(error: AuthorError) -> Self {
        Self {
            error,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaAuthor for FailingAuthor {
    async fn request(&self, _prompt: &str, _timeout: Duration) -> Result<String, AuthorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(self.error.clone())
    }

    fn name(&self) -> &str {
        "failing"
    }
}

/// Sleeps before answering, counting calls through a shared counter.
#[derive(Debug, Clone)]
pub struct CountingAuthor {
    response: String,
    delay: Duration,
    calls: Arc<AtomicUsize>,
}

impl CountingAuthor {
    pub fn new(response: impl Into<String>, delay: Duration) -> Self {
        Self {
            response: response.into(),
            delay,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SchemaAuthor for CountingAuthor {
    async fn request(&self, _prompt: &str, _timeout: Duration) -> Result<String, AuthorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        Ok(self.response.clone())
    }

    fn name(&self) -> &str {
        "counting"
    }
}
