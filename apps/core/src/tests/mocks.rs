//! Mock actors shared by the test suites.

use crate::actors::messages::{ActorError, AppError, ServiceFailure};
use crate::actors::traits::{CompletionActor, EmbeddingActor};
use crate::brain::ReplyPicker;
use crate::models::{Completion, Message};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::time::{sleep, Duration};

/// Deterministic bag-of-letters embedder.
///
/// Vector = 26 letter counts plus a constant bias, so no text embeds to zero.
pub struct MockEmbedder {
    pub embed_calls: AtomicUsize,
    pub batch_calls: AtomicUsize,
    pub fail_queries: bool,
    pub fail_batches: bool,
    pub dimension_override: Option<usize>,
}

impl MockEmbedder {
    pub fn new() -> Self {
        Self {
            embed_calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
            fail_queries: false,
            fail_batches: false,
            dimension_override: None,
        }
    }

    /// Query embeds fail; index builds still work.
    pub fn failing_queries() -> Self {
        Self {
            fail_queries: true,
            ..Self::new()
        }
    }

    /// Index builds fail.
    pub fn failing_batches() -> Self {
        Self {
            fail_batches: true,
            ..Self::new()
        }
    }

    /// Query vectors have the wrong length.
    pub fn with_query_dimension(dimension: usize) -> Self {
        Self {
            dimension_override: Some(dimension),
            ..Self::new()
        }
    }

    pub fn vectorize(text: &str) -> Vec<f32> {
        let mut vector = vec![0.0; 27];
        for c in text.to_lowercase().chars() {
            if c.is_ascii_lowercase() {
                vector[(c as u8 - b'a') as usize] += 1.0;
            }
        }
        vector[26] = 1.0;
        vector
    }

    pub fn embed_count(&self) -> usize {
        self.embed_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingActor for MockEmbedder {
    async fn embed(&self, text: String) -> Result<Vec<f32>, AppError> {
        self.embed_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_queries {
            return Err(AppError::Actor(ActorError::EmbeddingError(
                "Mock embedding failure".to_string(),
            )));
        }
        match self.dimension_override {
            Some(dimension) => Ok(vec![1.0; dimension]),
            None => Ok(Self::vectorize(&text)),
        }
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_batches {
            return Err(AppError::Actor(ActorError::EmbeddingError(
                "Mock model missing".to_string(),
            )));
        }
        Ok(texts.iter().map(|t| Self::vectorize(t)).collect())
    }
}

/// Completion service double that records every prompt it receives.
pub struct MockCompleter {
    pub response: Result<Completion, ServiceFailure>,
    pub delay_ms: u64,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<Vec<Message>>>,
}

impl MockCompleter {
    pub fn new(reply: &str) -> Self {
        Self {
            response: Ok(Completion {
                content: reply.to_string(),
                model: Some("mock-model".to_string()),
            }),
            delay_ms: 0,
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(failure: ServiceFailure) -> Self {
        Self {
            response: Err(failure),
            ..Self::new("")
        }
    }

    pub fn with_delay(mut self, ms: u64) -> Self {
        self.delay_ms = ms;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<Vec<Message>> {
        self.prompts.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl CompletionActor for MockCompleter {
    async fn complete(&self, messages: Vec<Message>) -> Result<Completion, ServiceFailure> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(messages);
        if self.delay_ms > 0 {
            sleep(Duration::from_millis(self.delay_ms)).await;
        }
        self.response.clone()
    }
}

/// Always picks the same index.
pub struct FixedPicker(pub usize);

impl ReplyPicker for FixedPicker {
    fn pick_index(&self, _len: usize) -> usize {
        self.0
    }
}
