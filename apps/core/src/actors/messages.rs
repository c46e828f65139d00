use crate::models::{Completion, Message};
use crate::pipeline::TurnOutcome;
use std::time::Duration;
use tokio::sync::oneshot;

/// Defines errors that can occur within the actor system.
#[derive(Debug, thiserror::Error, Clone)]
pub enum ActorError {
    /// An error originating from the embedding actor.
    #[error("Embedding request failed: {0}")]
    EmbeddingError(String),
    /// A generic internal error within an actor.
    #[error("Internal system error: {0}")]
    Internal(String),
}

// Re-export AppError for convenience
pub use crate::error::AppError;

/// Why a completion request produced no usable reply.
///
/// Every variant ends up on the same fallback path in the pipeline; the
/// distinction only matters for operator logs.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ServiceFailure {
    #[error("completion service is not configured: {0}")]
    Config(String),
    #[error("completion request failed: {0}")]
    Transport(String),
    #[error("completion request failed with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed completion response: {0}")]
    Malformed(String),
    #[error("completion response had no usable content")]
    EmptyContent,
    #[error("completion timed out after {0:?}")]
    Timeout(Duration),
    #[error("completion actor unavailable: {0}")]
    Unavailable(String),
}

/// Messages that can be sent to the `EmbeddingActor`.
#[derive(Debug)]
pub enum EmbeddingMessage {
    /// Embed a single text (per-request query path, cached).
    Embed {
        text: String,
        responder: oneshot::Sender<Result<Vec<f32>, AppError>>,
    },
    /// Embed many texts in one model call (index build path, uncached).
    EmbedBatch {
        texts: Vec<String>,
        responder: oneshot::Sender<Result<Vec<Vec<f32>>, AppError>>,
    },
}

/// Messages that can be sent to the `CompletionActor`.
#[derive(Debug)]
pub enum CompletionMessage {
    /// A request to generate one reply for an ordered message list.
    Complete {
        messages: Vec<Message>,
        /// A channel to send the completion (or the typed failure) back.
        responder: oneshot::Sender<Result<Completion, ServiceFailure>>,
    },
}

/// Messages that can be sent to the `SupervisorActor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// A request to answer one user turn.
    ProcessUserMessage {
        content: String,
        /// A channel to send the finished turn back. Turns never fail.
        responder: oneshot::Sender<TurnOutcome>,
    },
    /// A command to stop accepting turns.
    Shutdown,
}
