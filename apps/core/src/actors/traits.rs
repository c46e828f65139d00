use crate::actors::messages::{AppError, ServiceFailure};
use crate::models::{Completion, Message};
use async_trait::async_trait;

/// Defines the public interface for an embedding actor.
///
/// Maps text to a fixed-length vector. Implementations must be deterministic
/// for identical input so retrieval stays reproducible.
#[async_trait]
pub trait EmbeddingActor: Send + Sync + 'static {
    /// Embeds a single text.
    async fn embed(&self, text: String) -> Result<Vec<f32>, AppError>;

    /// Embeds several texts, preserving input order.
    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.embed(text).await?);
        }
        Ok(vectors)
    }
}

/// Defines the public interface for a chat-completion actor.
///
/// This trait abstracts the remote completion service so that the pipeline can be
/// exercised against in-process doubles.
#[async_trait]
pub trait CompletionActor: Send + Sync + 'static {
    /// Generates one reply for an ordered list of role-tagged messages.
    async fn complete(&self, messages: Vec<Message>) -> Result<Completion, ServiceFailure>;
}
