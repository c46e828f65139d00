use crate::actors::messages::{ActorError, AppError, EmbeddingMessage};
use crate::actors::traits::EmbeddingActor;
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

/// Synchronous text-to-vector model behind the embedding actor.
///
/// Implemented for the local ONNX model; tests plug in deterministic encoders.
pub trait TextEncoder: Send + 'static {
    fn encode(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, ActorError>;
}

impl TextEncoder for TextEmbedding {
    fn encode(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, ActorError> {
        self.embed(texts, None)
            .map_err(|e| ActorError::EmbeddingError(format!("Embedding failed: {}", e)))
    }
}

/// Load the local sentence-embedding model, downloading it into `cache_dir` on first use.
pub fn load_local_model(cache_dir: PathBuf) -> Result<TextEmbedding, ActorError> {
    let mut options = InitOptions::new(EmbeddingModel::AllMiniLML6V2);
    options.show_download_progress = false;
    options.cache_dir = cache_dir;

    TextEmbedding::try_new(options)
        .map_err(|e| ActorError::EmbeddingError(format!("Failed to load embedding model: {}", e)))
}

/// A handle to the embedding actor.
///
/// Cloneable; every clone talks to the same runner, which owns the model and
/// a query cache.
#[derive(Clone)]
pub struct EmbeddingActorHandle {
    sender: mpsc::Sender<EmbeddingMessage>,
}

impl EmbeddingActorHandle {
    /// Spawn an actor that loads the local model from `cache_dir`.
    ///
    /// Loading happens inside the actor; requests queue until it finishes. If
    /// loading fails every request gets an `EmbeddingError`.
    pub fn new(cache_dir: PathBuf) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = EmbeddingActorRunner::new(receiver, EncoderSource::Local(cache_dir));
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }

    /// Spawn an actor around an already-constructed encoder.
    pub fn with_encoder(encoder: Box<dyn TextEncoder>) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = EmbeddingActorRunner::new(receiver, EncoderSource::Ready(encoder));
        tokio::spawn(async move { actor.run().await });
        Self { sender }
    }
}

#[async_trait]
impl EmbeddingActor for EmbeddingActorHandle {
    async fn embed(&self, text: String) -> Result<Vec<f32>, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = EmbeddingMessage::Embed {
            text,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|_| AppError::Actor(ActorError::Internal("Embedding Actor closed".to_string())))?;
        recv.await.map_err(|_| {
            AppError::Actor(ActorError::Internal("Embedding Actor failed to respond".to_string()))
        })?
    }

    async fn embed_batch(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = EmbeddingMessage::EmbedBatch {
            texts,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|_| AppError::Actor(ActorError::Internal("Embedding Actor closed".to_string())))?;
        recv.await.map_err(|_| {
            AppError::Actor(ActorError::Internal("Embedding Actor failed to respond".to_string()))
        })?
    }
}

enum EncoderSource {
    Local(PathBuf),
    Ready(Box<dyn TextEncoder>),
}

// --- Actor Runner (Internal Logic) ---
struct EmbeddingActorRunner {
    receiver: mpsc::Receiver<EmbeddingMessage>,
    source: Option<EncoderSource>,
    encoder: Option<Box<dyn TextEncoder>>,
    load_error: Option<String>,
    embedding_cache: LruCache<String, Vec<f32>>,
}

impl EmbeddingActorRunner {
    const CACHE_SIZE: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(size) => size,
        None => panic!("Cache size must be non-zero"),
    };

    fn new(receiver: mpsc::Receiver<EmbeddingMessage>, source: EncoderSource) -> Self {
        Self {
            receiver,
            source: Some(source),
            encoder: None,
            load_error: None,
            embedding_cache: LruCache::new(Self::CACHE_SIZE),
        }
    }

    async fn run(mut self) {
        info!("EmbeddingActor started");

        match self.source.take() {
            Some(EncoderSource::Ready(encoder)) => self.encoder = Some(encoder),
            Some(EncoderSource::Local(cache_dir)) => {
                let loaded = tokio::task::spawn_blocking(move || load_local_model(cache_dir)).await;
                match loaded {
                    Ok(Ok(model)) => {
                        info!("Embedding model loaded successfully");
                        self.encoder = Some(Box::new(model));
                    }
                    Ok(Err(e)) => {
                        error!("{}", e);
                        self.load_error = Some(e.to_string());
                    }
                    Err(e) => {
                        error!("Embedding model loader panicked: {}", e);
                        self.load_error = Some(format!("Embedding model loader panicked: {}", e));
                    }
                }
            }
            None => {}
        }

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg);
        }
        info!("EmbeddingActor stopped");
    }

    fn handle_message(&mut self, msg: EmbeddingMessage) {
        match msg {
            EmbeddingMessage::Embed { text, responder } => {
                let result = self.embed_query(text);
                if responder.send(result.map_err(AppError::from)).is_err() {
                    warn!("Failed to send embed response (channel closed)");
                }
            }
            EmbeddingMessage::EmbedBatch { texts, responder } => {
                let result = self.embed_many(texts);
                if responder.send(result.map_err(AppError::from)).is_err() {
                    warn!("Failed to send batch embed response (channel closed)");
                }
            }
        }
    }

    fn encoder(&self) -> Result<&dyn TextEncoder, ActorError> {
        self.encoder.as_deref().ok_or_else(|| {
            ActorError::EmbeddingError(
                self.load_error
                    .clone()
                    .unwrap_or_else(|| "Embedding model not loaded".to_string()),
            )
        })
    }

    fn embed_query(&mut self, text: String) -> Result<Vec<f32>, ActorError> {
        if let Some(embedding) = self.embedding_cache.get(&text) {
            debug!("Embedding cache hit");
            return Ok(embedding.clone());
        }

        let embedding = self
            .encoder()?
            .encode(vec![text.clone()])?
            .into_iter()
            .next()
            .ok_or_else(|| ActorError::EmbeddingError("No embedding generated".to_string()))?;
        self.embedding_cache.put(text, embedding.clone());
        Ok(embedding)
    }

    fn embed_many(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, ActorError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let expected = texts.len();
        let vectors = self.encoder()?.encode(texts)?;
        if vectors.len() != expected {
            return Err(ActorError::EmbeddingError(format!(
                "Model returned {} embeddings for {} texts",
                vectors.len(),
                expected
            )));
        }
        Ok(vectors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingEncoder {
        calls: Arc<AtomicUsize>,
    }

    impl TextEncoder for CountingEncoder {
        fn encode(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, ActorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|t| vec![t.len() as f32, 1.0]).collect())
        }
    }

    struct BrokenEncoder;

    impl TextEncoder for BrokenEncoder {
        fn encode(&self, _texts: Vec<String>) -> Result<Vec<Vec<f32>>, ActorError> {
            Err(ActorError::EmbeddingError("onnx session lost".to_string()))
        }
    }

    #[tokio::test]
    async fn test_repeated_query_hits_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = EmbeddingActorHandle::with_encoder(Box::new(CountingEncoder {
            calls: calls.clone(),
        }));

        let first = handle.embed("exam stress".to_string()).await.unwrap();
        let second = handle.embed("exam stress".to_string()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_batch_preserves_order() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handle = EmbeddingActorHandle::with_encoder(Box::new(CountingEncoder {
            calls: calls.clone(),
        }));

        let vectors = handle
            .embed_batch(vec!["a".to_string(), "abc".to_string()])
            .await
            .unwrap();

        assert_eq!(vectors, vec![vec![1.0, 1.0], vec![3.0, 1.0]]);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_encoder_failure_is_reported() {
        let handle = EmbeddingActorHandle::with_encoder(Box::new(BrokenEncoder));
        let err = handle.embed("hello".to_string()).await.unwrap_err();
        assert!(matches!(err, AppError::Actor(ActorError::EmbeddingError(_))));
    }
}
