use crate::actors::embedder::EmbeddingActorHandle;
use crate::actors::llm::CompletionActorHandle;
use crate::actors::messages::{ActorError, AppError, SupervisorMessage};
use crate::actors::traits::{CompletionActor, EmbeddingActor};
use crate::brain::CategoryTable;
use crate::config::AppConfig;
use crate::knowledge::{
    readiness_channel, IndexPublisher, IndexReadiness, IndexStatus, KnowledgeBase,
    KnowledgeBaseIndex,
};
use crate::pipeline::{ResponsePipeline, TurnOutcome};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, instrument, warn};

/// A handle to the supervisor actor.
///
/// The supervisor owns the embedding and completion actors, builds the
/// knowledge index in the background at startup, and answers each user turn
/// in its own task.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    readiness: IndexReadiness,
}

impl SupervisorHandle {
    /// Spawns the production supervisor and its children from `config`.
    ///
    /// `knowledge` and `categories` are already loaded and validated; the index
    /// build starts immediately and turns are accepted while it runs.
    pub fn new(config: &AppConfig, knowledge: KnowledgeBase, categories: CategoryTable) -> Self {
        let embedder = Arc::new(EmbeddingActorHandle::new(config.paths.embeddings_dir()));
        let completer = Arc::new(CompletionActorHandle::new(config.model.clone()));
        Self::with_actors(embedder, completer, knowledge, move |pipeline| {
            pipeline
                .with_category_table(categories)
                .with_top_k(config.retrieval.top_k)
        })
    }

    /// Spawns a supervisor around the given actors.
    ///
    /// `configure` adjusts the pipeline before the runner starts.
    pub fn with_actors<E, C, F>(
        embedder: Arc<E>,
        completer: Arc<C>,
        knowledge: KnowledgeBase,
        configure: F,
    ) -> Self
    where
        E: EmbeddingActor,
        C: CompletionActor,
        F: FnOnce(ResponsePipeline<E, C>) -> ResponsePipeline<E, C>,
    {
        let (publisher, readiness) = readiness_channel();
        spawn_index_build(knowledge, embedder.clone(), publisher);

        let pipeline = configure(ResponsePipeline::new(embedder, completer, readiness.clone()));
        Self::spawn_runner(pipeline, readiness)
    }

    /// Spawns a supervisor around a ready-made pipeline; no index build is started.
    pub fn from_pipeline<E, C>(pipeline: ResponsePipeline<E, C>) -> Self
    where
        E: EmbeddingActor,
        C: CompletionActor,
    {
        let readiness = pipeline.readiness().clone();
        Self::spawn_runner(pipeline, readiness)
    }

    fn spawn_runner<E, C>(pipeline: ResponsePipeline<E, C>, readiness: IndexReadiness) -> Self
    where
        E: EmbeddingActor,
        C: CompletionActor,
    {
        let (sender, receiver) = mpsc::channel(32);
        let runner = SupervisorRunner::new(receiver, Arc::new(pipeline));
        tokio::spawn(async move { runner.run().await });
        Self { sender, readiness }
    }

    /// Answers one user turn.
    ///
    /// Only fails if the supervisor itself is gone; every pipeline failure is
    /// already folded into the returned reply.
    #[instrument(skip(self, content))]
    pub async fn process_message(&self, content: String) -> Result<TurnOutcome, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::ProcessUserMessage {
            content,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|_| AppError::Actor(ActorError::Internal("Supervisor closed".to_string())))?;
        recv.await
            .map_err(|_| AppError::Actor(ActorError::Internal("Supervisor failed to respond".to_string())))
    }

    /// Current index status.
    pub fn readiness(&self) -> IndexStatus {
        self.readiness.status()
    }

    /// Waits for the index build to finish, successfully or not.
    pub async fn wait_until_settled(&self) -> IndexStatus {
        self.readiness.settled().await
    }

    /// Stops accepting new turns. Turns already in flight still complete.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SupervisorMessage::Shutdown)
            .await
            .map_err(|_| AppError::Actor(ActorError::Internal("Supervisor closed".to_string())))
    }
}

fn spawn_index_build<E>(knowledge: KnowledgeBase, embedder: Arc<E>, publisher: IndexPublisher)
where
    E: EmbeddingActor,
{
    tokio::spawn(async move {
        info!("Knowledge index build started ({} entries)", knowledge.len());
        match KnowledgeBaseIndex::build(knowledge, embedder.as_ref()).await {
            Ok(index) => publisher.ready(index),
            Err(e) => publisher.failed(e.to_string()),
        }
    });
}

// --- Actor Runner ---
struct SupervisorRunner<E, C>
where
    E: EmbeddingActor,
    C: CompletionActor,
{
    receiver: mpsc::Receiver<SupervisorMessage>,
    pipeline: Arc<ResponsePipeline<E, C>>,
}

impl<E, C> SupervisorRunner<E, C>
where
    E: EmbeddingActor,
    C: CompletionActor,
{
    fn new(receiver: mpsc::Receiver<SupervisorMessage>, pipeline: Arc<ResponsePipeline<E, C>>) -> Self {
        Self { receiver, pipeline }
    }

    async fn run(mut self) {
        info!("Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            if !self.handle_message(msg) {
                break;
            }
        }
        info!("Supervisor stopped");
    }

    /// Returns `false` once the runner should stop.
    fn handle_message(&self, msg: SupervisorMessage) -> bool {
        match msg {
            SupervisorMessage::ProcessUserMessage { content, responder } => {
                let pipeline = self.pipeline.clone();
                tokio::spawn(async move {
                    let outcome = pipeline.respond(&content).await;
                    if responder.send(outcome).is_err() {
                        warn!("Failed to send turn outcome (caller went away)");
                    }
                });
                true
            }
            SupervisorMessage::Shutdown => {
                info!("Supervisor shutting down...");
                false
            }
        }
    }
}
