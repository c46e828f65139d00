use crate::actors::messages::{CompletionMessage, ServiceFailure};
use crate::actors::traits::CompletionActor;
use crate::models::{Completion, Message, ModelConfig};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// A handle to the completion actor.
///
/// Cloneable interface over the runner that talks to the remote
/// OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct CompletionActorHandle {
    sender: mpsc::Sender<CompletionMessage>,
    call_timeout: Duration,
}

impl CompletionActorHandle {
    /// Spawns the runner and returns a handle to it.
    ///
    /// A missing API key is not an error here: every call then fails with
    /// `ServiceFailure::Config` and the pipeline falls back.
    pub fn new(config: ModelConfig) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let call_timeout = Duration::from_secs(config.timeout_secs);
        let actor = CompletionActorRunner::new(receiver, config);
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            call_timeout,
        }
    }
}

#[async_trait]
impl CompletionActor for CompletionActorHandle {
    async fn complete(&self, messages: Vec<Message>) -> Result<Completion, ServiceFailure> {
        let (send, recv) = oneshot::channel();
        let msg = CompletionMessage::Complete {
            messages,
            responder: send,
        };

        self.sender
            .send(msg)
            .await
            .map_err(|_| ServiceFailure::Unavailable("Completion Actor closed".to_string()))?;
        timeout(self.call_timeout, recv)
            .await
            .map_err(|_| ServiceFailure::Timeout(self.call_timeout))?
            .map_err(|_| ServiceFailure::Unavailable("Completion Actor failed to respond".to_string()))?
    }
}

// --- Wire format ---

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: &'a [Message],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

// --- Actor Runner (Internal Logic) ---
struct CompletionActorRunner {
    receiver: mpsc::Receiver<CompletionMessage>,
    client: Client,
    config: Arc<ModelConfig>,
}

impl CompletionActorRunner {
    fn new(receiver: mpsc::Receiver<CompletionMessage>, config: ModelConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            receiver,
            client,
            config: Arc::new(config),
        }
    }

    async fn run(mut self) {
        info!(
            "CompletionActor started (model: {}, endpoint: {})",
            self.config.model_id, self.config.endpoint
        );
        if self.config.api_key.is_none() {
            warn!("No completion API key configured; generated replies will fall back");
        }

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg);
        }

        info!("CompletionActor stopped");
    }

    fn handle_message(&self, msg: CompletionMessage) {
        match msg {
            CompletionMessage::Complete {
                messages,
                responder,
            } => {
                // Requests run concurrently; a slow completion must not stall other turns.
                let client = self.client.clone();
                let config = self.config.clone();
                tokio::spawn(async move {
                    let result = request_completion(&client, &config, &messages).await;
                    if responder.send(result).is_err() {
                        debug!("Completion caller went away before the reply arrived");
                    }
                });
            }
        }
    }
}

#[instrument(skip_all, fields(model = %config.model_id, messages = messages.len()))]
async fn request_completion(
    client: &Client,
    config: &ModelConfig,
    messages: &[Message],
) -> Result<Completion, ServiceFailure> {
    let api_key = config
        .api_key
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| ServiceFailure::Config("API key is not set".to_string()))?;

    let payload = ChatCompletionRequest {
        model: &config.model_id,
        messages,
        temperature: config.temperature,
        max_tokens: config.max_tokens,
    };

    let res = client
        .post(&config.endpoint)
        .bearer_auth(api_key)
        .json(&payload)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ServiceFailure::Timeout(Duration::from_secs(config.timeout_secs))
            } else {
                ServiceFailure::Transport(e.to_string())
            }
        })?;

    let status = res.status();
    let body = res
        .text()
        .await
        .map_err(|e| ServiceFailure::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(ServiceFailure::Status {
            status: status.as_u16(),
            body,
        });
    }

    let parsed: ChatCompletionResponse =
        serde_json::from_str(&body).map_err(|e| ServiceFailure::Malformed(e.to_string()))?;

    let content = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(ServiceFailure::EmptyContent)?;

    Ok(Completion {
        content,
        model: parsed.model,
    })
}
