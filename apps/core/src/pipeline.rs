//! The response pipeline: one user turn in, one in-character reply out.
//!
//! ```text
//! crisis? ──yes──> fixed safety message
//!    │
//! intent != emotional ──> canned reply
//!    │
//! index not ready ──> not-ready message
//!    │
//! category -> embed -> retrieve -> style -> prompt -> completion
//!                                                    │
//!                                     failure ──> fallback apology
//! ```
//!
//! `respond` never returns an error; every failure past the readiness gate is
//! recovered into the fallback text and logged with the turn id.

use crate::actors::traits::{CompletionActor, EmbeddingActor};
use crate::brain::{
    CannedReplies, Category, CategoryClassifier, CategoryTable, CrisisDetector, Intent,
    IntentClassifier, LanguageStyleDetector, RandomPicker, ReplyPicker, Style,
};
use crate::knowledge::{IndexReadiness, DEFAULT_TOP_K};
use crate::prompt::PromptAssembler;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Which branch answered a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    Crisis,
    Canned,
    NotReady,
    Generated,
    Fallback,
}

/// Observable result of one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnOutcome {
    pub turn_id: Uuid,
    pub reply: String,
    pub route: Route,
    pub intent: Option<Intent>,
    pub category: Option<Category>,
    pub style: Option<Style>,
    /// Ids of the knowledge entries handed to the prompt, best first.
    pub retrieved_ids: Vec<String>,
    pub processing_time_ms: u64,
    pub timestamp: DateTime<Utc>,
}

struct TurnDraft {
    turn_id: Uuid,
    started: Instant,
    intent: Option<Intent>,
    category: Option<Category>,
    style: Option<Style>,
    retrieved_ids: Vec<String>,
}

impl TurnDraft {
    fn new(turn_id: Uuid) -> Self {
        Self {
            turn_id,
            started: Instant::now(),
            intent: None,
            category: None,
            style: None,
            retrieved_ids: Vec::new(),
        }
    }

    fn finish(self, route: Route, reply: impl Into<String>) -> TurnOutcome {
        let processing_time_ms = self.started.elapsed().as_millis() as u64;
        info!(turn_id = %self.turn_id, route = ?route, processing_time_ms, "Turn answered");
        TurnOutcome {
            turn_id: self.turn_id,
            reply: reply.into(),
            route,
            intent: self.intent,
            category: self.category,
            style: self.style,
            retrieved_ids: self.retrieved_ids,
            processing_time_ms,
            timestamp: Utc::now(),
        }
    }
}

pub struct ResponsePipeline<E, C>
where
    E: EmbeddingActor,
    C: CompletionActor,
{
    crisis: CrisisDetector,
    intents: IntentClassifier,
    categories: CategoryClassifier,
    style: LanguageStyleDetector,
    replies: CannedReplies,
    picker: Arc<dyn ReplyPicker>,
    prompt: PromptAssembler,
    readiness: IndexReadiness,
    embedder: Arc<E>,
    completer: Arc<C>,
    top_k: usize,
}

impl<E, C> ResponsePipeline<E, C>
where
    E: EmbeddingActor,
    C: CompletionActor,
{
    /// A pipeline with the default tables, replies and `k`.
    pub fn new(embedder: Arc<E>, completer: Arc<C>, readiness: IndexReadiness) -> Self {
        Self {
            crisis: CrisisDetector::new(),
            intents: IntentClassifier::new(),
            categories: CategoryClassifier::new(),
            style: LanguageStyleDetector::new(),
            replies: CannedReplies::default(),
            picker: Arc::new(RandomPicker::from_entropy()),
            prompt: PromptAssembler::new(),
            readiness,
            embedder,
            completer,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_category_table(mut self, table: CategoryTable) -> Self {
        self.categories = CategoryClassifier::with_table(table);
        self
    }

    pub fn with_crisis_detector(mut self, crisis: CrisisDetector) -> Self {
        self.crisis = crisis;
        self
    }

    pub fn with_intent_classifier(mut self, intents: IntentClassifier) -> Self {
        self.intents = intents;
        self
    }

    pub fn with_style_detector(mut self, style: LanguageStyleDetector) -> Self {
        self.style = style;
        self
    }

    pub fn with_replies(mut self, replies: CannedReplies) -> Self {
        self.replies = replies;
        self
    }

    pub fn with_picker(mut self, picker: Arc<dyn ReplyPicker>) -> Self {
        self.picker = picker;
        self
    }

    /// Clamped to at least 1.
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = k.max(1);
        self
    }

    pub fn readiness(&self) -> &IndexReadiness {
        &self.readiness
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Answer one turn.
    pub async fn respond(&self, text: &str) -> TurnOutcome {
        let turn_id = Uuid::new_v4();
        self.respond_turn(turn_id, text).await
    }

    #[instrument(name = "turn", skip_all, fields(turn_id = %turn_id))]
    async fn respond_turn(&self, turn_id: Uuid, text: &str) -> TurnOutcome {
        let mut draft = TurnDraft::new(turn_id);
        debug!(text, "Turn received");

        if self.crisis.detect(text) {
            warn!(turn_id = %turn_id, "Crisis language detected; returning safety message");
            return draft.finish(Route::Crisis, self.replies.crisis.clone());
        }

        let intent = self.intents.classify_detailed(text);
        draft.intent = Some(intent.intent);
        if intent.intent != Intent::Emotional {
            debug!(intent = %intent.intent, matched = ?intent.matched, "Canned intent");
            let reply = self.replies.pick(intent.intent, self.picker.as_ref()).to_string();
            return draft.finish(Route::Canned, reply);
        }

        let Some(index) = self.readiness.index() else {
            let status = self.readiness.status();
            warn!(turn_id = %turn_id, status = status.label(), "Knowledge index not ready");
            return draft.finish(Route::NotReady, self.replies.not_ready.clone());
        };

        let category = self.categories.classify(text);
        let style = self.style.detect(text);
        draft.category = Some(category.clone());
        draft.style = Some(style);

        let hits = if index.count_in(category.as_str()) == 0 {
            debug!(category = %category, "No knowledge entries for category; skipping embed");
            Vec::new()
        } else {
            match self.embedder.embed(text.to_string()).await {
                Ok(query) => match index.retrieve(&query, category.as_str(), self.top_k) {
                    Ok(hits) => hits,
                    Err(e) => {
                        warn!(turn_id = %turn_id, error = %e, "Retrieval failed; continuing without context");
                        Vec::new()
                    }
                },
                Err(e) => {
                    warn!(turn_id = %turn_id, error = %e, "Query embedding failed; continuing without context");
                    Vec::new()
                }
            }
        };
        draft.retrieved_ids = hits.iter().map(|hit| hit.id().to_string()).collect();
        debug!(category = %category, style = style.code(), retrieved = ?draft.retrieved_ids, "Context selected");

        let messages = self.prompt.assemble(text, &hits, style);
        match self.completer.complete(messages).await {
            Ok(completion) => draft.finish(Route::Generated, completion.content),
            Err(failure) => {
                error!(turn_id = %turn_id, error = %failure, "Completion failed; sending fallback");
                draft.finish(Route::Fallback, self.replies.fallback.clone())
            }
        }
    }
}
