//! Index readiness gate.
//!
//! The index is built in the background at startup. Turns that need retrieval
//! check the gate and answer with the not-ready message until it opens.

use super::index::KnowledgeBaseIndex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{error, info};

#[derive(Debug, Clone)]
pub enum IndexStatus {
    Building,
    Ready(Arc<KnowledgeBaseIndex>),
    Failed(String),
}

impl IndexStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, IndexStatus::Ready(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            IndexStatus::Building => "building",
            IndexStatus::Ready(_) => "ready",
            IndexStatus::Failed(_) => "failed",
        }
    }
}

/// Reason published when the publisher goes away before the build finishes.
pub const ABORTED_REASON: &str = "index build aborted";

/// Write side of the gate. Held by whoever builds the index.
///
/// Dropping it while the gate still reads `Building` publishes
/// `Failed(ABORTED_REASON)`.
#[derive(Debug)]
pub struct IndexPublisher {
    tx: watch::Sender<IndexStatus>,
}

impl IndexPublisher {
    pub fn ready(&self, index: KnowledgeBaseIndex) {
        info!("Knowledge index published ({} entries)", index.len());
        self.tx.send_replace(IndexStatus::Ready(Arc::new(index)));
    }

    pub fn failed(&self, reason: impl Into<String>) {
        let reason = reason.into();
        error!("Knowledge index build failed: {}", reason);
        self.tx.send_replace(IndexStatus::Failed(reason));
    }
}

impl Drop for IndexPublisher {
    // A build task that panics or is cancelled drops its publisher mid-build.
    fn drop(&mut self) {
        let building = matches!(*self.tx.borrow(), IndexStatus::Building);
        if building {
            self.failed(ABORTED_REASON);
        }
    }
}

/// Read side of the gate. Cheap to clone.
#[derive(Debug, Clone)]
pub struct IndexReadiness {
    rx: watch::Receiver<IndexStatus>,
}

/// Create a gate in the `Building` state.
pub fn readiness_channel() -> (IndexPublisher, IndexReadiness) {
    let (tx, rx) = watch::channel(IndexStatus::Building);
    (IndexPublisher { tx }, IndexReadiness { rx })
}

impl IndexReadiness {
    /// A gate that is already open.
    pub fn ready(index: KnowledgeBaseIndex) -> Self {
        let (_tx, rx) = watch::channel(IndexStatus::Ready(Arc::new(index)));
        Self { rx }
    }

    pub fn status(&self) -> IndexStatus {
        self.rx.borrow().clone()
    }

    /// The index, if the gate is open.
    pub fn index(&self) -> Option<Arc<KnowledgeBaseIndex>> {
        match &*self.rx.borrow() {
            IndexStatus::Ready(index) => Some(index.clone()),
            _ => None,
        }
    }

    /// Wait until the build finishes either way.
    pub async fn settled(&self) -> IndexStatus {
        let mut rx = self.rx.clone();
        let settled = rx
            .wait_for(|status| !matches!(status, IndexStatus::Building))
            .await
            .map(|status| status.clone());
        match settled {
            Ok(status) => status,
            Err(_) => rx.borrow().clone(),
        }
    }
}
