pub mod entries;
pub mod index;
pub mod readiness;

pub use entries::{KnowledgeBase, KnowledgeEntry};
pub use index::{cosine_similarity, EmbeddedEntry, KnowledgeBaseIndex, ScoredEntry, DEFAULT_TOP_K};
pub use readiness::{readiness_channel, IndexPublisher, IndexReadiness, IndexStatus, ABORTED_REASON};
