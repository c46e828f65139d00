//! Knowledge-base index: entries paired with their embeddings.
//!
//! Built once, read-only afterwards, shared across turns behind an `Arc`.
//! Retrieval is a linear scan; the base holds tens of entries.

use crate::actors::traits::EmbeddingActor;
use crate::error::AppError;
use crate::knowledge::entries::{KnowledgeBase, KnowledgeEntry};
use tracing::{info, warn};

/// Default number of entries handed to the prompt.
pub const DEFAULT_TOP_K: usize = 3;

/// Entries are embedded in batches of this size during the build.
const BUILD_BATCH_SIZE: usize = 16;

/// A knowledge entry with its vector.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedEntry {
    pub entry: KnowledgeEntry,
    pub vector: Vec<f32>,
}

/// One retrieval hit. `score` is a cosine similarity in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEntry<'a> {
    pub entry: &'a EmbeddedEntry,
    pub score: f32,
}

impl ScoredEntry<'_> {
    pub fn id(&self) -> &str {
        &self.entry.entry.id
    }

    pub fn text(&self) -> &str {
        &self.entry.entry.text
    }
}

/// Calculate cosine similarity between two vectors.
///
/// Symmetric, and exactly 1.0 for a vector against itself. Returns 0.0 for
/// mismatched lengths, empty input, or a zero-norm vector.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_sq_a: f32 = a.iter().map(|x| x * x).sum();
    let norm_sq_b: f32 = b.iter().map(|x| x * x).sum();

    if norm_sq_a == 0.0 || norm_sq_b == 0.0 {
        return 0.0;
    }

    // One square root over the product: exact 1.0 for a self-pair, and
    // bit-identical when the arguments are swapped.
    (dot_product / (norm_sq_a * norm_sq_b).sqrt()).clamp(-1.0, 1.0)
}

#[derive(Debug, Clone)]
pub struct KnowledgeBaseIndex {
    entries: Vec<EmbeddedEntry>,
    dimension: usize,
}

impl KnowledgeBaseIndex {
    /// Embed every entry and build the index.
    ///
    /// Any embedding failure, or vectors of differing length, fails the whole build.
    pub async fn build<E>(base: KnowledgeBase, embedder: &E) -> Result<Self, AppError>
    where
        E: EmbeddingActor + ?Sized,
    {
        let entries = base.into_entries();
        info!("Building knowledge index over {} entries", entries.len());

        let mut vectors: Vec<Vec<f32>> = Vec::with_capacity(entries.len());
        for batch in entries.chunks(BUILD_BATCH_SIZE) {
            let texts: Vec<String> = batch.iter().map(|e| e.text.clone()).collect();
            let expected = texts.len();
            let batch_vectors = embedder.embed_batch(texts).await?;
            if batch_vectors.len() != expected {
                return Err(AppError::Validation(format!(
                    "Embedder returned {} vectors for {} texts",
                    batch_vectors.len(),
                    expected
                )));
            }
            vectors.extend(batch_vectors);
        }

        let embedded = entries
            .into_iter()
            .zip(vectors)
            .map(|(entry, vector)| EmbeddedEntry { entry, vector })
            .collect();

        let index = Self::from_embedded(embedded)?;
        info!(
            "Knowledge index ready: {} entries, dimension {}",
            index.len(),
            index.dimension()
        );
        Ok(index)
    }

    /// Assemble an index from precomputed vectors, checking they share one dimension.
    pub fn from_embedded(entries: Vec<EmbeddedEntry>) -> Result<Self, AppError> {
        let dimension = entries.first().map(|e| e.vector.len()).unwrap_or(0);
        if !entries.is_empty() && dimension == 0 {
            return Err(AppError::Validation("Embedder returned an empty vector".to_string()));
        }
        if let Some(bad) = entries.iter().find(|e| e.vector.len() != dimension) {
            return Err(AppError::Validation(format!(
                "Entry '{}' has dimension {}, expected {}",
                bad.entry.id,
                bad.vector.len(),
                dimension
            )));
        }
        if entries.is_empty() {
            warn!("Knowledge index is empty; every turn will run without context");
        }
        Ok(Self { entries, dimension })
    }

    /// Top-`k` entries of `category` by cosine similarity to `query`.
    ///
    /// Results are in non-increasing score order; equal scores keep insertion
    /// order. Fewer than `k` (or none) is a normal result.
    pub fn retrieve(&self, query: &[f32], category: &str, k: usize) -> Result<Vec<ScoredEntry<'_>>, AppError> {
        if !self.entries.is_empty() && query.len() != self.dimension {
            return Err(AppError::Validation(format!(
                "Query vector has dimension {}, index expects {}",
                query.len(),
                self.dimension
            )));
        }

        let mut scored: Vec<ScoredEntry<'_>> = self
            .entries
            .iter()
            .filter(|e| e.entry.category == category)
            .map(|e| ScoredEntry {
                entry: e,
                score: cosine_similarity(query, &e.vector),
            })
            .collect();

        // sort_by is stable: ties keep insertion order
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(k);
        Ok(scored)
    }

    /// Number of entries tagged with `category`.
    pub fn count_in(&self, category: &str) -> usize {
        self.entries.iter().filter(|e| e.entry.category == category).count()
    }

    pub fn entries(&self) -> &[EmbeddedEntry] {
        &self.entries
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
