//! Knowledge-base entries: static configuration loaded once at startup.

use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// One grounding snippet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeEntry {
    /// Unique across the knowledge base.
    pub id: String,
    /// Bucket label; matched exactly against the detected category.
    pub category: String,
    /// Snippet handed to the completion service as background context.
    pub text: String,
}

impl KnowledgeEntry {
    pub fn new(id: impl Into<String>, category: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            category: category.into(),
            text: text.into(),
        }
    }
}

const BUILTIN_ENTRIES: &[(&str, &str, &str)] = &[
    (
        "academic_stress_1",
        "stress_academic",
        "Academic stress often comes from fear of failure, constant evaluation, and time pressure. Many students experience this, and it does not define intelligence or worth.",
    ),
    (
        "academic_stress_2",
        "stress_academic",
        "When academic demands feel overwhelming, the brain can enter a threat response, making concentration and motivation harder.",
    ),
    (
        "academic_stress_3",
        "stress_academic",
        "Breaking study time into short, fixed blocks with small breaks can make a large workload feel less threatening.",
    ),
    (
        "anxiety_1",
        "anxiety_worry",
        "Anxiety is the nervous system reacting to perceived danger. Even without real danger, the body can respond strongly.",
    ),
    (
        "anxiety_2",
        "anxiety_worry",
        "Slow breathing with a longer exhale signals safety to the body and can soften the physical wave of panic.",
    ),
    (
        "sadness_1",
        "sadness_depression",
        "Feelings of sadness or emptiness can happen when emotional needs go unmet or after prolonged stress. These feelings are common and temporary.",
    ),
    (
        "self_esteem_1",
        "self_esteem",
        "Negative self-talk often develops from repeated comparison or criticism and does not reflect objective truth.",
    ),
];

/// Validated, ordered set of entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeBase {
    entries: Vec<KnowledgeEntry>,
}

impl KnowledgeBase {
    /// Validate and wrap entries, keeping their order.
    ///
    /// Rejects duplicate ids, blank ids, blank categories and blank texts.
    pub fn from_entries(entries: Vec<KnowledgeEntry>) -> Result<Self, AppError> {
        let mut seen = HashSet::with_capacity(entries.len());
        for entry in &entries {
            if entry.id.trim().is_empty() {
                return Err(AppError::Validation("Knowledge entry with empty id".to_string()));
            }
            if entry.category.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "Knowledge entry '{}' has an empty category",
                    entry.id
                )));
            }
            if entry.text.trim().is_empty() {
                return Err(AppError::Validation(format!(
                    "Knowledge entry '{}' has empty text",
                    entry.id
                )));
            }
            if !seen.insert(entry.id.as_str()) {
                return Err(AppError::Validation(format!(
                    "Duplicate knowledge entry id '{}'",
                    entry.id
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Load from a JSON array of `{id, category, text}` records.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let entries: Vec<KnowledgeEntry> = serde_json::from_str(&raw)?;
        let base = Self::from_entries(entries)?;
        info!("Loaded {} knowledge entries from {:?}", base.len(), path);
        Ok(base)
    }

    /// The knowledge base compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ENTRIES
                .iter()
                .map(|(id, category, text)| KnowledgeEntry::new(*id, *category, *text))
                .collect(),
        }
    }

    pub fn entries(&self) -> &[KnowledgeEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<KnowledgeEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
