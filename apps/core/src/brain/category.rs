//! Category classification.
//!
//! Maps emotional text to the topical bucket that scopes knowledge-base
//! retrieval. Buckets are configuration data: the first bucket (in table order)
//! with a keyword hit wins, otherwise the turn is `general_support`.

use super::keywords::KeywordSet;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;
use tracing::info;

/// Label of the fallback bucket.
pub const GENERAL_SUPPORT: &str = "general_support";

/// A topical bucket label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    pub fn general_support() -> Self {
        Self(GENERAL_SUPPORT.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_general_support(&self) -> bool {
        self.0 == GENERAL_SUPPORT
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// On-disk form of one bucket: `{"name": "...", "keywords": ["..."]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Default buckets, in priority order.
pub const DEFAULT_CATEGORIES: &[(&str, &[&str])] = &[
    ("stress_academic", &["exam", "deadline", "study", "grades"]),
    ("anxiety_worry", &["anxious", "panic", "worried"]),
    ("sadness_depression", &["sad", "empty", "hopeless"]),
    ("self_esteem", &["worthless", "stupid", "hate myself"]),
];

// NOTE: expect() is acceptable here: escaped literal tables always compile.
static DEFAULT_TABLE: LazyLock<CategoryTable> = LazyLock::new(|| {
    let rules = DEFAULT_CATEGORIES
        .iter()
        .map(|(name, keywords)| CategoryRule {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        })
        .collect();
    CategoryTable::from_rules(rules).expect("Invalid default category table")
});

/// Ordered category -> keyword table.
#[derive(Debug, Clone)]
pub struct CategoryTable {
    buckets: Vec<(Category, KeywordSet)>,
}

impl Default for CategoryTable {
    fn default() -> Self {
        DEFAULT_TABLE.clone()
    }
}

impl CategoryTable {
    /// Build a table, keeping the given order. Names must be non-empty, unique,
    /// and must not shadow the fallback bucket.
    pub fn from_rules(rules: Vec<CategoryRule>) -> Result<Self, AppError> {
        let mut buckets: Vec<(Category, KeywordSet)> = Vec::with_capacity(rules.len());
        for rule in rules {
            let name = rule.name.trim();
            if name.is_empty() {
                return Err(AppError::Validation("Category name must not be empty".to_string()));
            }
            if name == GENERAL_SUPPORT {
                return Err(AppError::Validation(format!(
                    "'{}' is the fallback bucket and cannot carry keywords",
                    GENERAL_SUPPORT
                )));
            }
            if buckets.iter().any(|(c, _)| c.as_str() == name) {
                return Err(AppError::Validation(format!("Duplicate category '{}'", name)));
            }
            buckets.push((Category::new(name), KeywordSet::new(&rule.keywords)?));
        }
        Ok(Self { buckets })
    }

    /// Load a table from a JSON array of `CategoryRule`.
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(path)?;
        let rules: Vec<CategoryRule> = serde_json::from_str(&raw)?;
        let table = Self::from_rules(rules)?;
        info!("Loaded {} categories from {:?}", table.len(), path);
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.buckets.iter().map(|(c, _)| c)
    }
}

/// Keyword-driven category classifier.
#[derive(Debug, Clone, Default)]
pub struct CategoryClassifier {
    table: CategoryTable,
}

impl CategoryClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: CategoryTable) -> Self {
        Self { table }
    }

    /// First matching bucket by table order, else `general_support`.
    pub fn classify(&self, text: &str) -> Category {
        self.table
            .buckets
            .iter()
            .find(|(_, keywords)| keywords.matches(text))
            .map(|(category, _)| category.clone())
            .unwrap_or_else(Category::general_support)
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }
}
