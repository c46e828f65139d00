//! Language style detection.
//!
//! Picks the register the reply should be written in. Purely heuristic: it only
//! tunes the tone instruction handed to the completion service.

use super::keywords::KeywordSet;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Response register
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    /// Plain English
    Primary,
    /// Hinglish: Hindi words in Latin script mixed with English
    CodeMixed,
}

impl Style {
    pub fn code(&self) -> &'static str {
        match self {
            Style::Primary => "primary",
            Style::CodeMixed => "code_mixed",
        }
    }
}

/// Romanised Hindi words that rarely occur inside English words.
pub const DEFAULT_CODE_MIXED_MARKERS: &[&str] = &[
    "yaar",
    "nahi",
    "kya",
    "mujhe",
    "bahut",
    "kuch",
    "matlab",
    "bhai",
    "hoon",
    "raha",
    "rahi",
    "lagta",
    "samajh",
    "pareshan",
    "kaise",
    "accha",
];

static DEFAULT_MARKERS: LazyLock<KeywordSet> = LazyLock::new(|| {
    KeywordSet::new(DEFAULT_CODE_MIXED_MARKERS).expect("Invalid code-mixed marker table")
});

#[derive(Debug, Clone)]
pub struct LanguageStyleDetector {
    markers: KeywordSet,
}

impl Default for LanguageStyleDetector {
    fn default() -> Self {
        Self {
            markers: DEFAULT_MARKERS.clone(),
        }
    }
}

impl LanguageStyleDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_markers<I, S>(markers: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            markers: KeywordSet::new(markers)?,
        })
    }

    pub fn detect(&self, text: &str) -> Style {
        if self.markers.matches(text) {
            Style::CodeMixed
        } else {
            Style::Primary
        }
    }
}
