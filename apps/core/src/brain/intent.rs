//! Intent Classification using keyword tables.
//!
//! Cheap lexical classifier separating conversational noise (greetings,
//! confusion, abuse, low-information turns) from genuine emotional content.
//! No ML model required - rules are evaluated in a fixed priority order and the
//! first match wins.

use super::keywords::KeywordSet;
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Detected intent type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    /// Greeting or very short opener (hi, hello, namaste, ...)
    Greeting,
    /// The user is confused by the conversation (huh, what do you mean, ...)
    Confusion,
    /// Profanity or insults aimed at the companion
    Abuse,
    /// Too little content to respond to meaningfully
    LowInfo,
    /// Genuine emotional content - the only intent that reaches generation
    Emotional,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl Intent {
    /// Returns the snake_case label for the intent
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Confusion => "confusion",
            Intent::Abuse => "abuse",
            Intent::LowInfo => "low_info",
            Intent::Emotional => "emotional",
        }
    }

    /// True for intents answered from a canned pool.
    pub fn is_canned(&self) -> bool {
        !matches!(self, Intent::Emotional)
    }
}

/// Result of intent classification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntentResult {
    /// Detected intent
    pub intent: Intent,
    /// Keyword that triggered the rule, when a keyword rule fired
    pub matched: Option<String>,
}

pub const DEFAULT_GREETINGS: &[&str] = &[
    "hi",
    "hii",
    "hello",
    "hey",
    "heyy",
    "yo",
    "hola",
    "namaste",
    "good morning",
    "good afternoon",
    "good evening",
    "hi there",
    "hello there",
    "kaise ho",
];

pub const DEFAULT_CONFUSION_MARKERS: &[&str] = &[
    "what?",
    "huh",
    "i don't understand",
    "i dont understand",
    "what do you mean",
    "confused",
    "samajh nahi aaya",
    "kya matlab",
];

pub const DEFAULT_PROFANITY: &[&str] = &[
    "fuck",
    "shit",
    "bitch",
    "bastard",
    "asshole",
    "shut up",
    "stupid bot",
    "useless bot",
];

/// Maximum trimmed length (in characters) treated as a greeting.
pub const SHORT_TEXT_MAX_CHARS: usize = 3;
/// Maximum whitespace-token count treated as low information.
pub const LOW_INFO_MAX_TOKENS: usize = 2;

// Compile tables once at startup
// NOTE: expect() is acceptable here: escaped literal tables always compile.
static DEFAULT_TABLES: LazyLock<IntentTables> = LazyLock::new(|| IntentTables {
    greetings: KeywordSet::new(DEFAULT_GREETINGS).expect("Invalid greeting table"),
    confusion: KeywordSet::new(DEFAULT_CONFUSION_MARKERS).expect("Invalid confusion table"),
    profanity: KeywordSet::new(DEFAULT_PROFANITY).expect("Invalid profanity table"),
});

/// Keyword tables driving the intent rules.
#[derive(Debug, Clone)]
pub struct IntentTables {
    /// Matched against the whole (trimmed) text.
    pub greetings: KeywordSet,
    /// Matched as substrings.
    pub confusion: KeywordSet,
    /// Matched as substrings.
    pub profanity: KeywordSet,
}

impl Default for IntentTables {
    fn default() -> Self {
        DEFAULT_TABLES.clone()
    }
}

impl IntentTables {
    pub fn new(greetings: &[&str], confusion: &[&str], profanity: &[&str]) -> Result<Self, AppError> {
        Ok(Self {
            greetings: KeywordSet::new(greetings)?,
            confusion: KeywordSet::new(confusion)?,
            profanity: KeywordSet::new(profanity)?,
        })
    }
}

/// Intent classifier using keyword tables
#[derive(Debug, Clone, Default)]
pub struct IntentClassifier {
    tables: IntentTables,
}

impl IntentClassifier {
    /// Create a new intent classifier with the default tables
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tables(tables: IntentTables) -> Self {
        Self { tables }
    }

    /// Classify the intent of a text
    pub fn classify(&self, text: &str) -> Intent {
        self.classify_detailed(text).intent
    }

    /// Classify and report which keyword (if any) decided the rule.
    pub fn classify_detailed(&self, text: &str) -> IntentResult {
        let trimmed = text.trim();

        // 1. Very short text or an exact greeting
        let greeting_form = trimmed.trim_end_matches(['!', '.', '?']).trim_end();
        if trimmed.chars().count() <= SHORT_TEXT_MAX_CHARS
            || self.tables.greetings.matches_exactly(greeting_form)
        {
            return IntentResult {
                intent: Intent::Greeting,
                matched: None,
            };
        }

        // 2. Confusion markers
        if let Some(marker) = self.tables.confusion.find(trimmed) {
            return IntentResult {
                intent: Intent::Confusion,
                matched: Some(marker.to_lowercase()),
            };
        }

        // 3. Profanity
        if let Some(word) = self.tables.profanity.find(trimmed) {
            return IntentResult {
                intent: Intent::Abuse,
                matched: Some(word.to_lowercase()),
            };
        }

        // 4. Low information
        if trimmed.split_whitespace().count() <= LOW_INFO_MAX_TOKENS {
            return IntentResult {
                intent: Intent::LowInfo,
                matched: None,
            };
        }

        IntentResult {
            intent: Intent::Emotional,
            matched: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_greeting_detection() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("hi"), Intent::Greeting);
        assert_eq!(classifier.classify("Hello!"), Intent::Greeting);
        assert_eq!(classifier.classify("  GOOD MORNING  "), Intent::Greeting);
        assert_eq!(classifier.classify("ok"), Intent::Greeting);
        assert_eq!(classifier.classify(""), Intent::Greeting);
    }

    #[test]
    fn test_confusion_detection() {
        let classifier = IntentClassifier::new();

        let result = classifier.classify_detailed("Sorry, what do you mean by that");
        assert_eq!(result.intent, Intent::Confusion);
        assert_eq!(result.matched.as_deref(), Some("what do you mean"));
    }

    #[test]
    fn test_abuse_detection() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("shut up you useless thing"), Intent::Abuse);
    }

    #[test]
    fn test_low_info_detection() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("feeling meh"), Intent::LowInfo);
        assert_eq!(classifier.classify("whatever"), Intent::LowInfo);
    }

    #[test]
    fn test_emotional_detection() {
        let classifier = IntentClassifier::new();

        assert_eq!(classifier.classify("exam stress is killing me"), Intent::Emotional);
        assert_eq!(classifier.classify("I feel so alone these days"), Intent::Emotional);
    }

    #[test]
    fn test_priority_order() {
        let classifier = IntentClassifier::new();

        // Confusion outranks abuse and low-info
        assert_eq!(classifier.classify("huh shit"), Intent::Confusion);
        // Abuse outranks low-info
        assert_eq!(classifier.classify("fuck this"), Intent::Abuse);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Intent::LowInfo.to_string(), "low_info");
        assert!(Intent::Abuse.is_canned());
        assert!(!Intent::Emotional.is_canned());
    }
}
