//! Crisis detection.
//!
//! Highest-priority gate: a hit overrides every other route, and the turn is
//! answered with the fixed safety message without touching the embedder or the
//! completion service. False positives are accepted.

use super::keywords::KeywordSet;
use crate::error::AppError;
use std::sync::LazyLock;

/// Default self-harm indicators.
pub const DEFAULT_CRISIS_PHRASES: &[&str] = &[
    "suicide",
    "kill myself",
    "want to die",
    "hurt myself",
    "self harm",
    "self-harm",
    "end it all",
    "end my life",
];

// NOTE: escaped literals always compile; expect() is acceptable for a static table.
static DEFAULT_PHRASES: LazyLock<KeywordSet> = LazyLock::new(|| {
    KeywordSet::new(DEFAULT_CRISIS_PHRASES).expect("Invalid crisis phrase table")
});

/// Scans raw text for self-harm indicators.
#[derive(Debug, Clone)]
pub struct CrisisDetector {
    phrases: KeywordSet,
}

impl Default for CrisisDetector {
    fn default() -> Self {
        Self {
            phrases: DEFAULT_PHRASES.clone(),
        }
    }
}

impl CrisisDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a detector over a custom phrase table.
    pub fn with_phrases<I, S>(phrases: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self {
            phrases: KeywordSet::new(phrases)?,
        })
    }

    /// True if `text` contains any crisis phrase, in any case.
    pub fn detect(&self, text: &str) -> bool {
        self.phrases.matches(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_every_default_phrase_in_any_case() {
        let detector = CrisisDetector::new();
        for phrase in DEFAULT_CRISIS_PHRASES {
            assert!(detector.detect(phrase), "lowercase '{}'", phrase);
            assert!(detector.detect(&phrase.to_uppercase()), "uppercase '{}'", phrase);
            assert!(
                detector.detect(&format!("lately I think about {} a lot", phrase)),
                "embedded '{}'",
                phrase
            );
        }
    }

    #[test]
    fn test_ordinary_text_is_not_a_crisis() {
        let detector = CrisisDetector::new();
        assert!(!detector.detect("exam stress is killing me"));
        assert!(!detector.detect("I feel a bit low today"));
        assert!(!detector.detect(""));
    }

    #[test]
    fn test_custom_phrases() {
        let detector = CrisisDetector::with_phrases(["khatam karna hai"]).unwrap();
        assert!(detector.detect("Sab khatam karna hai"));
        assert!(!detector.detect("suicide"));
    }
}
