//! Keyword tables.
//!
//! Every lexical classifier in the brain is a pure function over one of these
//! tables. A table is compiled once into a single case-insensitive regex
//! alternation of escaped literals, which keeps plain substring semantics
//! ("exam" matches "exams") while scanning the text only once.

use crate::error::AppError;
use regex::{Regex, RegexBuilder};

/// A case-insensitive set of literal phrases.
#[derive(Debug, Clone)]
pub struct KeywordSet {
    keywords: Vec<String>,
    matcher: Option<Regex>,
}

impl KeywordSet {
    /// Compile a keyword list. Blank entries are dropped; an empty list never matches.
    pub fn new<I, S>(keywords: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords: Vec<String> = keywords
            .into_iter()
            .map(|k| k.as_ref().trim().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let matcher = if keywords.is_empty() {
            None
        } else {
            let alternation = keywords
                .iter()
                .map(|k| regex::escape(k))
                .collect::<Vec<_>>()
                .join("|");
            Some(RegexBuilder::new(&alternation).case_insensitive(true).build()?)
        };

        Ok(Self { keywords, matcher })
    }

    /// True if `text` contains any keyword, ignoring case.
    pub fn matches(&self, text: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(text))
    }

    /// The first keyword occurrence in `text`, as written in the text.
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.matcher.as_ref()?.find(text).map(|m| m.as_str())
    }

    /// True if the whole of `text` equals one of the keywords, ignoring case.
    pub fn matches_exactly(&self, text: &str) -> bool {
        let lowered = text.to_lowercase();
        self.keywords.iter().any(|k| *k == lowered)
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}
