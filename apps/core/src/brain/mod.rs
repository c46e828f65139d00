//! # Brain Module
//!
//! Fast, non-LLM analysis of a user turn, run BEFORE any external call.
//!
//! ## Components
//! - `crisis`: self-harm phrase detection (hard override)
//! - `intent`: noise vs. emotional content
//! - `category`: topical bucket scoping retrieval
//! - `style`: reply register (primary vs. code-mixed)
//! - `keywords`: case-insensitive keyword tables shared by the above
//! - `replies`: canned pools and fixed texts

pub mod category;
pub mod crisis;
pub mod intent;
pub mod keywords;
pub mod replies;
pub mod style;

pub use category::{Category, CategoryClassifier, CategoryRule, CategoryTable, GENERAL_SUPPORT};
pub use crisis::CrisisDetector;
pub use intent::{Intent, IntentClassifier, IntentResult, IntentTables};
pub use keywords::KeywordSet;
pub use replies::{CannedReplies, RandomPicker, ReplyPicker};
pub use style::{LanguageStyleDetector, Style};
