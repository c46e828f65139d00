//! Fixed and canned replies.
//!
//! Non-emotional intents are answered from a small pool, chosen uniformly at
//! random through a [`ReplyPicker`] so tests can pin the choice. The crisis,
//! fallback and not-ready texts are fixed.

use super::intent::Intent;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

pub const CRISIS_MESSAGE: &str = "🚨 Your safety matters.

Please reach out immediately:
• Crisis Text Line: Text HOME to 741741
• Suicide Prevention Lifeline: call or text 988

You don't have to face this alone. 💜";

pub const FALLBACK_MESSAGE: &str = "Lagta hai thodi technical problem aa gayi. Par koi baat nahi — hum baat continue kar sakte hain. Batao?";

pub const NOT_READY_MESSAGE: &str = "I'm still getting ready on my side. Give me a moment and tell me again what's on your mind?";

const GREETING_POOL: &[&str] = &[
    "Hey, I'm really glad you're here. How are you feeling today?",
    "Hi! This is a safe space. What's on your mind?",
    "Hello 💜 Take your time. How has your day been?",
];

const CONFUSION_POOL: &[&str] = &[
    "Sorry, I may not have been clear. Could you tell me a little more about what you're going through?",
    "Koi baat nahi, let's slow down. What would you like to talk about?",
    "That's okay. Can you share what's been bothering you, in your own words?",
];

const ABUSE_POOL: &[&str] = &[
    "I can hear that you're frustrated. I'm still here if you want to talk about what's going on.",
    "It sounds like things are really hard right now. I'm listening whenever you're ready.",
];

const LOW_INFO_POOL: &[&str] = &[
    "I'm listening. Could you tell me a bit more?",
    "Hmm, tell me more. What's been happening?",
    "I'd like to understand better. How are you feeling about it?",
];

/// Source of uniform choices over a non-empty pool.
pub trait ReplyPicker: Send + Sync {
    /// Returns an index in `0..len`. `len` is never zero.
    fn pick_index(&self, len: usize) -> usize;
}

/// `StdRng`-backed picker; seedable for reproducible runs.
pub struct RandomPicker {
    rng: Mutex<StdRng>,
}

impl RandomPicker {
    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for RandomPicker {
    fn default() -> Self {
        Self::from_entropy()
    }
}

impl ReplyPicker for RandomPicker {
    fn pick_index(&self, len: usize) -> usize {
        match self.rng.lock() {
            Ok(mut rng) => rng.gen_range(0..len),
            // Poisoned: the RNG state itself is still valid.
            Err(poisoned) => poisoned.into_inner().gen_range(0..len),
        }
    }
}

/// Reply texts for every non-generated route.
#[derive(Debug, Clone)]
pub struct CannedReplies {
    pub greeting: Vec<String>,
    pub confusion: Vec<String>,
    pub abuse: Vec<String>,
    pub low_info: Vec<String>,
    pub crisis: String,
    pub fallback: String,
    pub not_ready: String,
}

fn owned(pool: &[&str]) -> Vec<String> {
    pool.iter().map(|s| s.to_string()).collect()
}

impl Default for CannedReplies {
    fn default() -> Self {
        Self {
            greeting: owned(GREETING_POOL),
            confusion: owned(CONFUSION_POOL),
            abuse: owned(ABUSE_POOL),
            low_info: owned(LOW_INFO_POOL),
            crisis: CRISIS_MESSAGE.to_string(),
            fallback: FALLBACK_MESSAGE.to_string(),
            not_ready: NOT_READY_MESSAGE.to_string(),
        }
    }
}

impl CannedReplies {
    /// The pool for a canned intent; empty for `Emotional`.
    pub fn pool(&self, intent: Intent) -> &[String] {
        match intent {
            Intent::Greeting => &self.greeting,
            Intent::Confusion => &self.confusion,
            Intent::Abuse => &self.abuse,
            Intent::LowInfo => &self.low_info,
            Intent::Emotional => &[],
        }
    }

    /// Pick one reply for `intent`. An empty pool falls back to the low-info pool,
    /// then to the fixed fallback text.
    pub fn pick(&self, intent: Intent, picker: &dyn ReplyPicker) -> &str {
        let pool = match self.pool(intent) {
            [] => self.low_info.as_slice(),
            pool => pool,
        };
        if pool.is_empty() {
            return &self.fallback;
        }
        let index = picker.pick_index(pool.len()).min(pool.len() - 1);
        &pool[index]
    }
}
