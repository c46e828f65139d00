//! # Actors
//!
//! - `embedder`: owns the local sentence-embedding model
//! - `llm`: talks to the remote chat-completion service
//! - `supervisor`: owns both, builds the knowledge index and serves turns

pub mod embedder;
pub mod llm;
pub mod messages;
pub mod supervisor;
pub mod traits;
