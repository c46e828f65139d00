//! Saathi core: routing, retrieval and prompt assembly for a student
//! wellness companion.

pub mod actors;
pub mod brain;
pub mod config;
pub mod error;
pub mod fs_manager;
pub mod knowledge;
pub mod models;
pub mod pipeline;
pub mod preflight;
pub mod prompt;
pub mod telemetry;

pub use config::AppConfig;
pub use error::AppError;
pub use pipeline::{ResponsePipeline, Route, TurnOutcome};

#[cfg(test)]
mod tests;
