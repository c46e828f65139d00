//! Environment-driven configuration.
//!
//! A `.env` file in the working directory is loaded first; real environment
//! variables win over it.

use crate::brain::CategoryTable;
use crate::error::AppError;
use crate::fs_manager::PortablePathManager;
use crate::knowledge::{KnowledgeBase, DEFAULT_TOP_K};
use crate::models::ModelConfig;
use crate::telemetry::LogFormat;
use dotenv::dotenv;
use serde::Serialize;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::debug;
use validator::Validate;

pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
pub const COMPLETION_URL_ENV: &str = "SAATHI_COMPLETION_URL";
pub const MODEL_ENV: &str = "SAATHI_MODEL";
pub const TEMPERATURE_ENV: &str = "SAATHI_TEMPERATURE";
pub const MAX_TOKENS_ENV: &str = "SAATHI_MAX_TOKENS";
pub const TIMEOUT_ENV: &str = "SAATHI_COMPLETION_TIMEOUT_SECS";
pub const RETRIEVAL_K_ENV: &str = "SAATHI_RETRIEVAL_K";
pub const KNOWLEDGE_PATH_ENV: &str = "SAATHI_KNOWLEDGE_PATH";
pub const CATEGORIES_PATH_ENV: &str = "SAATHI_CATEGORIES_PATH";
pub const LOG_FORMAT_ENV: &str = "SAATHI_LOG_FORMAT";

#[derive(Debug, Clone, Serialize, Validate)]
pub struct RetrievalConfig {
    /// Entries handed to the prompt per generated turn.
    #[validate(range(min = 1, max = 20))]
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: DEFAULT_TOP_K }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub retrieval: RetrievalConfig,
    /// JSON knowledge base; the built-in set is used when absent.
    pub knowledge_path: Option<PathBuf>,
    /// JSON category table; the built-in table is used when absent.
    pub categories_path: Option<PathBuf>,
    pub paths: PortablePathManager,
    pub log_format: LogFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            retrieval: RetrievalConfig::default(),
            knowledge_path: None,
            categories_path: None,
            paths: PortablePathManager::from_env(),
            log_format: LogFormat::default(),
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_var<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(key) {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|e| AppError::Config(format!("{} = '{}' is invalid: {}", key, raw, e))),
        None => Ok(default),
    }
}

impl AppConfig {
    /// Read and validate the configuration from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenv().ok();

        let defaults = ModelConfig::default();
        let model = ModelConfig {
            endpoint: var(COMPLETION_URL_ENV).unwrap_or(defaults.endpoint),
            model_id: var(MODEL_ENV).unwrap_or(defaults.model_id),
            temperature: parse_var(TEMPERATURE_ENV, defaults.temperature)?,
            max_tokens: parse_var(MAX_TOKENS_ENV, defaults.max_tokens)?,
            timeout_secs: parse_var(TIMEOUT_ENV, defaults.timeout_secs)?,
            api_key: var(API_KEY_ENV),
        };

        let config = Self {
            model,
            retrieval: RetrievalConfig {
                top_k: parse_var(RETRIEVAL_K_ENV, DEFAULT_TOP_K)?,
            },
            knowledge_path: var(KNOWLEDGE_PATH_ENV).map(PathBuf::from),
            categories_path: var(CATEGORIES_PATH_ENV).map(PathBuf::from),
            paths: PortablePathManager::from_env(),
            log_format: parse_var(LOG_FORMAT_ENV, LogFormat::default())?,
        };

        config.validate()?;
        debug!(
            "Configuration loaded (model: {}, k: {}, api key set: {})",
            config.model.model_id,
            config.retrieval.top_k,
            config.has_api_key()
        );
        Ok(config)
    }

    /// Field-range checks plus a scheme check on the endpoint.
    pub fn validate(&self) -> Result<(), AppError> {
        self.model.validate()?;
        self.retrieval.validate()?;

        let endpoint = url::Url::parse(&self.model.endpoint)?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(AppError::Config(format!(
                "Completion endpoint must be http(s), got '{}'",
                endpoint.scheme()
            )));
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.model.api_key.is_some()
    }

    /// The configured knowledge base, or the built-in one.
    pub fn load_knowledge(&self) -> Result<KnowledgeBase, AppError> {
        match &self.knowledge_path {
            Some(path) => KnowledgeBase::load(path),
            None => Ok(KnowledgeBase::builtin()),
        }
    }

    /// The configured category table, or the built-in one.
    pub fn load_categories(&self) -> Result<CategoryTable, AppError> {
        match &self.categories_path {
            Some(path) => CategoryTable::load(path),
            None => Ok(CategoryTable::default()),
        }
    }
}
