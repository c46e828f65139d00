//! Configuration Tests
//!
//! `AppConfig::from_env` under controlled environments.

use crate::config::*;
use crate::error::AppError;
use crate::fs_manager::DATA_DIR_ENV;
use crate::models::{DEFAULT_COMPLETION_URL, DEFAULT_MODEL_ID};
use crate::telemetry::LogFormat;
use std::path::Path;

const ALL_VARS: &[&str] = &[
    API_KEY_ENV,
    COMPLETION_URL_ENV,
    MODEL_ENV,
    TEMPERATURE_ENV,
    MAX_TOKENS_ENV,
    TIMEOUT_ENV,
    RETRIEVAL_K_ENV,
    KNOWLEDGE_PATH_ENV,
    CATEGORIES_PATH_ENV,
    LOG_FORMAT_ENV,
    DATA_DIR_ENV,
];

/// Runs `f` with every config variable unset except `set`.
fn with_env<F: FnOnce()>(set: &[(&str, &str)], f: F) {
    let vars: Vec<(&str, Option<&str>)> = ALL_VARS
        .iter()
        .map(|key| {
            let value = set.iter().find(|(k, _)| k == key).map(|(_, v)| *v);
            (*key, value)
        })
        .collect();
    temp_env::with_vars(vars, f);
}

#[test]
fn test_defaults_when_nothing_is_set() {
    with_env(&[], || {
        let config = AppConfig::from_env().unwrap();

        assert_eq!(config.model.endpoint, DEFAULT_COMPLETION_URL);
        assert_eq!(config.model.model_id, DEFAULT_MODEL_ID);
        assert_eq!(config.model.temperature, 0.7);
        assert_eq!(config.model.max_tokens, 180);
        assert_eq!(config.model.timeout_secs, 30);
        assert_eq!(config.retrieval.top_k, 3);
        assert!(!config.has_api_key());
        assert!(config.knowledge_path.is_none());
        assert_eq!(config.log_format, LogFormat::Pretty);
    });
}

#[test]
fn test_reads_every_variable() {
    with_env(
        &[
            (API_KEY_ENV, "sk-or-test"),
            (COMPLETION_URL_ENV, "http://localhost:8080/v1/chat/completions"),
            (MODEL_ENV, "meta-llama/llama-3-8b-instruct"),
            (TEMPERATURE_ENV, "0.4"),
            (MAX_TOKENS_ENV, "256"),
            (TIMEOUT_ENV, "12"),
            (RETRIEVAL_K_ENV, "2"),
            (KNOWLEDGE_PATH_ENV, "/etc/saathi/kb.json"),
            (CATEGORIES_PATH_ENV, "/etc/saathi/categories.json"),
            (LOG_FORMAT_ENV, "json"),
            (DATA_DIR_ENV, "/var/lib/saathi"),
        ],
        || {
            let config = AppConfig::from_env().unwrap();

            assert_eq!(config.model.api_key.as_deref(), Some("sk-or-test"));
            assert_eq!(config.model.endpoint, "http://localhost:8080/v1/chat/completions");
            assert_eq!(config.model.model_id, "meta-llama/llama-3-8b-instruct");
            assert_eq!(config.model.temperature, 0.4);
            assert_eq!(config.model.max_tokens, 256);
            assert_eq!(config.model.timeout_secs, 12);
            assert_eq!(config.retrieval.top_k, 2);
            assert_eq!(config.knowledge_path.as_deref(), Some(Path::new("/etc/saathi/kb.json")));
            assert_eq!(
                config.categories_path.as_deref(),
                Some(Path::new("/etc/saathi/categories.json"))
            );
            assert_eq!(config.log_format, LogFormat::Json);
            assert_eq!(config.paths.data_dir(), Path::new("/var/lib/saathi"));
            assert!(config
                .paths
                .embeddings_dir()
                .ends_with(Path::new("models").join("embeddings")));
        },
    );
}

#[test]
fn test_blank_api_key_counts_as_missing() {
    with_env(&[(API_KEY_ENV, "   ")], || {
        assert!(!AppConfig::from_env().unwrap().has_api_key());
    });
}

#[test]
fn test_rejects_out_of_range_values() {
    for (key, value) in [
        (TEMPERATURE_ENV, "2.5"),
        (RETRIEVAL_K_ENV, "0"),
        (RETRIEVAL_K_ENV, "50"),
        (MAX_TOKENS_ENV, "0"),
        (TIMEOUT_ENV, "0"),
    ] {
        with_env(&[(key, value)], || {
            let result = AppConfig::from_env();
            assert!(
                matches!(result, Err(AppError::Config(_))),
                "{} = {} should be rejected",
                key,
                value
            );
        });
    }
}

#[test]
fn test_rejects_unparseable_values() {
    with_env(&[(TEMPERATURE_ENV, "warm")], || {
        let err = AppConfig::from_env().unwrap_err();
        assert!(err.to_string().contains(TEMPERATURE_ENV));
    });
    with_env(&[(LOG_FORMAT_ENV, "xml")], || {
        assert!(AppConfig::from_env().is_err());
    });
}

#[test]
fn test_rejects_bad_endpoint() {
    with_env(&[(COMPLETION_URL_ENV, "not a url")], || {
        assert!(AppConfig::from_env().is_err());
    });
}
