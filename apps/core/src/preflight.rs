//! Preflight Check System
//!
//! Verifies configuration, data files and the embedding model before the
//! chat loop starts. `saathi --check` prints the report and exits.

use crate::actors::embedder::load_local_model;
use crate::actors::embedder::TextEncoder;
use crate::config::{AppConfig, API_KEY_ENV};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Result of a single check
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub name: String,
    pub passed: bool,
    pub message: String,
    pub details: Option<String>,
}

impl CheckResult {
    fn pass(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            message: message.to_string(),
            details: None,
        }
    }

    fn fail(name: &str, message: &str, details: Option<String>) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            message: message.to_string(),
            details,
        }
    }
}

/// Complete preflight check report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreflightReport {
    pub all_passed: bool,
    pub checks: Vec<CheckResult>,
    pub ready_to_start: bool,
    pub summary: String,
}

impl PreflightReport {
    fn from_checks(checks: Vec<CheckResult>) -> Self {
        let all_passed = checks.iter().all(|c| c.passed);
        let critical_passed = checks
            .iter()
            .filter(|c| is_critical_check(&c.name))
            .all(|c| c.passed);

        let summary = if all_passed {
            "All checks passed. System ready.".to_string()
        } else if critical_passed {
            "Some non-critical checks failed. System can start with warnings.".to_string()
        } else {
            "Critical checks failed. System cannot start.".to_string()
        };

        for check in &checks {
            if check.passed {
                info!("  ✅ {}: {}", check.name, check.message);
            } else {
                warn!("  ❌ {}: {}", check.name, check.message);
                if let Some(details) = &check.details {
                    warn!("      Details: {}", details);
                }
            }
        }
        info!("Summary: {}", summary);

        Self {
            all_passed,
            checks,
            ready_to_start: critical_passed,
            summary,
        }
    }

    pub fn check(&self, name: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.name == name)
    }
}

/// Runs every check, including a real load of the embedding model.
pub async fn run_preflight_checks(config: &AppConfig) -> PreflightReport {
    info!("Running preflight checks");

    let mut checks = quick_checks(config);

    let dirs_ok = checks.iter().any(|c| c.name == "directories" && c.passed);
    if dirs_ok {
        checks.push(check_embeddings_load(config).await);
    } else {
        checks.push(CheckResult::fail(
            "embeddings_load",
            "Skipped - data directory unavailable",
            None,
        ));
    }

    PreflightReport::from_checks(checks)
}

/// Quick check - files and configuration only, no model load
pub fn quick_preflight_check(config: &AppConfig) -> PreflightReport {
    PreflightReport::from_checks(quick_checks(config))
}

fn quick_checks(config: &AppConfig) -> Vec<CheckResult> {
    vec![
        check_config(config),
        check_api_key(config),
        check_directories(config),
        check_knowledge_base(config),
        check_categories(config),
    ]
}

fn is_critical_check(name: &str) -> bool {
    matches!(
        name,
        "config" | "directories" | "knowledge_base" | "categories"
    )
}

// --- Individual Checks ---

fn check_config(config: &AppConfig) -> CheckResult {
    match config.validate() {
        Ok(()) => CheckResult::pass(
            "config",
            &format!(
                "Model {} at {} (k = {})",
                config.model.model_id, config.model.endpoint, config.retrieval.top_k
            ),
        ),
        Err(e) => CheckResult::fail("config", "Invalid configuration", Some(e.to_string())),
    }
}

fn check_api_key(config: &AppConfig) -> CheckResult {
    if config.has_api_key() {
        CheckResult::pass("api_key", "Completion API key is set")
    } else {
        CheckResult::fail(
            "api_key",
            "Completion API key is not set; generated replies will use the fallback text",
            Some(format!("Set {} in the environment or .env", API_KEY_ENV)),
        )
    }
}

fn check_directories(config: &AppConfig) -> CheckResult {
    match config.paths.init() {
        Ok(()) => CheckResult::pass(
            "directories",
            &format!("Data directory ready at {:?}", config.paths.data_dir()),
        ),
        Err(e) => CheckResult::fail(
            "directories",
            "Failed to create directories",
            Some(e.to_string()),
        ),
    }
}

fn check_knowledge_base(config: &AppConfig) -> CheckResult {
    let source = match &config.knowledge_path {
        Some(path) => format!("{:?}", path),
        None => "built-in set".to_string(),
    };
    match config.load_knowledge() {
        Ok(base) if base.is_empty() => CheckResult::fail(
            "knowledge_base",
            "Knowledge base is empty",
            Some(format!("Source: {}", source)),
        ),
        Ok(base) => CheckResult::pass(
            "knowledge_base",
            &format!("{} entries from {}", base.len(), source),
        ),
        Err(e) => CheckResult::fail(
            "knowledge_base",
            "Cannot load knowledge base",
            Some(e.to_string()),
        ),
    }
}

fn check_categories(config: &AppConfig) -> CheckResult {
    match config.load_categories() {
        Ok(table) => CheckResult::pass(
            "categories",
            &format!("{} categories configured", table.len()),
        ),
        Err(e) => CheckResult::fail(
            "categories",
            "Cannot load category table",
            Some(e.to_string()),
        ),
    }
}

async fn check_embeddings_load(config: &AppConfig) -> CheckResult {
    let embeddings_dir = config.paths.embeddings_dir();

    info!("Testing FastEmbed model loading...");

    let result = tokio::task::spawn_blocking(move || {
        let start = std::time::Instant::now();
        let model = load_local_model(embeddings_dir).map_err(|e| e.to_string())?;
        let embeddings = model
            .encode(vec!["test".to_string()])
            .map_err(|e| e.to_string())?;
        match embeddings.first() {
            Some(vector) if embeddings.len() == 1 && !vector.is_empty() => {
                Ok((start.elapsed(), vector.len()))
            }
            _ => Err(format!(
                "Unexpected embedding shape: {} vectors, {} dimensions",
                embeddings.len(),
                embeddings.first().map(|v| v.len()).unwrap_or(0)
            )),
        }
    })
    .await;

    match result {
        Ok(Ok((duration, dimension))) => CheckResult::pass(
            "embeddings_load",
            &format!("FastEmbed loaded in {:?} (dimension {})", duration, dimension),
        ),
        Ok(Err(e)) => CheckResult::fail("embeddings_load", "FastEmbed failed", Some(e)),
        Err(e) => CheckResult::fail("embeddings_load", "Task panicked", Some(e.to_string())),
    }
}
