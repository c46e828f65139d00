//! Test Module
//!
//! Suites exercising the crate through its public seams.
//!
//! ## Test Categories
//! - `brain_tests`: crisis, intent, category and style rules over realistic input
//! - `knowledge_tests`: knowledge-base loading and index build/retrieval
//! - `pipeline_tests`: end-to-end routing with mock actors
//! - `actor_tests`: embedding and completion actors behind their traits
//! - `supervisor_tests`: startup index build, readiness and concurrent turns
//! - `config_tests`: environment-driven configuration

pub mod mocks;

pub mod brain_tests;
pub mod config_tests;
