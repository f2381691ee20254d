//! Core types and shared functionality for wwjs.
//!
//! This crate provides:
//! - Page description model and request sanitizer
//! - Supported languages and their prompt templates
//! - In-memory TTL cache for generated analyses
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod language;
pub mod page;
pub mod response;

pub use cache::{ANALYSIS_TTL, AnalysisCache, CacheStats, cache_key};
pub use config::{AppConfig, ConfigError, Environment};
pub use error::Error;
pub use language::{Language, Messages};
pub use page::{PageDescription, SanitizedPageDescription, sanitize};
pub use response::AnalyzeResponse;
