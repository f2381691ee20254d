//! In-memory cache for generated analyses.
//!
//! This module provides a process-wide, TTL-bounded memo of upstream
//! responses. It supports:
//!
//! - Fixed-width cache keys derived from language and URL (SHA-256)
//! - Lock-sharded concurrent access via `dashmap`
//! - Lazy expiry on read plus an explicit sweep
//! - Full flush and hit/miss statistics

pub mod hash;
pub mod store;

pub use hash::{MAX_KEY_CHARS, cache_key};
pub use store::{ANALYSIS_TTL, AnalysisCache, CacheStats};
