//! HTTP route handlers.

pub mod analyze;
pub mod health;
pub mod index;

pub use analyze::analyze;
pub use health::{HealthResponse, health};
pub use index::{index, not_found};
