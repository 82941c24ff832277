//! Sigo civic engagement backend
//!
//! This library provides the storage-backed core of a civic engagement
//! service: venues, organizations, recurring events and czar applications,
//! with slug assignment, address geocoding and recurrence-window queries.

pub mod config;
pub mod database;
pub mod models;
pub mod recurrence;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{Result, SigoError};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use recurrence::{DateWindow, Recurrence};
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
