//! Error handling for Sigo
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the Sigo application
#[derive(Error, Debug)]
pub enum SigoError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Geocoding error: {0}")]
    Geocoding(#[from] GeocodingError),

    #[error("Recurrence error: {0}")]
    Recurrence(#[from] RecurrenceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Venue not found: {venue_id}")]
    VenueNotFound { venue_id: i64 },

    #[error("Organization not found: {organization_id}")]
    OrganizationNotFound { organization_id: i64 },

    #[error("Event not found: {event_id}")]
    EventNotFound { event_id: i64 },

    #[error("Czar application not found: {application_id}")]
    ApplicationNotFound { application_id: i64 },

    #[error("Duplicate slug: {slug}")]
    DuplicateSlug { slug: String },

    #[error("Invalid state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Geocoding collaborator specific errors
#[derive(Error, Debug)]
pub enum GeocodingError {
    #[error("Address not found")]
    NotFound,

    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    #[error("Geocoding request timed out")]
    Timeout,

    #[error("Invalid geocoding response: {0}")]
    InvalidResponse(String),

    #[error("Geocoding service unavailable")]
    ServiceUnavailable,
}

/// Recurrence rule specific errors
#[derive(Error, Debug)]
pub enum RecurrenceError {
    #[error("Invalid recurrence rule: {0}")]
    InvalidRule(String),
}

/// Result type alias for Sigo operations
pub type Result<T> = std::result::Result<T, SigoError>;

impl SigoError {
    /// Check if the error is recoverable
    pub fn is_recoverable(&self) -> bool {
        match self {
            SigoError::Database(_) => false,
            SigoError::Migration(_) => false,
            SigoError::Geocoding(e) => e.is_transient(),
            SigoError::Recurrence(_) => false,
            SigoError::Config(_) => false,
            SigoError::VenueNotFound { .. } => false,
            SigoError::OrganizationNotFound { .. } => false,
            SigoError::EventNotFound { .. } => false,
            SigoError::ApplicationNotFound { .. } => false,
            SigoError::DuplicateSlug { .. } => true,
            SigoError::InvalidStateTransition { .. } => false,
            SigoError::Redis(_) => true,
            SigoError::Http(_) => true,
            SigoError::Serialization(_) => false,
            SigoError::Io(_) => true,
            SigoError::UrlParse(_) => false,
            SigoError::InvalidInput(_) => false,
            SigoError::ServiceUnavailable(_) => true,
        }
    }

    /// Get error severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            SigoError::Database(_) => ErrorSeverity::Critical,
            SigoError::Migration(_) => ErrorSeverity::Critical,
            SigoError::Config(_) => ErrorSeverity::Critical,
            SigoError::Geocoding(GeocodingError::NotFound) => ErrorSeverity::Info,
            SigoError::Recurrence(_) => ErrorSeverity::Warning,
            SigoError::DuplicateSlug { .. } => ErrorSeverity::Warning,
            SigoError::InvalidStateTransition { .. } => ErrorSeverity::Warning,
            SigoError::InvalidInput(_) => ErrorSeverity::Info,
            _ => ErrorSeverity::Error,
        }
    }
}

impl GeocodingError {
    /// Transient failures are worth retrying; a missing address is not.
    pub fn is_transient(&self) -> bool {
        match self {
            GeocodingError::NotFound => false,
            GeocodingError::RequestFailed(_) => true,
            GeocodingError::Timeout => true,
            GeocodingError::InvalidResponse(_) => false,
            GeocodingError::ServiceUnavailable => true,
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,
    Warning,
    Error,
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_slug_is_recoverable() {
        let err = SigoError::DuplicateSlug {
            slug: "city-hall".to_string(),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }

    #[test]
    fn test_not_found_is_not_transient() {
        assert!(!GeocodingError::NotFound.is_transient());
        assert!(GeocodingError::Timeout.is_transient());
        assert!(GeocodingError::ServiceUnavailable.is_transient());
    }

    #[test]
    fn test_invalid_recurrence_severity() {
        let err = SigoError::Recurrence(RecurrenceError::InvalidRule("RRULE:BOGUS".to_string()));
        assert!(!err.is_recoverable());
        assert_eq!(err.severity(), ErrorSeverity::Warning);
    }
}
