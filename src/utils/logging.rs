//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging
//! utilities for the Sigo application.

use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;
use crate::utils::errors::Result;

/// Initialize logging based on configuration.
///
/// The returned guard owns the background writer for the rolling file layer;
/// dropping it stops the writer, so the caller must hold it for the process
/// lifetime.
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    let file_appender = tracing_appender::rolling::daily(&config.file_path, "sigo.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stdout))
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a slug assignment with structured data
pub fn log_slug_assigned(entity: &str, id: i64, slug: &str, attempts: u32) {
    info!(
        entity = entity,
        id = id,
        slug = slug,
        attempts = attempts,
        "Slug assigned"
    );
}

/// Log geocoding results
pub fn log_geocode_result(venue_id: i64, address: &str, found: bool) {
    if found {
        debug!(venue_id = venue_id, address = address, "Venue geocoded");
    } else {
        warn!(
            venue_id = venue_id,
            address = address,
            "Address could not be geocoded; leaving point empty"
        );
    }
}

/// Log czar application review actions
pub fn log_review_action(application_id: i64, action: &str, granted: Option<bool>) {
    info!(
        application_id = application_id,
        action = action,
        granted = granted,
        "Czar application review action"
    );
}

/// Log an event skipped due to a malformed recurrence rule
pub fn log_invalid_recurrence(event_id: i64, error: &str) {
    warn!(
        event_id = event_id,
        error = error,
        "Skipping event with invalid recurrence rule"
    );
}
