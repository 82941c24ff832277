//! Services module
//!
//! This module contains the business logic services that sit between storage
//! and callers: venues, organizations, events, czar applications and the
//! geocoding collaborator.

pub mod czar;
pub mod event;
pub mod geocoding;
pub mod organization;
pub mod venue;

pub use czar::CzarService;
pub use event::EventService;
pub use geocoding::{GeocodeCandidate, GeocodingService};
pub use organization::OrganizationService;
pub use venue::VenueService;

use crate::config::settings::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::{Result, SigoError};

/// How many times a create may lose the slug uniqueness race before the
/// error is surfaced to the caller.
pub(crate) const MAX_SLUG_ATTEMPTS: u32 = 3;

/// Reject a syntactically invalid URL; `None` and empty strings pass.
pub(crate) fn validate_optional_url(candidate: Option<&str>) -> Result<()> {
    match candidate {
        Some(raw) if !raw.trim().is_empty() => {
            url::Url::parse(raw)
                .map_err(|_| SigoError::InvalidInput(format!("Invalid URL: {}", raw)))?;
            Ok(())
        }
        _ => Ok(()),
    }
}

/// Service factory for wiring all services together
#[derive(Debug, Clone)]
pub struct ServiceFactory {
    pub venue_service: VenueService,
    pub organization_service: OrganizationService,
    pub event_service: EventService,
    pub czar_service: CzarService,
    pub geocoding_service: GeocodingService,
}

impl ServiceFactory {
    /// Create a new service factory with all services initialized
    pub fn new(
        settings: Settings,
        database: DatabaseService,
        redis_client: Option<redis::Client>,
    ) -> Result<Self> {
        let geocoding_service = GeocodingService::new(redis_client, settings.clone())?;

        Ok(Self {
            venue_service: VenueService::new(
                database.venues.clone(),
                geocoding_service.clone(),
                settings.clone(),
            ),
            organization_service: OrganizationService::new(database.organizations.clone()),
            event_service: EventService::new(database.events.clone(), settings),
            czar_service: CzarService::new(database.czar_applications.clone()),
            geocoding_service,
        })
    }

    /// Perform health checks on all services
    pub async fn health_check(&self, pool: &crate::database::DatabasePool) -> ServiceHealthStatus {
        ServiceHealthStatus {
            database: crate::database::health_check(pool).await.is_ok(),
            geocode_cache: self.geocoding_service.cache_health().await,
        }
    }
}

/// Health status of backing services
#[derive(Debug, Clone)]
pub struct ServiceHealthStatus {
    pub database: bool,
    pub geocode_cache: bool,
}

impl ServiceHealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.database
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_optional_url_accepts_absent_and_empty() {
        assert!(validate_optional_url(None).is_ok());
        assert!(validate_optional_url(Some("")).is_ok());
        assert!(validate_optional_url(Some("   ")).is_ok());
    }

    #[test]
    fn test_validate_optional_url_accepts_http() {
        assert!(validate_optional_url(Some("https://example.org/events")).is_ok());
    }

    #[test]
    fn test_validate_optional_url_rejects_garbage() {
        assert!(validate_optional_url(Some("not a url")).is_err());
    }

    #[test]
    fn test_health_status() {
        let status = ServiceHealthStatus {
            database: true,
            geocode_cache: false,
        };
        // The cache is best-effort, only the database is load-bearing.
        assert!(status.is_healthy());
    }
}
