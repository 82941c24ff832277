//! Venue service implementation
//!
//! Handles venue creation (slug assignment plus one-time geocoding), updates
//! and lookups. Slug and point derivation happen here, before the storage
//! write, so both are independently testable.

use tracing::{debug, info, warn};

use crate::config::settings::Settings;
use crate::database::repositories::VenueRepository;
use crate::models::venue::{CreateVenueRequest, UpdateVenueRequest, Venue};
use crate::services::geocoding::GeocodingService;
use crate::services::{validate_optional_url, MAX_SLUG_ATTEMPTS};
use crate::utils::errors::{Result, SigoError};
use crate::utils::logging::{log_geocode_result, log_slug_assigned};
use crate::utils::slug::assign_slug;

/// Venue service for managing venue operations
#[derive(Debug, Clone)]
pub struct VenueService {
    venues: VenueRepository,
    geocoding: GeocodingService,
    settings: Settings,
}

impl VenueService {
    /// Create a new VenueService instance
    pub fn new(venues: VenueRepository, geocoding: GeocodingService, settings: Settings) -> Self {
        Self {
            venues,
            geocoding,
            settings,
        }
    }

    /// Create a venue: assign a unique slug, insert, then geocode the
    /// address once. A lost slug race is retried with a fresh assignment.
    pub async fn create_venue(&self, request: CreateVenueRequest) -> Result<Venue> {
        if request.title.trim().is_empty() {
            return Err(SigoError::InvalidInput("Venue title is required".to_string()));
        }
        validate_optional_url(request.url.as_deref())?;

        let seed = request
            .slug
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&request.title)
            .to_string();

        let mut attempt = 0;
        let venue = loop {
            attempt += 1;
            let slug = assign_slug(&seed, "venue", |candidate| {
                let venues = self.venues.clone();
                async move { venues.slug_exists(&candidate).await }
            })
            .await?;

            match self.venues.create(request.clone(), &slug).await {
                Ok(venue) => break venue,
                Err(SigoError::DuplicateSlug { slug }) if attempt < MAX_SLUG_ATTEMPTS => {
                    warn!(slug = %slug, attempt = attempt, "Lost slug race, reassigning");
                }
                Err(e) => return Err(e),
            }
        };
        log_slug_assigned("venue", venue.id, &venue.slug, attempt);

        self.geocode_venue(venue).await
    }

    /// Geocode a freshly created venue, honoring the failure policy.
    async fn geocode_venue(&self, mut venue: Venue) -> Result<Venue> {
        if !self.geocoding.is_enabled() || venue.address.is_empty() || venue.point().is_some() {
            return Ok(venue);
        }

        match self.geocoding.geocode(&venue.full_address()).await {
            Ok(point) => {
                if self.venues.set_point(venue.id, point).await? {
                    venue.latitude = Some(point.latitude);
                    venue.longitude = Some(point.longitude);
                }
                log_geocode_result(venue.id, &venue.address, true);
                Ok(venue)
            }
            Err(e) if self.settings.geocoding.required => Err(e),
            Err(e) => {
                log_geocode_result(venue.id, &venue.address, false);
                debug!(venue_id = venue.id, error = %e, "Proceeding without point");
                Ok(venue)
            }
        }
    }

    /// Backfill points for venues that have an address but were never
    /// geocoded (collaborator down at save time, or geocoding disabled).
    /// Returns the number of venues geocoded.
    pub async fn geocode_missing(&self) -> Result<u64> {
        let venues = self.venues.list_missing_point().await?;
        let total = venues.len();
        let mut updated = 0u64;

        for venue in venues {
            match self.geocoding.geocode(&venue.full_address()).await {
                Ok(point) => {
                    if self.venues.set_point(venue.id, point).await? {
                        updated += 1;
                    }
                }
                Err(e) => {
                    log_geocode_result(venue.id, &venue.address, false);
                    debug!(venue_id = venue.id, error = %e, "Backfill geocode failed");
                }
            }
        }

        info!(candidates = total, updated = updated, "Geocode backfill finished");
        Ok(updated)
    }

    /// Get venue by ID
    pub async fn get_venue(&self, venue_id: i64) -> Result<Venue> {
        self.venues
            .find_by_id(venue_id)
            .await?
            .ok_or(SigoError::VenueNotFound { venue_id })
    }

    /// Get venue by slug
    pub async fn get_venue_by_slug(&self, slug: &str) -> Result<Option<Venue>> {
        self.venues.find_by_slug(slug).await
    }

    /// Update venue fields. Never touches the slug or the point, so
    /// re-saving an existing venue cannot re-derive either.
    pub async fn update_venue(&self, venue_id: i64, request: UpdateVenueRequest) -> Result<Venue> {
        validate_optional_url(request.url.as_deref())?;

        // Ensure the venue exists so a miss maps to a domain error
        self.get_venue(venue_id).await?;
        let venue = self.venues.update(venue_id, request).await?;
        info!(venue_id = venue_id, "Venue updated");

        Ok(venue)
    }

    /// Delete venue
    pub async fn delete_venue(&self, venue_id: i64) -> Result<()> {
        self.get_venue(venue_id).await?;
        self.venues.delete(venue_id).await?;
        info!(venue_id = venue_id, "Venue deleted");

        Ok(())
    }

    /// List venues with pagination
    pub async fn list_venues(&self, limit: i64, offset: i64) -> Result<Vec<Venue>> {
        if limit > 100 {
            return Err(SigoError::InvalidInput(
                "Limit cannot exceed 100".to_string(),
            ));
        }
        self.venues.list(limit, offset).await
    }

    /// List venues in a state
    pub async fn venues_in_state(&self, state: &str) -> Result<Vec<Venue>> {
        self.venues.list_by_state(state).await
    }
}
