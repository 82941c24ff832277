//! Event service implementation
//!
//! Creation and updates validate the recurrence rule eagerly, so a malformed
//! rule is rejected before it is stored. Window queries expand stored rules
//! in memory; an event whose stored rule no longer parses is skipped with a
//! warning rather than failing the whole listing.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::settings::Settings;
use crate::database::repositories::EventRepository;
use crate::models::event::{CreateEventRequest, Event, EventType, UpdateEventRequest};
use crate::recurrence::{DateWindow, Recurrence};
use crate::services::{validate_optional_url, MAX_SLUG_ATTEMPTS};
use crate::utils::errors::{Result, SigoError};
use crate::utils::logging::{log_invalid_recurrence, log_slug_assigned};
use crate::utils::slug::assign_slug;

/// Event service for managing event operations
#[derive(Debug, Clone)]
pub struct EventService {
    events: EventRepository,
    settings: Settings,
}

impl EventService {
    /// Create a new EventService instance
    pub fn new(events: EventRepository, settings: Settings) -> Self {
        Self { events, settings }
    }

    /// Create an event with a unique slug, validating the recurrence rule
    /// before the insert. A lost slug race is retried with a fresh
    /// assignment.
    pub async fn create_event(&self, request: CreateEventRequest) -> Result<Event> {
        if request.title.trim().is_empty() {
            return Err(SigoError::InvalidInput("Event title is required".to_string()));
        }
        validate_optional_url(request.url.as_deref())?;
        if let Some(rule) = request.recurrence.as_deref() {
            Recurrence::parse(rule, request.starts_at)?;
        }

        let seed = request
            .slug
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&request.title)
            .to_string();

        let mut attempt = 0;
        let event = loop {
            attempt += 1;
            let slug = assign_slug(&seed, "event", |candidate| {
                let events = self.events.clone();
                async move { events.slug_exists(&candidate).await }
            })
            .await?;

            match self.events.create(request.clone(), &slug).await {
                Ok(event) => break event,
                Err(SigoError::DuplicateSlug { slug }) if attempt < MAX_SLUG_ATTEMPTS => {
                    warn!(slug = %slug, attempt = attempt, "Lost slug race, reassigning");
                }
                Err(e) => return Err(e),
            }
        };
        log_slug_assigned("event", event.id, &event.slug, attempt);

        Ok(event)
    }

    /// Get event by ID
    pub async fn get_event(&self, event_id: i64) -> Result<Event> {
        self.events
            .find_by_id(event_id)
            .await?
            .ok_or(SigoError::EventNotFound { event_id })
    }

    /// Get event by slug
    pub async fn get_event_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        self.events.find_by_slug(slug).await
    }

    /// Update event fields. A new recurrence rule is validated against the
    /// effective dtstart before it is stored; the slug is immutable.
    /// `clear_recurrence` wins over a rule in the same request.
    pub async fn update_event(&self, event_id: i64, request: UpdateEventRequest) -> Result<Event> {
        validate_optional_url(request.url.as_deref())?;

        let existing = self.get_event(event_id).await?;
        if !request.clear_recurrence {
            if let Some(rule) = request.recurrence.as_deref() {
                let dtstart = request.starts_at.unwrap_or(existing.starts_at);
                Recurrence::parse(rule, dtstart)?;
            }
        }

        let event = self.events.update(event_id, request).await?;
        info!(event_id = event_id, "Event updated");

        Ok(event)
    }

    /// Delete event
    pub async fn delete_event(&self, event_id: i64) -> Result<()> {
        self.get_event(event_id).await?;
        self.events.delete(event_id).await?;
        info!(event_id = event_id, "Event deleted");

        Ok(())
    }

    /// List events with pagination
    pub async fn list_events(&self, limit: i64, offset: i64) -> Result<Vec<Event>> {
        if limit > 100 {
            return Err(SigoError::InvalidInput(
                "Limit cannot exceed 100".to_string(),
            ));
        }
        self.events.list(limit, offset).await
    }

    /// List events at a venue
    pub async fn events_at_venue(&self, venue_id: i64) -> Result<Vec<Event>> {
        self.events.list_by_venue(venue_id).await
    }

    /// List events hosted by an organization
    pub async fn events_hosted_by(&self, host_id: i64) -> Result<Vec<Event>> {
        self.events.list_by_host(host_id).await
    }

    /// List events of a given type
    pub async fn events_of_type(&self, event_type: EventType) -> Result<Vec<Event>> {
        self.events.list_by_type(event_type).await
    }

    /// Events with at least one occurrence in the next `days` days
    /// (defaulting to the configured window), ordered by base start.
    /// One-off events count when their single instant falls inside.
    pub async fn upcoming_events(&self, days: Option<i64>) -> Result<Vec<Event>> {
        let window = DateWindow::upcoming(self.window_days(days));
        let mut upcoming = Vec::new();

        for event in self.events.list_all().await? {
            match event.occurs_within(window) {
                Ok(true) => upcoming.push(event),
                Ok(false) => {}
                Err(e) => log_invalid_recurrence(event.id, &e.to_string()),
            }
        }

        Ok(upcoming)
    }

    /// Every concrete occurrence instant in the next `days` days across all
    /// events, ascending. Events with unparseable stored rules are skipped.
    pub async fn upcoming_occurrences(
        &self,
        days: Option<i64>,
    ) -> Result<Vec<(DateTime<Utc>, Event)>> {
        let window = DateWindow::upcoming(self.window_days(days));
        let mut occurrences = Vec::new();

        for event in self.events.list_all().await? {
            match event.occurrences(window) {
                Ok(instants) => {
                    occurrences.extend(instants.into_iter().map(|at| (at, event.clone())))
                }
                Err(e) => log_invalid_recurrence(event.id, &e.to_string()),
            }
        }

        occurrences.sort_by_key(|(at, _)| *at);
        Ok(occurrences)
    }

    /// Occurrence instants for one event over the next `days` days, counted
    /// from local midnight. A malformed stored rule is an error here, not a
    /// skip: the caller asked about this event specifically.
    pub fn occurrence_dates(
        &self,
        event: &Event,
        days: Option<i64>,
    ) -> Result<Vec<DateTime<Utc>>> {
        let window = DateWindow::from_today(self.window_days(days));
        Ok(event.occurrences(window)?)
    }

    fn window_days(&self, days: Option<i64>) -> i64 {
        days.unwrap_or(self.settings.events.default_window_days)
    }
}
