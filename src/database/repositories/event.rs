//! Event repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::event::{
    default_end_time, default_start_time, CreateEventRequest, Event, EventType, UpdateEventRequest,
};
use crate::utils::errors::SigoError;

const EVENT_COLUMNS: &str = "id, title, slug, url, description, venue_id, host_id, start_time, end_time, starts_at, recurrence, event_type, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new event with an already-assigned slug. Start and end times
    /// default to the next full hour and two hours out. A lost slug race
    /// surfaces as [`SigoError::DuplicateSlug`].
    pub async fn create(&self, request: CreateEventRequest, slug: &str) -> Result<Event, SigoError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            INSERT INTO events (title, slug, url, description, venue_id, host_id, start_time, end_time, starts_at, recurrence, event_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, title, slug, url, description, venue_id, host_id, start_time, end_time, starts_at, recurrence, event_type, created_at, updated_at
            "#
        )
        .bind(request.title)
        .bind(slug)
        .bind(request.url.unwrap_or_default())
        .bind(request.description.unwrap_or_default())
        .bind(request.venue_id)
        .bind(request.host_id)
        .bind(request.start_time.unwrap_or_else(default_start_time))
        .bind(request.end_time.unwrap_or_else(default_end_time))
        .bind(request.starts_at)
        .bind(request.recurrence)
        .bind(request.event_type.unwrap_or_default())
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::map_slug_violation(e, slug))?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, SigoError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>, SigoError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Check whether a slug is already taken
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, SigoError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM events WHERE slug = $1)")
                .bind(slug)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    /// Update event fields; the slug is immutable after creation. The
    /// nullable columns honor the request's clear flags, since COALESCE
    /// alone cannot express "set to NULL".
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, SigoError> {
        let event = sqlx::query_as::<_, Event>(
            r#"
            UPDATE events
            SET title = COALESCE($2, title),
                url = COALESCE($3, url),
                description = COALESCE($4, description),
                venue_id = CASE WHEN $12 THEN NULL ELSE COALESCE($5, venue_id) END,
                host_id = CASE WHEN $13 THEN NULL ELSE COALESCE($6, host_id) END,
                start_time = COALESCE($7, start_time),
                end_time = COALESCE($8, end_time),
                starts_at = COALESCE($9, starts_at),
                recurrence = CASE WHEN $14 THEN NULL ELSE COALESCE($10, recurrence) END,
                event_type = COALESCE($11, event_type),
                updated_at = $15
            WHERE id = $1
            RETURNING id, title, slug, url, description, venue_id, host_id, start_time, end_time, starts_at, recurrence, event_type, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.title)
        .bind(request.url)
        .bind(request.description)
        .bind(request.venue_id)
        .bind(request.host_id)
        .bind(request.start_time)
        .bind(request.end_time)
        .bind(request.starts_at)
        .bind(request.recurrence)
        .bind(request.event_type)
        .bind(request.clear_venue)
        .bind(request.clear_host)
        .bind(request.clear_recurrence)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event
    pub async fn delete(&self, id: i64) -> Result<(), SigoError> {
        sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List events with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Event>, SigoError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY starts_at ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// All events, for recurrence-window filtering. Occurrence membership
    /// cannot be decided in SQL, so the filter runs over the full set.
    pub async fn list_all(&self) -> Result<Vec<Event>, SigoError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events ORDER BY starts_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List events at a venue
    pub async fn list_by_venue(&self, venue_id: i64) -> Result<Vec<Event>, SigoError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE venue_id = $1 ORDER BY starts_at ASC"
        ))
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List events hosted by an organization
    pub async fn list_by_host(&self, host_id: i64) -> Result<Vec<Event>, SigoError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE host_id = $1 ORDER BY starts_at ASC"
        ))
        .bind(host_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// List events of a given type
    pub async fn list_by_type(&self, event_type: EventType) -> Result<Vec<Event>, SigoError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE event_type = $1 ORDER BY starts_at ASC"
        ))
        .bind(event_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }

    /// Count total events
    pub async fn count(&self) -> Result<i64, SigoError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM events")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
