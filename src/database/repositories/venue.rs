//! Venue repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::venue::{CreateVenueRequest, GeoPoint, UpdateVenueRequest, Venue};
use crate::utils::errors::SigoError;

const VENUE_COLUMNS: &str = "id, title, address, city, state, zipcode, slug, phone, url, email, description, keywords, latitude, longitude, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct VenueRepository {
    pool: PgPool,
}

impl VenueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new venue with an already-assigned slug. A lost slug race
    /// surfaces as [`SigoError::DuplicateSlug`].
    pub async fn create(&self, request: CreateVenueRequest, slug: &str) -> Result<Venue, SigoError> {
        let venue = sqlx::query_as::<_, Venue>(
            r#"
            INSERT INTO venues (title, address, city, state, zipcode, slug, phone, url, email, description, keywords, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id, title, address, city, state, zipcode, slug, phone, url, email, description, keywords, latitude, longitude, created_at, updated_at
            "#
        )
        .bind(request.title)
        .bind(request.address)
        .bind(request.city)
        .bind(request.state)
        .bind(request.zipcode.unwrap_or_default())
        .bind(slug)
        .bind(request.phone.unwrap_or_default())
        .bind(request.url.unwrap_or_default())
        .bind(request.email.unwrap_or_default())
        .bind(request.description.unwrap_or_default())
        .bind(request.keywords.unwrap_or_default())
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::map_slug_violation(e, slug))?;

        Ok(venue)
    }

    /// Find venue by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Venue>, SigoError> {
        let venue = sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(venue)
    }

    /// Find venue by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Venue>, SigoError> {
        let venue = sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(venue)
    }

    /// Check whether a slug is already taken
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, SigoError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM venues WHERE slug = $1)")
                .bind(slug)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    /// Update venue fields. The slug and point columns are never touched
    /// here; both are assigned exactly once at creation.
    pub async fn update(&self, id: i64, request: UpdateVenueRequest) -> Result<Venue, SigoError> {
        let venue = sqlx::query_as::<_, Venue>(
            r#"
            UPDATE venues
            SET title = COALESCE($2, title),
                address = COALESCE($3, address),
                city = COALESCE($4, city),
                state = COALESCE($5, state),
                zipcode = COALESCE($6, zipcode),
                phone = COALESCE($7, phone),
                url = COALESCE($8, url),
                email = COALESCE($9, email),
                description = COALESCE($10, description),
                keywords = COALESCE($11, keywords),
                updated_at = $12
            WHERE id = $1
            RETURNING id, title, address, city, state, zipcode, slug, phone, url, email, description, keywords, latitude, longitude, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(request.title)
        .bind(request.address)
        .bind(request.city)
        .bind(request.state)
        .bind(request.zipcode)
        .bind(request.phone)
        .bind(request.url)
        .bind(request.email)
        .bind(request.description)
        .bind(request.keywords)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(venue)
    }

    /// Set the geocoded point, only if it is currently unset. Returns whether
    /// a row was updated, so callers can tell a repeat save from the first.
    pub async fn set_point(&self, id: i64, point: GeoPoint) -> Result<bool, SigoError> {
        let result = sqlx::query(
            "UPDATE venues SET latitude = $2, longitude = $3, updated_at = $4 WHERE id = $1 AND latitude IS NULL"
        )
        .bind(id)
        .bind(point.latitude)
        .bind(point.longitude)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete venue
    pub async fn delete(&self, id: i64) -> Result<(), SigoError> {
        sqlx::query("DELETE FROM venues WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List venues with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Venue>, SigoError> {
        let venues = sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues ORDER BY title ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(venues)
    }

    /// List venues in a state
    pub async fn list_by_state(&self, state: &str) -> Result<Vec<Venue>, SigoError> {
        let venues = sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE state = $1 ORDER BY title ASC"
        ))
        .bind(state)
        .fetch_all(&self.pool)
        .await?;

        Ok(venues)
    }

    /// Venues with an address but no geocoded point yet
    pub async fn list_missing_point(&self) -> Result<Vec<Venue>, SigoError> {
        let venues = sqlx::query_as::<_, Venue>(&format!(
            "SELECT {VENUE_COLUMNS} FROM venues WHERE address <> '' AND latitude IS NULL ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(venues)
    }

    /// Count total venues
    pub async fn count(&self) -> Result<i64, SigoError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM venues")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
