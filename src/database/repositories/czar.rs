//! Czar application repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::czar::{CreateCzarApplicationRequest, CzarApplication};
use crate::utils::errors::SigoError;

const APPLICATION_COLUMNS: &str = "id, name_first, name_last, email, municipality, url, twitter, description, application_reviewed, czar_granted, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct CzarApplicationRepository {
    pool: PgPool,
}

impl CzarApplicationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new application; it starts unreviewed with no decision.
    pub async fn create(
        &self,
        request: CreateCzarApplicationRequest,
    ) -> Result<CzarApplication, SigoError> {
        let application = sqlx::query_as::<_, CzarApplication>(
            r#"
            INSERT INTO czar_applications (name_first, name_last, email, municipality, url, twitter, description, application_reviewed, czar_granted, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, FALSE, NULL, $8, $9)
            RETURNING id, name_first, name_last, email, municipality, url, twitter, description, application_reviewed, czar_granted, created_at, updated_at
            "#
        )
        .bind(request.name_first)
        .bind(request.name_last)
        .bind(request.email)
        .bind(request.municipality.unwrap_or_default())
        .bind(request.url.unwrap_or_default())
        .bind(request.twitter.unwrap_or_default())
        .bind(request.description)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(application)
    }

    /// Find application by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<CzarApplication>, SigoError> {
        let application = sqlx::query_as::<_, CzarApplication>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM czar_applications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(application)
    }

    /// Mark an application reviewed
    pub async fn set_reviewed(&self, id: i64) -> Result<CzarApplication, SigoError> {
        let application = sqlx::query_as::<_, CzarApplication>(
            r#"
            UPDATE czar_applications
            SET application_reviewed = TRUE, updated_at = $2
            WHERE id = $1
            RETURNING id, name_first, name_last, email, municipality, url, twitter, description, application_reviewed, czar_granted, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(application)
    }

    /// Record the grant decision for a reviewed application
    pub async fn set_decision(
        &self,
        id: i64,
        granted: bool,
    ) -> Result<CzarApplication, SigoError> {
        let application = sqlx::query_as::<_, CzarApplication>(
            r#"
            UPDATE czar_applications
            SET czar_granted = $2, updated_at = $3
            WHERE id = $1
            RETURNING id, name_first, name_last, email, municipality, url, twitter, description, application_reviewed, czar_granted, created_at, updated_at
            "#
        )
        .bind(id)
        .bind(granted)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(application)
    }

    /// List applications with pagination, newest first
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<CzarApplication>, SigoError> {
        let applications = sqlx::query_as::<_, CzarApplication>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM czar_applications ORDER BY created_at DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    /// Applications awaiting first review
    pub async fn list_unreviewed(&self) -> Result<Vec<CzarApplication>, SigoError> {
        let applications = sqlx::query_as::<_, CzarApplication>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM czar_applications WHERE application_reviewed = FALSE ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    /// Reviewed applications still awaiting a grant decision
    pub async fn list_undecided(&self) -> Result<Vec<CzarApplication>, SigoError> {
        let applications = sqlx::query_as::<_, CzarApplication>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM czar_applications WHERE application_reviewed = TRUE AND czar_granted IS NULL ORDER BY created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(applications)
    }

    /// Delete application
    pub async fn delete(&self, id: i64) -> Result<(), SigoError> {
        sqlx::query("DELETE FROM czar_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Count total applications
    pub async fn count(&self) -> Result<i64, SigoError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM czar_applications")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
