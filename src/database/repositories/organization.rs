//! Organization repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::organization::{
    CreateOrganizationRequest, Organization, OrganizationType, UpdateOrganizationRequest,
};
use crate::utils::errors::SigoError;

const ORGANIZATION_COLUMNS: &str = "id, title, url, slug, organization_type, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct OrganizationRepository {
    pool: PgPool,
}

impl OrganizationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a new organization with an already-assigned slug. A lost slug
    /// race surfaces as [`SigoError::DuplicateSlug`].
    pub async fn create(
        &self,
        request: CreateOrganizationRequest,
        slug: &str,
    ) -> Result<Organization, SigoError> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            INSERT INTO organizations (title, url, slug, organization_type, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, url, slug, organization_type, created_at, updated_at
            "#,
        )
        .bind(request.title)
        .bind(request.url.unwrap_or_default())
        .bind(slug)
        .bind(request.organization_type.unwrap_or_default())
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| super::map_slug_violation(e, slug))?;

        Ok(organization)
    }

    /// Find organization by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Organization>, SigoError> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    /// Find organization by slug
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Organization>, SigoError> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE slug = $1"
        ))
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(organization)
    }

    /// Check whether a slug is already taken
    pub async fn slug_exists(&self, slug: &str) -> Result<bool, SigoError> {
        let exists: (bool,) =
            sqlx::query_as("SELECT EXISTS(SELECT 1 FROM organizations WHERE slug = $1)")
                .bind(slug)
                .fetch_one(&self.pool)
                .await?;

        Ok(exists.0)
    }

    /// Update organization fields; the slug is immutable after creation.
    pub async fn update(
        &self,
        id: i64,
        request: UpdateOrganizationRequest,
    ) -> Result<Organization, SigoError> {
        let organization = sqlx::query_as::<_, Organization>(
            r#"
            UPDATE organizations
            SET title = COALESCE($2, title),
                url = COALESCE($3, url),
                organization_type = COALESCE($4, organization_type),
                updated_at = $5
            WHERE id = $1
            RETURNING id, title, url, slug, organization_type, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(request.title)
        .bind(request.url)
        .bind(request.organization_type)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(organization)
    }

    /// Delete organization
    pub async fn delete(&self, id: i64) -> Result<(), SigoError> {
        sqlx::query("DELETE FROM organizations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// List organizations with pagination
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Organization>, SigoError> {
        let organizations = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations ORDER BY title ASC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(organizations)
    }

    /// List organizations of a given type
    pub async fn list_by_type(
        &self,
        organization_type: OrganizationType,
    ) -> Result<Vec<Organization>, SigoError> {
        let organizations = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE organization_type = $1 ORDER BY title ASC"
        ))
        .bind(organization_type)
        .fetch_all(&self.pool)
        .await?;

        Ok(organizations)
    }

    /// Count total organizations
    pub async fn count(&self) -> Result<i64, SigoError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM organizations")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
