//! Organization service implementation

use tracing::{info, warn};

use crate::database::repositories::OrganizationRepository;
use crate::models::organization::{
    CreateOrganizationRequest, Organization, OrganizationType, UpdateOrganizationRequest,
};
use crate::services::{validate_optional_url, MAX_SLUG_ATTEMPTS};
use crate::utils::errors::{Result, SigoError};
use crate::utils::logging::log_slug_assigned;
use crate::utils::slug::assign_slug;

/// Organization service for managing organization operations
#[derive(Debug, Clone)]
pub struct OrganizationService {
    organizations: OrganizationRepository,
}

impl OrganizationService {
    /// Create a new OrganizationService instance
    pub fn new(organizations: OrganizationRepository) -> Self {
        Self { organizations }
    }

    /// Create an organization with a unique slug. A lost slug race is
    /// retried with a fresh assignment.
    pub async fn create_organization(
        &self,
        request: CreateOrganizationRequest,
    ) -> Result<Organization> {
        if request.title.trim().is_empty() {
            return Err(SigoError::InvalidInput(
                "Organization title is required".to_string(),
            ));
        }
        validate_optional_url(request.url.as_deref())?;

        let seed = request
            .slug
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(&request.title)
            .to_string();

        let mut attempt = 0;
        let organization = loop {
            attempt += 1;
            let slug = assign_slug(&seed, "organization", |candidate| {
                let organizations = self.organizations.clone();
                async move { organizations.slug_exists(&candidate).await }
            })
            .await?;

            match self.organizations.create(request.clone(), &slug).await {
                Ok(organization) => break organization,
                Err(SigoError::DuplicateSlug { slug }) if attempt < MAX_SLUG_ATTEMPTS => {
                    warn!(slug = %slug, attempt = attempt, "Lost slug race, reassigning");
                }
                Err(e) => return Err(e),
            }
        };
        log_slug_assigned("organization", organization.id, &organization.slug, attempt);

        Ok(organization)
    }

    /// Get organization by ID
    pub async fn get_organization(&self, organization_id: i64) -> Result<Organization> {
        self.organizations
            .find_by_id(organization_id)
            .await?
            .ok_or(SigoError::OrganizationNotFound { organization_id })
    }

    /// Get organization by slug
    pub async fn get_organization_by_slug(&self, slug: &str) -> Result<Option<Organization>> {
        self.organizations.find_by_slug(slug).await
    }

    /// Update organization fields; the slug is left untouched.
    pub async fn update_organization(
        &self,
        organization_id: i64,
        request: UpdateOrganizationRequest,
    ) -> Result<Organization> {
        validate_optional_url(request.url.as_deref())?;

        self.get_organization(organization_id).await?;
        let organization = self.organizations.update(organization_id, request).await?;
        info!(organization_id = organization_id, "Organization updated");

        Ok(organization)
    }

    /// Delete organization
    pub async fn delete_organization(&self, organization_id: i64) -> Result<()> {
        self.get_organization(organization_id).await?;
        self.organizations.delete(organization_id).await?;
        info!(organization_id = organization_id, "Organization deleted");

        Ok(())
    }

    /// List organizations with pagination
    pub async fn list_organizations(&self, limit: i64, offset: i64) -> Result<Vec<Organization>> {
        if limit > 100 {
            return Err(SigoError::InvalidInput(
                "Limit cannot exceed 100".to_string(),
            ));
        }
        self.organizations.list(limit, offset).await
    }

    /// List organizations of a given type
    pub async fn organizations_of_type(
        &self,
        organization_type: OrganizationType,
    ) -> Result<Vec<Organization>> {
        self.organizations.list_by_type(organization_type).await
    }
}
