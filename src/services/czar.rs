//! Czar application service implementation
//!
//! Review is two-staged: an application is first marked reviewed, and only a
//! reviewed application can receive a grant decision. A stored decision on an
//! unreviewed application is never surfaced.

use tracing::info;

use crate::database::repositories::CzarApplicationRepository;
use crate::models::czar::{CreateCzarApplicationRequest, CzarApplication, ReviewState};
use crate::services::validate_optional_url;
use crate::utils::errors::{Result, SigoError};
use crate::utils::logging::log_review_action;

/// Czar application service
#[derive(Debug, Clone)]
pub struct CzarService {
    applications: CzarApplicationRepository,
}

impl CzarService {
    /// Create a new CzarService instance
    pub fn new(applications: CzarApplicationRepository) -> Self {
        Self { applications }
    }

    /// Submit a new application. It starts unreviewed with no decision.
    pub async fn submit_application(
        &self,
        request: CreateCzarApplicationRequest,
    ) -> Result<CzarApplication> {
        if request.name_first.trim().is_empty() || request.name_last.trim().is_empty() {
            return Err(SigoError::InvalidInput(
                "Applicant name is required".to_string(),
            ));
        }
        if request.email.trim().is_empty() || !request.email.contains('@') {
            return Err(SigoError::InvalidInput(
                "A valid applicant email is required".to_string(),
            ));
        }
        if request.description.trim().is_empty() {
            return Err(SigoError::InvalidInput(
                "Application description is required".to_string(),
            ));
        }
        validate_optional_url(request.url.as_deref())?;

        let application = self.applications.create(request).await?;
        info!(
            application_id = application.id,
            applicant = %application.applicant(),
            "Czar application submitted"
        );

        Ok(application)
    }

    /// Get application by ID
    pub async fn get_application(&self, application_id: i64) -> Result<CzarApplication> {
        self.applications
            .find_by_id(application_id)
            .await?
            .ok_or(SigoError::ApplicationNotFound { application_id })
    }

    /// First review stage: mark the application as seen by a reviewer.
    /// Marking an already-reviewed application again is a no-op.
    pub async fn mark_reviewed(&self, application_id: i64) -> Result<CzarApplication> {
        let application = self.get_application(application_id).await?;
        if application.application_reviewed {
            return Ok(application);
        }

        let application = self.applications.set_reviewed(application_id).await?;
        log_review_action(application_id, "reviewed", None);

        Ok(application)
    }

    /// Second review stage: record the grant decision. Rejected while the
    /// application is still unreviewed.
    pub async fn decide(&self, application_id: i64, granted: bool) -> Result<CzarApplication> {
        let application = self.get_application(application_id).await?;
        if !application.application_reviewed {
            return Err(SigoError::InvalidStateTransition {
                from: application.review_state().to_string(),
                to: if granted { "granted" } else { "denied" }.to_string(),
            });
        }

        let application = self.applications.set_decision(application_id, granted).await?;
        log_review_action(application_id, "decided", Some(granted));

        Ok(application)
    }

    /// Applications awaiting first review
    pub async fn pending_applications(&self) -> Result<Vec<CzarApplication>> {
        self.applications.list_unreviewed().await
    }

    /// Reviewed applications still awaiting a decision
    pub async fn undecided_applications(&self) -> Result<Vec<CzarApplication>> {
        let applications = self.applications.list_undecided().await?;
        debug_assert!(applications
            .iter()
            .all(|a| a.review_state() == ReviewState::Undecided));

        Ok(applications)
    }

    /// List applications with pagination, newest first
    pub async fn list_applications(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CzarApplication>> {
        if limit > 100 {
            return Err(SigoError::InvalidInput(
                "Limit cannot exceed 100".to_string(),
            ));
        }
        self.applications.list(limit, offset).await
    }

    /// Delete application
    pub async fn delete_application(&self, application_id: i64) -> Result<()> {
        self.get_application(application_id).await?;
        self.applications.delete(application_id).await?;
        info!(application_id = application_id, "Czar application deleted");

        Ok(())
    }
}
