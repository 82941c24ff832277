//! Czar application model
//!
//! Volunteer/moderator applications pass through a two-stage review: an
//! admin first marks the application reviewed, then records whether the czar
//! role was granted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CzarApplication {
    pub id: i64,
    pub name_first: String,
    pub name_last: String,
    pub email: String,
    pub municipality: String,
    pub url: String,
    pub twitter: String,
    pub description: String,
    pub application_reviewed: bool,
    pub czar_granted: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived review state of an application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewState {
    Pending,
    Undecided,
    Granted,
    Denied,
}

impl ReviewState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReviewState::Pending => "pending",
            ReviewState::Undecided => "undecided",
            ReviewState::Granted => "granted",
            ReviewState::Denied => "denied",
        }
    }
}

impl std::fmt::Display for ReviewState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl CzarApplication {
    /// Current review state. An unreviewed application is always `Pending`,
    /// regardless of any stored grant value.
    pub fn review_state(&self) -> ReviewState {
        if !self.application_reviewed {
            return ReviewState::Pending;
        }
        match self.czar_granted {
            None => ReviewState::Undecided,
            Some(true) => ReviewState::Granted,
            Some(false) => ReviewState::Denied,
        }
    }

    /// Grant decision as visible to callers; meaningless until reviewed.
    pub fn granted(&self) -> Option<bool> {
        if !self.application_reviewed {
            return None;
        }
        self.czar_granted
    }

    pub fn applicant(&self) -> String {
        format!("{} {} {}", self.name_first, self.name_last, self.email)
    }
}

impl std::fmt::Display for CzarApplication {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.applicant())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCzarApplicationRequest {
    pub name_first: String,
    pub name_last: String,
    pub email: String,
    pub municipality: Option<String>,
    pub url: Option<String>,
    pub twitter: Option<String>,
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn application(reviewed: bool, granted: Option<bool>) -> CzarApplication {
        CzarApplication {
            id: 1,
            name_first: "Jo".to_string(),
            name_last: "Vols".to_string(),
            email: "jo@example.org".to_string(),
            municipality: "Springfield".to_string(),
            url: String::new(),
            twitter: String::new(),
            description: "I want to help.".to_string(),
            application_reviewed: reviewed,
            czar_granted: granted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_review_state_mapping() {
        assert_eq!(application(false, None).review_state(), ReviewState::Pending);
        assert_eq!(
            application(true, None).review_state(),
            ReviewState::Undecided
        );
        assert_eq!(
            application(true, Some(true)).review_state(),
            ReviewState::Granted
        );
        assert_eq!(
            application(true, Some(false)).review_state(),
            ReviewState::Denied
        );
    }

    #[test]
    fn test_unreviewed_ignores_stored_grant() {
        // State consistency: a stored grant value is not visible until the
        // application has been reviewed.
        let app = application(false, Some(true));
        assert_eq!(app.review_state(), ReviewState::Pending);
        assert_eq!(app.granted(), None);
    }

    #[test]
    fn test_applicant_display() {
        let app = application(false, None);
        assert_eq!(app.to_string(), "Jo Vols jo@example.org");
    }
}
