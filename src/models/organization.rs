//! Organization model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Category of a political organization.
///
/// Stored as a Postgres enum; unknown input parses to `Uncategorized` so new
/// categories can be added without breaking old records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "organization_type", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum OrganizationType {
    Democratic,
    GoverningBody,
    Progressive,
    Candidate,
    Uncategorized,
}

impl OrganizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrganizationType::Democratic => "democratic",
            OrganizationType::GoverningBody => "governing-body",
            OrganizationType::Progressive => "progressive",
            OrganizationType::Candidate => "candidate",
            OrganizationType::Uncategorized => "uncategorized",
        }
    }

    /// Human-readable label for admin-style listings.
    pub fn label(&self) -> &'static str {
        match self {
            OrganizationType::Democratic => "Democratic Party Organization",
            OrganizationType::GoverningBody => "Governing Body",
            OrganizationType::Progressive => "Progressive Organization",
            OrganizationType::Candidate => "Political Candidate",
            OrganizationType::Uncategorized => "Uncategorized",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "democratic" => OrganizationType::Democratic,
            "governing-body" => OrganizationType::GoverningBody,
            "progressive" => OrganizationType::Progressive,
            "candidate" => OrganizationType::Candidate,
            _ => OrganizationType::Uncategorized,
        }
    }
}

impl Default for OrganizationType {
    fn default() -> Self {
        OrganizationType::Uncategorized
    }
}

impl std::fmt::Display for OrganizationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub slug: String,
    pub organization_type: OrganizationType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl std::fmt::Display for Organization {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrganizationRequest {
    pub title: String,
    pub url: Option<String>,
    /// Pre-assigned slug; derived from the title when absent.
    pub slug: Option<String>,
    pub organization_type: Option<OrganizationType>,
}

/// Partial update; the slug is immutable after creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrganizationRequest {
    pub title: Option<String>,
    pub url: Option<String>,
    pub organization_type: Option<OrganizationType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_values() {
        assert_eq!(
            OrganizationType::parse("governing-body"),
            OrganizationType::GoverningBody
        );
        assert_eq!(
            OrganizationType::parse("democratic"),
            OrganizationType::Democratic
        );
    }

    #[test]
    fn test_parse_unknown_is_uncategorized() {
        assert_eq!(
            OrganizationType::parse("advocacy"),
            OrganizationType::Uncategorized
        );
        assert_eq!(OrganizationType::parse(""), OrganizationType::Uncategorized);
    }

    #[test]
    fn test_as_str_round_trip() {
        for ty in [
            OrganizationType::Democratic,
            OrganizationType::GoverningBody,
            OrganizationType::Progressive,
            OrganizationType::Candidate,
            OrganizationType::Uncategorized,
        ] {
            assert_eq!(OrganizationType::parse(ty.as_str()), ty);
        }
    }
}
