//! Venue model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A geocoded latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Venue {
    pub id: i64,
    pub title: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub slug: String,
    pub phone: String,
    pub url: String,
    pub email: String,
    pub description: String,
    pub keywords: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Venue {
    /// The geocoded point, if the venue has been geocoded.
    pub fn point(&self) -> Option<GeoPoint> {
        match (self.latitude, self.longitude) {
            (Some(latitude), Some(longitude)) => Some(GeoPoint {
                latitude,
                longitude,
            }),
            _ => None,
        }
    }

    /// Composite address handed to the geocoding collaborator.
    pub fn full_address(&self) -> String {
        [
            self.address.as_str(),
            self.city.as_str(),
            self.state.as_str(),
            self.zipcode.as_str(),
        ]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
    }
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVenueRequest {
    pub title: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: Option<String>,
    /// Pre-assigned slug (e.g. admin-prepopulated); derived from the title
    /// when absent.
    pub slug: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

/// Partial update. Carries no slug or point on purpose: both are derived
/// exactly once at creation and never recomputed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVenueRequest {
    pub title: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zipcode: Option<String>,
    pub phone: Option<String>,
    pub url: Option<String>,
    pub email: Option<String>,
    pub description: Option<String>,
    pub keywords: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn venue() -> Venue {
        Venue {
            id: 1,
            title: "City Hall".to_string(),
            address: "123 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zipcode: "62701".to_string(),
            slug: "city-hall".to_string(),
            phone: String::new(),
            url: String::new(),
            email: String::new(),
            description: String::new(),
            keywords: String::new(),
            latitude: None,
            longitude: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_address_joins_parts() {
        let v = venue();
        assert_eq!(v.full_address(), "123 Main St, Springfield, IL, 62701");
    }

    #[test]
    fn test_full_address_skips_empty_zipcode() {
        let mut v = venue();
        v.zipcode = String::new();
        assert_eq!(v.full_address(), "123 Main St, Springfield, IL");
    }

    #[test]
    fn test_point_requires_both_coordinates() {
        let mut v = venue();
        assert!(v.point().is_none());
        v.latitude = Some(39.8);
        assert!(v.point().is_none());
        v.longitude = Some(-89.6);
        assert_eq!(
            v.point(),
            Some(GeoPoint {
                latitude: 39.8,
                longitude: -89.6
            })
        );
    }
}
