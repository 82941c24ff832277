//! Geocoding service implementation
//!
//! This service resolves a free-text address into a latitude/longitude pair
//! via an external Nominatim-style API, including HTTP client setup, response
//! parsing, Redis result caching and error classification. The cache is
//! optional; without it every call goes to the API.

use std::time::Duration;

use redis::AsyncCommands;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::settings::Settings;
use crate::models::venue::GeoPoint;
use crate::utils::errors::{GeocodingError, Result, SigoError};

/// One candidate returned by the geocoding API
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeocodeCandidate {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Geocoding service for resolving venue addresses
#[derive(Debug, Clone)]
pub struct GeocodingService {
    client: Client,
    cache: Option<redis::Client>,
    settings: Settings,
}

impl GeocodingService {
    /// Create a new GeocodingService instance
    pub fn new(cache: Option<redis::Client>, settings: Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.geocoding.timeout_seconds))
            .user_agent("Sigo/0.1")
            .build()
            .map_err(SigoError::Http)?;

        Ok(Self {
            client,
            cache,
            settings,
        })
    }

    /// Resolve an address to a point.
    ///
    /// Fails with [`GeocodingError::NotFound`] when the address is unmapped,
    /// and with a transient variant when the service misbehaves.
    pub async fn geocode(&self, address: &str) -> Result<GeoPoint> {
        if address.trim().is_empty() {
            return Err(SigoError::Geocoding(GeocodingError::NotFound));
        }

        if let Some(point) = self.get_cached(address).await? {
            debug!(address = address, "Found cached geocode result");
            return Ok(point);
        }

        let point = self.request_geocode(address).await?;
        self.cache_point(address, point).await?;

        Ok(point)
    }

    /// Check if geocoding is enabled
    pub fn is_enabled(&self) -> bool {
        self.settings.features.geocoding
    }

    /// Ping the result cache, if one is configured
    pub async fn cache_health(&self) -> bool {
        let Some(client) = &self.cache else {
            return false;
        };
        match client.get_async_connection().await {
            Ok(mut conn) => redis::cmd("PING")
                .query_async::<_, String>(&mut conn)
                .await
                .is_ok(),
            Err(_) => false,
        }
    }

    /// Get cached result from Redis
    async fn get_cached(&self, address: &str) -> Result<Option<GeoPoint>> {
        let Some(client) = self.cache_client() else {
            return Ok(None);
        };
        let mut conn = client.get_async_connection().await.map_err(SigoError::Redis)?;

        let cache_key = self.cache_key(address);
        let cached: Option<String> = conn.get(&cache_key).await.map_err(SigoError::Redis)?;

        if let Some(data) = cached {
            match serde_json::from_str::<GeoPoint>(&data) {
                Ok(point) => return Ok(Some(point)),
                Err(e) => {
                    warn!(address = address, error = %e, "Failed to deserialize cached geocode result");
                    // Remove corrupted cache entry
                    let _: () = conn.del(&cache_key).await.map_err(SigoError::Redis)?;
                }
            }
        }

        Ok(None)
    }

    /// Cache a resolved point in Redis
    async fn cache_point(&self, address: &str, point: GeoPoint) -> Result<()> {
        let Some(client) = self.cache_client() else {
            return Ok(());
        };
        let mut conn = client.get_async_connection().await.map_err(SigoError::Redis)?;

        let cache_key = self.cache_key(address);
        let serialized = serde_json::to_string(&point).map_err(SigoError::Serialization)?;

        let _: () = conn
            .set_ex(&cache_key, serialized, self.settings.redis.ttl_seconds)
            .await
            .map_err(SigoError::Redis)?;

        debug!(address = address, "Cached geocode result");
        Ok(())
    }

    fn cache_client(&self) -> Option<&redis::Client> {
        if !self.settings.features.geocode_cache {
            return None;
        }
        self.cache.as_ref()
    }

    fn cache_key(&self, address: &str) -> String {
        format!("{}geocode:{}", self.settings.redis.prefix, address)
    }

    /// Make the actual geocoding API request
    async fn request_geocode(&self, address: &str) -> Result<GeoPoint> {
        debug!(address = address, "Making geocoding API request");

        let response = self
            .client
            .get(&self.settings.geocoding.api_url)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SigoError::Geocoding(GeocodingError::Timeout)
                } else if e.is_connect() {
                    SigoError::Geocoding(GeocodingError::ServiceUnavailable)
                } else {
                    SigoError::Geocoding(GeocodingError::RequestFailed(e.to_string()))
                }
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SigoError::Geocoding(GeocodingError::RequestFailed(
                format!("HTTP {}: {}", status, error_text),
            )));
        }

        let candidates: Vec<GeocodeCandidate> = response
            .json()
            .await
            .map_err(|e| SigoError::Geocoding(GeocodingError::InvalidResponse(e.to_string())))?;

        let Some(best) = candidates.into_iter().next() else {
            debug!(address = address, "Address not found by geocoding API");
            return Err(SigoError::Geocoding(GeocodingError::NotFound));
        };

        let point = parse_candidate(&best)
            .map_err(|e| SigoError::Geocoding(GeocodingError::InvalidResponse(e)))?;

        debug!(
            address = address,
            latitude = point.latitude,
            longitude = point.longitude,
            "Address geocoded"
        );
        Ok(point)
    }
}

fn parse_candidate(candidate: &GeocodeCandidate) -> std::result::Result<GeoPoint, String> {
    let latitude: f64 = candidate
        .lat
        .parse()
        .map_err(|_| format!("bad latitude: {}", candidate.lat))?;
    let longitude: f64 = candidate
        .lon
        .parse()
        .map_err(|_| format!("bad longitude: {}", candidate.lon))?;
    Ok(GeoPoint {
        latitude,
        longitude,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_deserialization() {
        let json = r#"[{"lat": "39.7990", "lon": "-89.6440", "display_name": "City Hall"}]"#;
        let candidates: Vec<GeocodeCandidate> = serde_json::from_str(json).unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].lat, "39.7990");
    }

    #[test]
    fn test_empty_response_deserialization() {
        let json = "[]";
        let candidates: Vec<GeocodeCandidate> = serde_json::from_str(json).unwrap();
        assert!(candidates.is_empty());
    }

    #[test]
    fn test_parse_candidate() {
        let candidate = GeocodeCandidate {
            lat: "39.7990".to_string(),
            lon: "-89.6440".to_string(),
            display_name: None,
        };
        let point = parse_candidate(&candidate).unwrap();
        assert!((point.latitude - 39.7990).abs() < f64::EPSILON);
        assert!((point.longitude + 89.6440).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_candidate_rejects_garbage() {
        let candidate = GeocodeCandidate {
            lat: "north".to_string(),
            lon: "-89.6440".to_string(),
            display_name: None,
        };
        assert!(parse_candidate(&candidate).is_err());
    }
}
