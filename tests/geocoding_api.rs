//! Integration tests for the geocoding service against a mock HTTP API

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sigo::config::Settings;
use sigo::services::GeocodingService;
use sigo::utils::errors::{GeocodingError, SigoError};

fn test_settings(api_url: String) -> Settings {
    let mut settings = Settings::default();
    settings.geocoding.api_url = api_url;
    settings.geocoding.timeout_seconds = 2;
    settings.features.geocode_cache = false;
    settings
}

#[tokio::test]
async fn resolves_an_address_to_a_point() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "300 S 2nd St, Springfield, IL"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "39.7990", "lon": "-89.6553", "display_name": "Illinois State Capitol"}
        ])))
        .mount(&server)
        .await;

    let settings = test_settings(format!("{}/search", server.uri()));
    let service = GeocodingService::new(None, settings).unwrap();

    let point = service
        .geocode("300 S 2nd St, Springfield, IL")
        .await
        .unwrap();
    assert!((point.latitude - 39.7990).abs() < 1e-9);
    assert!((point.longitude + 89.6553).abs() < 1e-9);
}

#[tokio::test]
async fn takes_the_first_candidate_when_several_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"lat": "40.0", "lon": "-88.0"},
            {"lat": "41.0", "lon": "-87.0"}
        ])))
        .mount(&server)
        .await;

    let settings = test_settings(format!("{}/search", server.uri()));
    let service = GeocodingService::new(None, settings).unwrap();

    let point = service.geocode("Main St").await.unwrap();
    assert!((point.latitude - 40.0).abs() < 1e-9);
}

#[tokio::test]
async fn unmapped_address_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let settings = test_settings(format!("{}/search", server.uri()));
    let service = GeocodingService::new(None, settings).unwrap();

    let err = service.geocode("nowhere in particular").await.unwrap_err();
    assert_matches!(err, SigoError::Geocoding(GeocodingError::NotFound));
}

#[tokio::test]
async fn server_error_is_a_failed_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let settings = test_settings(format!("{}/search", server.uri()));
    let service = GeocodingService::new(None, settings).unwrap();

    let err = service.geocode("City Hall").await.unwrap_err();
    assert_matches!(err, SigoError::Geocoding(GeocodingError::RequestFailed(_)));
}

#[tokio::test]
async fn malformed_body_is_an_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let settings = test_settings(format!("{}/search", server.uri()));
    let service = GeocodingService::new(None, settings).unwrap();

    let err = service.geocode("City Hall").await.unwrap_err();
    assert_matches!(err, SigoError::Geocoding(GeocodingError::InvalidResponse(_)));
}

#[tokio::test]
async fn blank_address_never_hits_the_api() {
    // No mock mounted: a request would 404 and surface as RequestFailed.
    let server = MockServer::start().await;
    let settings = test_settings(format!("{}/search", server.uri()));
    let service = GeocodingService::new(None, settings).unwrap();

    let err = service.geocode("   ").await.unwrap_err();
    assert_matches!(err, SigoError::Geocoding(GeocodingError::NotFound));
}
