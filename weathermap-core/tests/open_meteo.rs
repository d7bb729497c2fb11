//! Forecast client against a mock Open-Meteo server

use serde_json::json;
use weathermap_core::forecast::CURRENT_FIELDS;
use weathermap_core::{
    ErrorKind, GeoPoint, LookupError, OpenMeteoClient, ServiceEndpoints, WeatherClient,
};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn current_payload() -> serde_json::Value {
    json!({
        "latitude": 40.0,
        "longitude": -3.0,
        "timezone": "Europe/Madrid",
        "current": {
            "time": "2024-05-01T12:00",
            "temperature_2m": 22.3,
            "relative_humidity_2m": 41,
            "apparent_temperature": 21.1,
            "weather_code": 3,
            "wind_speed_10m": 11.26,
            "surface_pressure": 941.7
        }
    })
}

async fn client_for(server: &MockServer) -> OpenMeteoClient {
    OpenMeteoClient::new(&ServiceEndpoints::with_base(&server.uri())).unwrap()
}

#[tokio::test]
async fn test_fetch_current_sends_forecast_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "40"))
        .and(query_param("longitude", "-3"))
        .and(query_param("current", CURRENT_FIELDS))
        .and(query_param("timezone", "auto"))
        .respond_with(ResponseTemplate::new(200).set_body_json(current_payload()))
        .expect(1)
        .mount(&server)
        .await;

    let snapshot = client_for(&server)
        .await
        .fetch_current(GeoPoint::new(40.0, -3.0))
        .await
        .unwrap();

    assert_eq!(snapshot.temperature_c, 22.3);
    assert_eq!(snapshot.feels_like_c, 21.1);
    assert_eq!(snapshot.humidity_pct, 41.0);
    assert_eq!(snapshot.wind_speed_kmh, 11.26);
    assert_eq!(snapshot.pressure_hpa, 941.7);
    assert_eq!(snapshot.condition_code, 3);
    assert_eq!(snapshot.timezone, "Europe/Madrid");
}

#[tokio::test]
async fn test_missing_timezone_is_service_error() {
    let server = MockServer::start().await;
    let mut payload = current_payload();
    payload.as_object_mut().unwrap().remove("timezone");
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(payload))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .fetch_current(GeoPoint::new(40.0, -3.0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Service);
    assert!(matches!(err, LookupError::Payload { .. }));
}

#[tokio::test]
async fn test_missing_current_field_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "timezone": "UTC",
            "current": { "temperature_2m": 1.0 }
        })))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .fetch_current(GeoPoint::new(0.0, 0.0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Service);
}

#[tokio::test]
async fn test_error_status_is_service_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .fetch_current(GeoPoint::new(0.0, 0.0))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Service);
    assert_eq!(err.to_string(), "Weather API error: 500");
}
