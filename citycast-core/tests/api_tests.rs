//! Integration tests for the dataset and weather clients using wiremock.

use std::time::Duration;

use citycast_core::api::{http_client, DatasetClient, WeatherClient, DATASET_ID};
use citycast_core::city::COUNTRY_PLACEHOLDER;
use citycast_core::error::ApiError;
use citycast_core::{PageRequest, Units};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> reqwest::Client {
    http_client(Duration::from_secs(5)).unwrap()
}

fn owm_current(name: &str, description: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "weather": [{ "description": description, "icon": "01d" }],
        "main": {
            "temp": 21.5,
            "temp_min": 19.0,
            "temp_max": 23.0,
            "humidity": 40,
            "pressure": 1015
        },
        "wind": { "speed": 3.6 }
    })
}

fn owm_slot(dt_txt: &str) -> serde_json::Value {
    serde_json::json!({
        "dt_txt": dt_txt,
        "weather": [{ "description": "light rain", "icon": "10d" }],
        "main": { "temp": 15.0, "temp_min": 14.0, "temp_max": 16.0 }
    })
}

#[tokio::test]
async fn test_fetch_page_sends_offset_and_normalizes() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/1.0/search/"))
        .and(query_param("dataset", DATASET_ID))
        .and(query_param("start", "100"))
        .and(query_param("rows", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "records": [
                { "fields": {
                    "name": "Paris",
                    "country": "FR",
                    "timezone": "Europe/Paris",
                    "population": 2138551
                }},
                { "fields": {
                    "name": "Linked",
                    "country": "https://sws.geonames.org/countries/#US",
                    "timezone": "America/New_York"
                }}
            ]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dataset = DatasetClient::new(client(), mock_server.uri());
    let cities = dataset.fetch_page(PageRequest::first_attempt(1)).await.unwrap();

    assert_eq!(cities.len(), 2);
    assert_eq!(cities[0].name, "Paris");
    assert_eq!(cities[0].population, 2138551);
    assert_eq!(cities[1].country, COUNTRY_PLACEHOLDER);
    assert_eq!(cities[1].population, 0);
}

#[tokio::test]
async fn test_fetch_page_empty_records() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/1.0/search/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "nhits": 0,
            "records": []
        })))
        .mount(&mock_server)
        .await;

    let dataset = DatasetClient::new(client(), mock_server.uri());
    let cities = dataset.fetch_page(PageRequest::first_attempt(0)).await.unwrap();
    assert!(cities.is_empty());
}

#[tokio::test]
async fn test_fetch_page_server_error_is_retryable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/records/1.0/search/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let dataset = DatasetClient::new(client(), mock_server.uri());
    let err = dataset.fetch_page(PageRequest::first_attempt(0)).await.unwrap_err();

    assert!(matches!(err, ApiError::Status { status: 503, .. }));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_fetch_page_timeout_is_retryable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "records": [] }))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let http = http_client(Duration::from_millis(50)).unwrap();
    let dataset = DatasetClient::new(http, mock_server.uri());
    let err = dataset.fetch_page(PageRequest::first_attempt(0)).await.unwrap_err();

    assert!(matches!(err, ApiError::Request(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_current_weather() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .and(query_param("q", "New York"))
        .and(query_param("appid", "test-key"))
        .and(query_param("units", "metric"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(owm_current("New York", "clear sky")),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let weather = WeatherClient::new(client(), mock_server.uri(), Some("test-key".into()));
    let current = weather.current("New York", Units::Metric).await.unwrap();

    assert_eq!(current.name, "New York");
    assert_eq!(current.description, "clear sky");
    assert_eq!(current.humidity, 40.0);
    assert_eq!(current.pressure, 1015.0);
    assert_eq!(current.wind_speed, 3.6);
}

#[tokio::test]
async fn test_unknown_city_is_not_retryable() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "cod": "404",
            "message": "city not found"
        })))
        .mount(&mock_server)
        .await;

    let weather = WeatherClient::new(client(), mock_server.uri(), Some("k".into()));
    let err = weather.current("Atlantis", Units::Metric).await.unwrap_err();

    match &err {
        ApiError::Status { status, message } => {
            assert_eq!(*status, 404);
            assert_eq!(message, "city not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_current_without_conditions_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/weather"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "Nowhere",
            "weather": [],
            "main": { "temp": 1.0, "temp_min": 0.0, "temp_max": 2.0 }
        })))
        .mount(&mock_server)
        .await;

    let weather = WeatherClient::new(client(), mock_server.uri(), Some("k".into()));
    let err = weather.current("Nowhere", Units::Metric).await.unwrap_err();
    assert!(matches!(err, ApiError::Decode(_)));
}

#[tokio::test]
async fn test_forecast_imperial() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("units", "imperial"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "cnt": 3,
            "list": [
                owm_slot("2024-05-01 00:00:00"),
                owm_slot("2024-05-01 03:00:00"),
                owm_slot("2024-05-01 06:00:00")
            ]
        })))
        .mount(&mock_server)
        .await;

    let weather = WeatherClient::new(client(), mock_server.uri(), Some("k".into()));
    let forecast = weather.forecast("Boston", Units::Imperial).await.unwrap();

    assert_eq!(forecast.len(), 3);
    assert_eq!(forecast[1].timestamp, "2024-05-01 03:00:00");
    assert_eq!(forecast[1].icon, "10d");
}

#[tokio::test]
async fn test_missing_api_key_never_hits_network() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let weather = WeatherClient::new(client(), mock_server.uri(), None);
    let err = weather.forecast("Paris", Units::Metric).await.unwrap_err();
    assert!(matches!(err, ApiError::MissingApiKey));
}
