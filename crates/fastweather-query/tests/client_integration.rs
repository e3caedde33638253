//! Integration tests for WeatherQueryClient using wiremock.
//!
//! These tests run the full request/retry/parse path against a mock
//! generateContent endpoint.

use std::time::{Duration, Instant};

use fastweather_query::{ClientSettings, QueryError, RetryConfig, Theme, WeatherQueryClient};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent";

/// Helper to wrap model text in a generateContent envelope
fn envelope(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [{
            "content": { "parts": [{ "text": text }], "role": "model" },
            "finishReason": "STOP"
        }]
    })
}

fn tokyo_payload() -> serde_json::Value {
    serde_json::json!({
        "location": "Tokyo, Japan",
        "temperature": "22°C",
        "weatherDescription": "Light rain",
        "windSpeed": "14 km/h",
        "aqi": "42",
        "highTemp": "24°C",
        "lowTemp": "17°C",
        "sunrise": "5:02 AM",
        "sunset": "6:51 PM",
        "weatherCode": 61
    })
}

fn client_for(server: &MockServer, retry: RetryConfig) -> WeatherQueryClient {
    WeatherQueryClient::new(ClientSettings {
        base_url: server.uri(),
        api_key: "integration-key".to_string(),
        retry,
        ..ClientSettings::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_valid_payload_round_trips_verbatim() {
    let mock_server = MockServer::start().await;
    let payload = tokyo_payload();

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&payload.to_string())))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, RetryConfig::default());
    let result = client.fetch_weather("Tokyo").await.unwrap();

    assert_eq!(serde_json::to_value(&result).unwrap(), payload);
    assert_eq!(result.theme(), Theme::Rainy);
    assert_eq!(result.aqi_value(), Some(42));
}

#[tokio::test]
async fn test_blank_city_makes_no_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, RetryConfig::default());

    for city in ["", "   "] {
        let err = client.fetch_weather(city).await.unwrap_err();
        assert!(matches!(err, QueryError::EmptyInput), "city {:?}", city);
    }

    let requests = mock_server.received_requests().await.unwrap();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn test_rate_limited_twice_then_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(2)
        .with_priority(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(&tokyo_payload().to_string())))
        .mount(&mock_server)
        .await;

    // Default backoff: 1s after the first 429, 2s after the second
    let client = client_for(&mock_server, RetryConfig::default());
    let started = Instant::now();
    let result = client.fetch_weather("Tokyo").await.unwrap();
    let elapsed = started.elapsed();

    assert_eq!(result.location, "Tokyo, Japan");
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 3);
    assert!(elapsed >= Duration::from_secs(3), "waited only {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(10), "waited {:?}", elapsed);
}

#[tokio::test]
async fn test_server_error_fails_after_one_call() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GENERATE_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, RetryConfig::default());
    let err = client.fetch_weather("Paris").await.unwrap_err();

    assert!(matches!(err, QueryError::HttpStatus { status: 500 }));
    assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_rate_limit_exhausted() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .expect(3)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, RetryConfig::new(3, 10, 100));
    let err = client.fetch_weather("Cairo").await.unwrap_err();

    assert!(matches!(err, QueryError::RateLimitExhausted { attempts: 3 }));
}

#[tokio::test]
async fn test_payload_without_location_is_no_data() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(r#"{"temperature":"20C"}"#)))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, RetryConfig::default());
    let err = client.fetch_weather("X").await.unwrap_err();

    assert!(matches!(err, QueryError::NoData));
    assert_eq!(
        err.user_message(),
        "Could not find weather data for this location."
    );
}

#[tokio::test]
async fn test_non_json_body_is_malformed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("upstream proxy page"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server, RetryConfig::default());
    let err = client.fetch_weather("Quito").await.unwrap_err();

    assert!(matches!(err, QueryError::MalformedResponse(_)));
}
