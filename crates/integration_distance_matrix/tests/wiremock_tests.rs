//! Integration tests for the distance matrix client (wiremock-based)

use std::time::Duration;

use domain::{AccountTier, Coordinate, TravelMode, UnitSystem};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use integration_distance_matrix::{
    CallContext, DISTANCE_MATRIX_PATH, DistanceMatrixApi, DistanceMatrixClient,
    DistanceMatrixConfig, DistanceMatrixError, ElementStatus,
};

fn config_for_mock(base_url: &str) -> DistanceMatrixConfig {
    DistanceMatrixConfig {
        base_url: base_url.to_string(),
        ..DistanceMatrixConfig::for_testing()
    }
}

fn coordinates(count: usize, latitude: f64) -> Vec<Coordinate> {
    (0..count)
        .map(|i| Coordinate::new(latitude, i as f64 / 100.0).unwrap())
        .collect()
}

fn pipe_param(request: &Request, name: &str) -> Vec<String> {
    request
        .url
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.split('|').map(ToString::to_string).collect())
        .unwrap_or_default()
}

/// Answers every call with a well-formed matrix for the requested coordinates
///
/// Addresses echo the coordinate strings and each element's distance encodes
/// its position, so merged order can be checked.
struct EchoMatrix;

impl Respond for EchoMatrix {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let origins = pipe_param(request, "origins");
        let destinations = pipe_param(request, "destinations");
        let rows: Vec<serde_json::Value> = origins
            .iter()
            .map(|origin| {
                let elements: Vec<serde_json::Value> = destinations
                    .iter()
                    .map(|destination| {
                        serde_json::json!({
                            "status": "OK",
                            "distance": { "text": format!("{origin} to {destination}"), "value": 1000 },
                            "duration": { "text": "10 mins", "value": 600 },
                        })
                    })
                    .collect();
                serde_json::json!({ "elements": elements })
            })
            .collect();

        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "origin_addresses": origins,
            "destination_addresses": destinations,
            "rows": rows,
            "status": "OK",
        }))
    }
}

async fn mount_echo(server: &MockServer, expected_calls: u64) {
    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(EchoMatrix)
        .expect(expected_calls)
        .mount(server)
        .await;
}

async fn mount_body(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn get(
    config: &DistanceMatrixConfig,
    origins: usize,
    destinations: usize,
) -> Result<integration_distance_matrix::DistanceMatrixResponse, DistanceMatrixError> {
    let client = DistanceMatrixApi::new(config).unwrap();
    client
        .get_distances(
            &coordinates(origins, 50.0),
            &coordinates(destinations, 51.0),
            TravelMode::Driving,
            &CallContext::new(),
        )
        .await
}

#[tokio::test]
async fn test_single_call_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .and(query_param("key", "test-key"))
        .and(query_param("mode", "driving"))
        .and(query_param("units", "metric"))
        .and(query_param("language", "en"))
        .and(query_param("origins", "50,0|50,0.01"))
        .respond_with(EchoMatrix)
        .expect(1)
        .mount(&server)
        .await;

    let response = get(&config_for_mock(&server.uri()), 2, 3).await.unwrap();

    assert_eq!(response.status, "OK");
    assert_eq!(response.origin_addresses, vec!["50,0", "50,0.01"]);
    assert_eq!(response.rows.len(), 2);
    assert!(response.rows.iter().all(|row| row.elements.len() == 3));
    let element = response.element(1, 2).unwrap();
    assert_eq!(element.status, ElementStatus::Ok);
    assert_eq!(element.distance.as_ref().unwrap().text, "50,0.01 to 51,0.02");
    assert_eq!(element.duration.as_ref().unwrap().value, 600);
}

#[tokio::test]
async fn test_oversized_request_is_split_and_merged() {
    let server = MockServer::start().await;
    mount_echo(&server, 2).await;

    let response = get(&config_for_mock(&server.uri()), 1, 101).await.unwrap();

    assert_eq!(response.rows.len(), 1);
    assert_eq!(response.rows[0].elements.len(), 101);
    assert_eq!(response.destination_addresses.len(), 101);
    assert_eq!(response.destination_addresses[0], "51,0");
    assert_eq!(response.destination_addresses[100], "51,1");
    assert_eq!(
        response.element(0, 100).unwrap().distance.as_ref().unwrap().text,
        "50,0 to 51,1"
    );

    let requests = server.received_requests().await.unwrap();
    let sizes: Vec<usize> = requests
        .iter()
        .map(|request| pipe_param(request, "destinations").len())
        .collect();
    assert_eq!(sizes, vec![50, 51]);
    assert!(
        requests
            .iter()
            .all(|request| pipe_param(request, "origins").len() == 1)
    );
}

#[tokio::test]
async fn test_origin_split_keeps_row_order() {
    let server = MockServer::start().await;
    mount_echo(&server, 3).await;

    let response = get(&config_for_mock(&server.uri()), 30, 10).await.unwrap();

    assert_eq!(response.rows.len(), 30);
    assert_eq!(response.origin_addresses.len(), 30);
    for (index, address) in response.origin_addresses.iter().enumerate() {
        let expected = coordinates(30, 50.0)[index].to_string();
        assert_eq!(address, &expected);
        let text = &response.element(index, 0).unwrap().distance.as_ref().unwrap().text;
        assert!(text.starts_with(&expected));
    }
}

#[tokio::test]
async fn test_for_work_tier_allows_larger_calls() {
    let server = MockServer::start().await;
    mount_echo(&server, 1).await;

    let config = DistanceMatrixConfig {
        account_tier: AccountTier::ForWork,
        max_url_length: 100_000,
        ..config_for_mock(&server.uri())
    };
    let response = get(&config, 25, 25).await.unwrap();
    assert_eq!(response.element_count(), 625);
}

#[tokio::test]
async fn test_url_length_limit_splits_request() {
    let server = MockServer::start().await;
    mount_echo(&server, 2).await;

    let config = DistanceMatrixConfig {
        max_url_length: 250,
        ..config_for_mock(&server.uri())
    };
    let response = get(&config, 1, 20).await.unwrap();
    assert_eq!(response.rows[0].elements.len(), 20);
}

#[tokio::test]
async fn test_imperial_units_and_language_sent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .and(query_param("units", "imperial"))
        .and(query_param("language", "en-GB"))
        .and(query_param("mode", "transit"))
        .respond_with(EchoMatrix)
        .expect(1)
        .mount(&server)
        .await;

    let config = DistanceMatrixConfig {
        units: UnitSystem::Imperial,
        language: "en-GB".to_string(),
        ..config_for_mock(&server.uri())
    };
    let client = DistanceMatrixApi::new(&config).unwrap();
    let response = client
        .get_distances(
            &coordinates(1, 50.0),
            &coordinates(1, 51.0),
            TravelMode::Transit,
            &CallContext::new(),
        )
        .await
        .unwrap();
    assert_eq!(response.element_count(), 1);
}

#[tokio::test]
async fn test_signed_request_carries_client_and_signature() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .and(query_param("client", "clientID"))
        .and(query_param_is_missing("key"))
        .and(|request: &Request| {
            request
                .url
                .query_pairs()
                .any(|(key, value)| key == "signature" && value.len() == 28)
        })
        .respond_with(EchoMatrix)
        .expect(1)
        .mount(&server)
        .await;

    let config = DistanceMatrixConfig {
        base_url: server.uri(),
        quota_wait_ms: 0,
        ..DistanceMatrixConfig::with_client_signature("clientID", "vNIXE0xscrmjlyV-12Nj_BvUPaw=")
    };
    let response = get(&config, 1, 2).await.unwrap();
    assert_eq!(response.element_count(), 2);
}

#[tokio::test]
async fn test_over_query_limit() {
    let server = MockServer::start().await;
    mount_body(&server, r#"{ "rows": [], "status": "OVER_QUERY_LIMIT" }"#).await;

    let err = get(&config_for_mock(&server.uri()), 1, 1).await.unwrap_err();
    assert!(matches!(err, DistanceMatrixError::OverQueryLimit));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_request_denied_carries_message() {
    let server = MockServer::start().await;
    mount_body(
        &server,
        r#"{ "rows": [], "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid." }"#,
    )
    .await;

    let err = get(&config_for_mock(&server.uri()), 1, 1).await.unwrap_err();
    match &err {
        DistanceMatrixError::RequestDenied { message } => {
            assert_eq!(message.as_deref(), Some("The provided API key is invalid."));
        },
        other => panic!("expected RequestDenied, got {other:?}"),
    }
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn test_invalid_request_and_max_elements() {
    let server = MockServer::start().await;
    mount_body(&server, r#"{ "rows": [], "status": "INVALID_REQUEST" }"#).await;
    let err = get(&config_for_mock(&server.uri()), 1, 1).await.unwrap_err();
    assert!(matches!(err, DistanceMatrixError::InvalidRequest));

    let server = MockServer::start().await;
    mount_body(&server, r#"{ "rows": [], "status": "MAX_ELEMENTS_EXCEEDED" }"#).await;
    let err = get(&config_for_mock(&server.uri()), 1, 1).await.unwrap_err();
    assert!(matches!(err, DistanceMatrixError::MaxElementsExceeded));
}

#[tokio::test]
async fn test_unknown_status_is_retryable_service_error() {
    let server = MockServer::start().await;
    mount_body(&server, r#"{ "rows": [], "status": "UNKNOWN_ERROR" }"#).await;

    let err = get(&config_for_mock(&server.uri()), 1, 1).await.unwrap_err();
    match &err {
        DistanceMatrixError::ServiceError { status } => assert_eq!(status, "UNKNOWN_ERROR"),
        other => panic!("expected ServiceError, got {other:?}"),
    }
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_row_count_mismatch() {
    let server = MockServer::start().await;
    mount_body(
        &server,
        r#"{ "rows": [ { "elements": [ { "status": "OK" } ] } ], "status": "OK" }"#,
    )
    .await;

    let err = get(&config_for_mock(&server.uri()), 2, 1).await.unwrap_err();
    assert!(matches!(
        err,
        DistanceMatrixError::RowCountMismatch {
            expected: 2,
            actual: 1
        }
    ));
}

#[tokio::test]
async fn test_element_count_mismatch() {
    let server = MockServer::start().await;
    mount_body(
        &server,
        r#"{ "rows": [ { "elements": [ { "status": "OK" } ] } ], "status": "OK" }"#,
    )
    .await;

    let err = get(&config_for_mock(&server.uri()), 1, 3).await.unwrap_err();
    assert!(matches!(
        err,
        DistanceMatrixError::ElementCountMismatch {
            row: 0,
            expected: 3,
            actual: 1
        }
    ));
}

#[tokio::test]
async fn test_malformed_body() {
    let server = MockServer::start().await;
    mount_body(&server, "<html>not json</html>").await;

    let err = get(&config_for_mock(&server.uri()), 1, 1).await.unwrap_err();
    assert!(matches!(err, DistanceMatrixError::ParseError(_)));
}

#[tokio::test]
async fn test_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let err = get(&config_for_mock(&server.uri()), 1, 1).await.unwrap_err();
    assert!(matches!(err, DistanceMatrixError::RequestFailed(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let err = get(&config_for_mock(&server.uri()), 1, 1).await.unwrap_err();
    assert!(matches!(
        err,
        DistanceMatrixError::RateLimitExceeded {
            retry_after_secs: Some(30)
        }
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_error_in_later_call_returns_no_partial_result() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(EchoMatrix)
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(DISTANCE_MATRIX_PATH))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = get(&config_for_mock(&server.uri()), 1, 250).await.unwrap_err();
    assert!(matches!(err, DistanceMatrixError::RequestFailed(_)));
}

#[tokio::test]
async fn test_expired_deadline_sends_nothing() {
    let server = MockServer::start().await;
    mount_echo(&server, 0).await;

    let client = DistanceMatrixApi::new(&config_for_mock(&server.uri())).unwrap();
    let result = client
        .get_distances(
            &coordinates(1, 50.0),
            &coordinates(101, 51.0),
            TravelMode::Driving,
            &CallContext::with_timeout(Duration::ZERO),
        )
        .await;

    assert!(matches!(result, Err(DistanceMatrixError::DeadlineExceeded)));
}

#[tokio::test]
async fn test_cancellation_during_quota_wait() {
    let server = MockServer::start().await;
    mount_echo(&server, 1).await;

    let config = DistanceMatrixConfig {
        quota_wait_ms: 60_000,
        ..config_for_mock(&server.uri())
    };
    let client = DistanceMatrixApi::new(&config).unwrap();
    let token = CancellationToken::new();
    let canceller = {
        let token = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            token.cancel();
        })
    };

    let result = client
        .get_distances(
            &coordinates(1, 50.0),
            &coordinates(101, 51.0),
            TravelMode::Driving,
            &CallContext::new().cancellation(token),
        )
        .await;

    assert!(matches!(result, Err(DistanceMatrixError::Cancelled)));
    canceller.await.unwrap();
}
