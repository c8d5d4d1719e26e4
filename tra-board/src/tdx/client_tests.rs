//! HTTP-level tests for the station data client against mock TDX servers.

use std::sync::Arc;

use httpmock::Method::{GET, POST};
use httpmock::MockServer;
use serde_json::{Value, json};

use super::clock::ManualClock;
use super::*;
use crate::domain::StationId;

const TIMETABLE_PATH: &str = "/v3/Rail/TRA/GeneralStationTimetable/Station/1000";
const LIVE_BOARD_PATH: &str = "/v3/Rail/TRA/LiveBoard/Station/1000";

fn timetable_payload() -> Value {
    json!({
        "UpdateTime": "2024-01-01T00:00:00+08:00",
        "StationTimetables": [{
            "StationName": {"Zh_tw": "臺北"},
            "Timetables": [{
                "TrainNo": "123",
                "TrainTypeName": {"Zh_tw": "自強(381)"},
                "DestinationStationName": {"Zh_tw": "高雄"},
                "DepartureTime": "08:00",
                "Sequence": 1
            }]
        }]
    })
}

fn oauth_client(server: &MockServer) -> StationDataClient {
    let config = TdxConfig::new("client-id", "client-secret")
        .with_base_url(server.base_url())
        .with_token_url(server.url("/token"));
    StationDataClient::new(config).unwrap()
}

fn hmac_client(server: &MockServer, clock: Arc<ManualClock>) -> StationDataClient {
    let config = TdxConfig::new("app-id", "test")
        .with_auth_mode(AuthMode::Hmac)
        .with_board(Board::LiveBoard)
        .with_base_url(server.base_url());
    StationDataClient::with_clock(config, clock).unwrap()
}

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(200)
                .json_body(json!({"access_token": "tok-1", "expires_in": 86400}));
        })
        .await
}

#[tokio::test]
async fn end_to_end_timetable() {
    let server = MockServer::start_async().await;
    let token = mock_token(&server).await;
    let data = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(TIMETABLE_PATH)
                .header("authorization", "Bearer tok-1")
                .header("accept", "application/json");
            then.status(200).json_body(timetable_payload());
        })
        .await;

    let client = oauth_client(&server);
    let station = StationId::parse("1000").unwrap();
    let got = client.fetch_station_data(Some(&station)).await.unwrap();

    assert_eq!(got, timetable_payload());
    token.assert_hits_async(1).await;
    data.assert_hits_async(1).await;
}

#[tokio::test]
async fn payload_passes_through_unmodified() {
    let payload = json!({
        "UpdateTime": "2024-01-01T00:00:00+08:00",
        "UpdateInterval": 60,
        "Unexpected": {"nested": [1, null, "x"]},
        "StationTimetables": [{
            "Timetables": ["garbage", null, {"NoTrainNo": true}]
        }]
    });
    let body = payload.to_string();

    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(TIMETABLE_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .body(body);
        })
        .await;

    let got = oauth_client(&server).fetch_station_data(None).await.unwrap();
    assert_eq!(got, payload);
    assert_eq!(got.to_string(), payload.to_string());
}

#[tokio::test]
async fn default_station_when_none_given() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let data = server
        .mock_async(|when, then| {
            when.method(GET).path(TIMETABLE_PATH);
            then.status(200).json_body(json!({}));
        })
        .await;

    let client = oauth_client(&server);
    assert_eq!(client.default_station().as_str(), "1000");
    client.fetch_station_data(None).await.unwrap();
    data.assert_hits_async(1).await;
}

#[tokio::test]
async fn token_reused_across_fetches() {
    let server = MockServer::start_async().await;
    let token = mock_token(&server).await;
    let data = server
        .mock_async(|when, then| {
            when.method(GET).path(TIMETABLE_PATH);
            then.status(200).json_body(json!({}));
        })
        .await;

    let client = oauth_client(&server);
    for _ in 0..3 {
        client.fetch_station_data(None).await.unwrap();
    }

    token.assert_hits_async(1).await;
    data.assert_hits_async(3).await;
}

#[tokio::test]
async fn upstream_failure_is_not_retried() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    let data = server
        .mock_async(|when, then| {
            when.method(GET).path(TIMETABLE_PATH);
            then.status(401).body(r#"{"message":"invalid token"}"#);
        })
        .await;

    let err = oauth_client(&server)
        .fetch_station_data(None)
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("401"), "{message}");
    assert!(message.contains(r#"{"message":"invalid token"}"#), "{message}");
    assert_eq!(err.status(), Some(401));
    data.assert_hits_async(1).await;
}

#[tokio::test]
async fn token_failure_prevents_data_request() {
    let server = MockServer::start_async().await;
    let token = server
        .mock_async(|when, then| {
            when.method(POST).path("/token");
            then.status(500).body("boom");
        })
        .await;
    let data = server
        .mock_async(|when, then| {
            when.method(GET).path(TIMETABLE_PATH);
            then.status(200).json_body(json!({}));
        })
        .await;

    let err = oauth_client(&server)
        .fetch_station_data(None)
        .await
        .unwrap_err();

    assert!(matches!(err, TdxError::TokenAcquisition { status: Some(500), .. }));
    token.assert_hits_async(1).await;
    data.assert_hits_async(0).await;
}

#[tokio::test]
async fn missing_credentials_make_no_requests() {
    let server = MockServer::start_async().await;
    let token = mock_token(&server).await;
    let data = server
        .mock_async(|when, then| {
            when.method(GET);
            then.status(200).json_body(json!({}));
        })
        .await;

    for mode in [AuthMode::OAuth, AuthMode::Hmac] {
        let config = TdxConfig::new("", "")
            .with_auth_mode(mode)
            .with_base_url(server.base_url())
            .with_token_url(server.url("/token"));
        let client = StationDataClient::new(config).unwrap();

        let err = client.fetch_station_data(None).await.unwrap_err();
        assert!(err.is_configuration(), "{mode:?}: {err}");
    }

    token.assert_hits_async(0).await;
    data.assert_hits_async(0).await;
}

#[tokio::test]
async fn hmac_signed_live_board() {
    let payload = json!({
        "UpdateTime": "2024-01-01T08:00:00+08:00",
        "StationLiveBoards": [{
            "TrainNo": "111",
            "DelayTime": 5
        }]
    });

    let server = MockServer::start_async().await;
    let data = server
        .mock_async(|when, then| {
            when.method(GET)
                .path(LIVE_BOARD_PATH)
                .header("x-date", "Mon, 01 Jan 2024 00:00:00 GMT")
                .header(
                    "authorization",
                    r#"hmac username="app-id",algorithm="hmac-sha1",headers="x-date",signature="IbA8GKtubjQb9SbLAhyxY2FOhY8=""#,
                );
            then.status(200).json_body(payload.clone());
        })
        .await;

    let clock = Arc::new(ManualClock::at("2024-01-01T00:00:00Z"));
    let got = hmac_client(&server, clock)
        .fetch_station_data(None)
        .await
        .unwrap();

    assert_eq!(got, payload);
    data.assert_hits_async(1).await;
}

#[tokio::test]
async fn non_json_body() {
    let server = MockServer::start_async().await;
    mock_token(&server).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(TIMETABLE_PATH);
            then.status(200).body("<html>maintenance</html>");
        })
        .await;

    let err = oauth_client(&server)
        .fetch_station_data(None)
        .await
        .unwrap_err();

    match err {
        TdxError::Json { body, .. } => assert_eq!(body.as_deref(), Some("<html>maintenance</html>")),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_upstream_is_transport_error() {
    let config = TdxConfig::new("app-id", "test")
        .with_auth_mode(AuthMode::Hmac)
        .with_base_url("http://127.0.0.1:1");
    let client = StationDataClient::new(config).unwrap();

    let err = client.fetch_station_data(None).await.unwrap_err();
    assert!(matches!(err, TdxError::Transport(_)), "{err}");
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path(LIVE_BOARD_PATH);
            then.status(200)
                .delay(std::time::Duration::from_secs(3))
                .json_body(json!({}));
        })
        .await;

    let config = TdxConfig::new("app-id", "test")
        .with_auth_mode(AuthMode::Hmac)
        .with_board(Board::LiveBoard)
        .with_base_url(server.base_url())
        .with_timeout(1);
    let client = StationDataClient::new(config).unwrap();

    match client.fetch_station_data(None).await.unwrap_err() {
        TdxError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("unexpected error: {other}"),
    }
}
