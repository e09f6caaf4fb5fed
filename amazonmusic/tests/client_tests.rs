//! Tests for the album lookup against a mock Amazon Music server.

use std::sync::Arc;

use amazonmusic::{Client, ClientError, Session};
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LOOKUP_PATH: &str = "/EU/api/muse/legacy/lookup";

fn session(server: &MockServer) -> Session {
    Session {
        base_url: server.uri(),
        region: "EU".to_string(),
        territory: "GB".to_string(),
        device_id: "device-123".to_string(),
        device_type: "A16ZV8BU3SN1N3".to_string(),
        customer_id: "customer-456".to_string(),
        cookies: "session-id=abc; ubid-acbuk=def".to_string(),
        csrf_token: "token".to_string(),
        csrf_rnd: "rnd".to_string(),
        csrf_ts: "1700000000".to_string(),
    }
}

fn album_json() -> serde_json::Value {
    json!({
        "asin": "B001",
        "title": "X",
        "artist": { "name": "Y" },
        "image": "https://images.example/x.jpg",
        "reviews": { "average": 4.0 },
        "trackCount": 2,
        "originalReleaseDate": 1000000000000_i64,
        "tracks": [
            { "asin": "T1", "title": "One" },
            { "asin": "T2", "title": "Two" }
        ]
    })
}

#[tokio::test]
async fn test_lookup_sends_expected_request() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOOKUP_PATH))
        .and(header(
            "X-Amz-Target",
            "com.amazon.musicensembleservice.MusicEnsembleService.lookup",
        ))
        .and(header("Content-Encoding", "amz-1.0"))
        .and(header("Content-Type", "application/json"))
        .and(header("csrf-token", "token"))
        .and(header("csrf-rnd", "rnd"))
        .and(header("csrf-ts", "1700000000"))
        .and(header("Cookie", "session-id=abc; ubid-acbuk=def"))
        .and(body_json(json!({
            "asins": ["B001"],
            "features": [
                "popularity",
                "expandTracklist",
                "trackLibraryAvailability",
                "collectionLibraryAvailability"
            ],
            "requestedContent": "MUSIC_SUBSCRIPTION",
            "deviceId": "device-123",
            "deviceType": "A16ZV8BU3SN1N3",
            "musicTerritory": "GB",
            "customerId": "customer-456"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "albumList": [album_json(), { "asin": "B999" }]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::new(session(&mock_server));
    let album = client.lookup_album_json("B001").await.unwrap();

    assert_eq!(album, album_json());
}

#[tokio::test]
async fn test_get_album_needs_no_second_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "albumList": [album_json()]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Arc::new(Client::new(session(&mock_server)));
    let mut album = client.get_album("B001").await.unwrap();

    assert_eq!(album.id(), "B001");
    assert_eq!(album.artist(), "Y");
    assert_eq!(album.release_date(), Some(1_000_000_000));

    let tracks = album.tracks().await.unwrap();
    let ids: Vec<_> = tracks.iter().filter_map(|t| t.id.as_deref()).collect();
    assert_eq!(ids, ["T1", "T2"]);
}

#[tokio::test]
async fn test_empty_album_list_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "albumList": [] })))
        .mount(&mock_server)
        .await;

    let client = Client::new(session(&mock_server));
    match client.lookup_album_json("B404").await {
        Err(ClientError::NotFound { asin }) => assert_eq!(asin, "B404"),
        other => panic!("Expected NotFound error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_error_status_is_service_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Session expired"))
        .mount(&mock_server)
        .await;

    let client = Client::new(session(&mock_server));
    match client.lookup_album_json("B001").await {
        Err(ClientError::ServiceError { status, message }) => {
            assert_eq!(status, 401);
            assert_eq!(message.as_deref(), Some("Session expired"));
        }
        other => panic!("Expected ServiceError, got {other:?}"),
    }
}

#[tokio::test]
async fn test_invalid_json_is_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(LOOKUP_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string("not valid json"))
        .mount(&mock_server)
        .await;

    let client = Client::new(session(&mock_server));
    assert!(matches!(
        client.lookup_album_json("B001").await,
        Err(ClientError::DeserializationError(_))
    ));
}
