//! Integration tests using wiremock to simulate the PocketRadar API.

use http::{HeaderMap, HeaderValue, Method};
use pocketradar::api::HistoryQuery;
use pocketradar::params::Params;
use pocketradar::transport::RequestOptions;
use pocketradar::{Client, Credential, Error};
use serde::Serialize;
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> Client {
    Client::builder()
        .base_path(format!("{}/api", server.uri()))
        .unwrap()
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_set_access_token_logs_in_once() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .and(body_string("email=a%40b.com&password=x"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T123"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client
        .set_credential(Credential::new("a@b.com", "x"), false)
        .await
        .unwrap();
    assert_eq!(client.access_token(), None);

    client.set_access_token(None, true).await.unwrap();

    assert_eq!(client.access_token(), Some("T123"));
}

#[tokio::test]
async fn test_token_is_sent_on_later_calls() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T123"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/settings/sports"))
        .and(header("x-auth-token", "T123"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": ["baseball"]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client
        .set_credential(Credential::new("a@b.com", "x"), true)
        .await
        .unwrap();

    let response = client.tags().get_sports_tags().await.unwrap();

    assert!(!response.has_error().unwrap());
    assert_eq!(response.access_token(), Some("T123"));
    assert_eq!(
        response.decoded_body().unwrap(),
        &json!({"data": ["baseball"]})
    );

    let requests = mock_server.received_requests().await.unwrap();
    let get = requests.iter().find(|r| r.method.as_str() == "GET").unwrap();
    assert!(get.headers.get("content-type").is_none());
}

#[tokio::test]
async fn test_credential_token_skips_login() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "NEW"})))
        .expect(0)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client
        .set_credential(
            Credential::new("a@b.com", "x").with_access_token("CACHED"),
            true,
        )
        .await
        .unwrap();

    assert_eq!(client.access_token(), Some("CACHED"));
    assert_eq!(client.ensure_token().await.unwrap(), "CACHED");
}

#[tokio::test]
async fn test_login_rejected_by_service() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"error": true, "message": "Invalid credentials"})),
        )
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let result = client
        .set_credential(Credential::new("a@b.com", "wrong"), true)
        .await;

    match result {
        Err(Error::ServiceError { raw_response }) => {
            assert!(raw_response.contains("Invalid credentials"));
        }
        _ => panic!("Expected ServiceError, got {:?}", result),
    }
    assert_eq!(client.access_token(), None);
}

#[tokio::test]
async fn test_login_without_token_field() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user": {"id": 1}})))
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    let result = client
        .set_credential(Credential::new("a@b.com", "x"), true)
        .await;

    assert!(matches!(result, Err(Error::MissingToken)));
}

#[tokio::test]
async fn test_fetch_token_without_credential() {
    let mock_server = MockServer::start().await;
    let mut client = client_for(&mock_server);

    let result = client.set_access_token(None, true).await;

    assert!(matches!(result, Err(Error::MissingCredential)));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_login_keeps_current_token() {
    let mock_server = MockServer::start().await;
    let mut client = Client::builder()
        .base_path(format!("{}/api", mock_server.uri()))
        .unwrap()
        .access_token("OLD")
        .build()
        .unwrap();

    let result = client.set_access_token(None, true).await;

    assert!(matches!(result, Err(Error::MissingCredential)));
    assert_eq!(client.access_token(), Some("OLD"));
}

#[tokio::test]
async fn test_refresh_login_sends_current_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/session"))
        .and(header("x-auth-token", "OLD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "NEW"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut client = client_for(&mock_server);
    client
        .set_credential(
            Credential::new("a@b.com", "x").with_access_token("OLD"),
            false,
        )
        .await
        .unwrap();

    client.set_access_token(None, true).await.unwrap();

    assert_eq!(client.access_token(), Some("NEW"));
}

#[tokio::test]
async fn test_http_error_carries_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/settings/activities"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.tags().get_activities_tags().await.unwrap_err();

    assert!(matches!(err, Error::HttpError { .. }));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(404));
    assert_eq!(err.to_string(), "not found");
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/settings/sports"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service unavailable"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.tags().get_sports_tags().await.unwrap_err();

    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
    assert_eq!(err.raw_response(), Some("Service unavailable"));
}

#[tokio::test]
async fn test_explicit_accept_header_wins() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/settings/sports"))
        .and(header("accept", "text/plain"))
        .respond_with(ResponseTemplate::new(200).set_body_string("baseball"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let mut headers = HeaderMap::new();
    headers.insert("accept", HeaderValue::from_static("text/plain"));

    let response = client
        .send(
            Method::GET,
            "users/settings/sports",
            Params::new(),
            RequestOptions::new(),
            headers,
            None,
        )
        .await
        .unwrap();

    assert_eq!(response.body(), "baseball");
    assert_eq!(response.decoded_body().unwrap(), &json!({}));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests[0].headers.get_all("accept").iter().count(), 1);
}

#[tokio::test]
async fn test_explicit_token_overrides_client_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/settings/sports"))
        .and(header("x-auth-token", "OTHER"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_path(format!("{}/api", mock_server.uri()))
        .unwrap()
        .access_token("T123")
        .build()
        .unwrap();

    let response = client
        .send(
            Method::GET,
            "users/settings/sports",
            Params::new(),
            RequestOptions::new(),
            HeaderMap::new(),
            Some("OTHER"),
        )
        .await
        .unwrap();

    assert_eq!(response.access_token(), Some("OTHER"));
    assert_eq!(client.access_token(), Some("T123"));
}

#[tokio::test]
async fn test_histories_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/histories"))
        .and(query_param("dateStart", "2024-01-01"))
        .and(query_param("updatedAt", "2024-02-15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [{"speed": 88.5}]})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .history()
        .get_histories(
            HistoryQuery::new()
                .date_start("2024-01-01T12:00:00Z")
                .updated_at("2024-02-15 08:30:00"),
        )
        .await
        .unwrap();

    assert_eq!(response.decoded_body().unwrap()["data"][0]["speed"], 88.5);

    let requests = mock_server.received_requests().await.unwrap();
    assert!(!requests[0].url.query().unwrap_or_default().contains("dateEnd"));
    assert!(requests[0].body.is_empty());
}

#[tokio::test]
async fn test_invalid_history_date_sends_nothing() {
    let mock_server = MockServer::start().await;
    let client = client_for(&mock_server);

    let result = client
        .history()
        .get_histories(HistoryQuery::new().date_end("not a date"))
        .await;

    assert!(matches!(result, Err(Error::InvalidDate(_))));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_set_sports_tags_sends_json_list() {
    #[derive(Serialize)]
    struct Sport {
        name: &'static str,
    }

    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/users/settings/sports"))
        .and(body_string_contains("customSports=%5B%7B%22name%22%3A%22cricket%22%7D%5D"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": false})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .tags()
        .set_sports_tags(&[Sport { name: "cricket" }])
        .await
        .unwrap();

    assert!(!response.has_error().unwrap());
}

#[tokio::test]
async fn test_set_activities_tags_reports_service_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/api/v1/users/settings/activities"))
        .and(body_string("customActivities=%5B%22pitch%22%2C%22throw%22%5D"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"error": true, "message": "Too many"})),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let response = client
        .tags()
        .set_activities_tags(&["pitch", "throw"])
        .await
        .unwrap();

    assert!(response.has_error().unwrap());
    assert_eq!(response.decoded_body().unwrap()["message"], "Too many");
}

#[tokio::test]
async fn test_invalid_json_response() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/settings/sports"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("{not json", "application/json"),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    let response = client.tags().get_sports_tags().await.unwrap();
    match response.decoded_body() {
        Err(Error::InvalidResponse { raw_response, .. }) => assert_eq!(raw_response, "{not json"),
        other => panic!("Expected InvalidResponse, got {:?}", other),
    }

    let response = client
        .send(
            Method::GET,
            "users/settings/sports",
            Params::new().with("validateResponse", false),
            RequestOptions::new(),
            HeaderMap::new(),
            None,
        )
        .await
        .unwrap();
    assert!(!response.request().validate_response());
    assert_eq!(response.decoded_body().unwrap(), &json!({}));

    let response = client
        .send(
            Method::GET,
            "users/settings/sports",
            Params::new(),
            RequestOptions::new().with_validate_response(false),
            HeaderMap::new(),
            None,
        )
        .await
        .unwrap();
    assert_eq!(response.decoded_body().unwrap(), &json!({}));
}

#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/settings/sports"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": []}))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_path(format!("{}/api", mock_server.uri()))
        .unwrap()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();

    let result = client.tags().get_sports_tags().await;

    assert!(matches!(result, Err(Error::Timeout)));
}

#[tokio::test]
async fn test_connection_failure_is_network_error() {
    let client = Client::builder()
        .base_path("http://127.0.0.1:1/api")
        .unwrap()
        .build()
        .unwrap();

    let err = client.tags().get_sports_tags().await.unwrap_err();

    assert!(matches!(err, Error::Network(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_default_headers_are_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/settings/activities"))
        .and(header("user-agent", "radar-sync/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = Client::builder()
        .base_path(format!("{}/api", mock_server.uri()))
        .unwrap()
        .default_header("User-Agent", "radar-sync/2.0")
        .unwrap()
        .build()
        .unwrap();

    client.tags().get_activities_tags().await.unwrap();
}

#[tokio::test]
async fn test_non_utf8_body_is_transport_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/settings/sports"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/plain")
                .set_body_bytes(vec![0x66, 0xff, 0xfe, 0x6f]),
        )
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let err = client.tags().get_sports_tags().await.unwrap_err();

    assert!(matches!(err, Error::InvalidBody(_)));
    assert!(err.is_transport());
}
