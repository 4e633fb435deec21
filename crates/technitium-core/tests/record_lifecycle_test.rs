#![allow(clippy::unwrap_used)]
// Record reconciler lifecycle against a mocked server.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use technitium_api::{Client, ClientConfig};
use technitium_core::{ReadOutcome, RecordReconciler, RecordState};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, Client) {
    let server = MockServer::start().await;
    let config = ClientConfig::new(Url::parse(&server.uri()).unwrap()).with_token("test-token");
    let client = Client::new(&config).unwrap();
    (server, client)
}

fn ok_body(response: serde_json::Value) -> serde_json::Value {
    json!({ "status": "ok", "response": response })
}

fn error_body(message: &str) -> serde_json::Value {
    json!({ "status": "error", "errorMessage": message })
}

fn a_record() -> RecordState {
    RecordState {
        zone: "example.com".to_owned(),
        name: "www".to_owned(),
        record_type: "A".to_owned(),
        ttl: Some(300),
        data: Some("192.168.1.100".to_owned()),
        ..RecordState::default()
    }
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_assigns_identity_from_declared_values() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/records/add"))
        .and(query_param("domain", "www.example.com"))
        .and(query_param("zone", "example.com"))
        .and(query_param("type", "A"))
        .and(query_param("ttl", "300"))
        .and(query_param("ipAddress", "192.168.1.100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "zone": { "name": "example.com", "type": "Primary" },
            "addedRecord": {
                "name": "www.example.com",
                "type": "A",
                "ttl": 300,
                "rData": { "ipAddress": "192.168.1.100" },
                "disabled": false,
                "dnssecStatus": "Unknown"
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = a_record();
    RecordReconciler::new(&client)
        .create(&mut state)
        .await
        .unwrap();

    assert_eq!(state.id, "example.com:www:A:192.168.1.100");
    assert_eq!(state.ttl, Some(300));
    assert_eq!(state.disabled, Some(false));
    assert_eq!(state.dnssec_status.as_deref(), Some("Unknown"));
    assert_eq!(state.priority, Some(0));
    assert_eq!(state.last_used_on.as_deref(), Some(""));
}

#[tokio::test]
async fn test_create_mx_sends_exchange_preference_and_comments() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/records/add"))
        .and(query_param("domain", "@"))
        .and(query_param("zone", "example.com"))
        .and(query_param("type", "MX"))
        .and(query_param("exchange", "mail.example.com"))
        .and(query_param("preference", "10"))
        .and(query_param("comments", "primary mail"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "zone": { "name": "example.com", "type": "Primary" },
            "addedRecord": {
                "name": "example.com",
                "type": "MX",
                "ttl": 3600,
                "rData": { "preference": 10, "exchange": "mail.example.com" },
                "disabled": false,
                "dnssecStatus": "Unknown"
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = RecordState {
        zone: "example.com".to_owned(),
        name: "@".to_owned(),
        record_type: "MX".to_owned(),
        ttl: Some(3600),
        data: Some("mail.example.com".to_owned()),
        priority: Some(10),
        comments: Some("primary mail".to_owned()),
        ..RecordState::default()
    };
    RecordReconciler::new(&client)
        .create(&mut state)
        .await
        .unwrap();

    assert_eq!(state.id, "example.com:@:MX:10:mail.example.com");
    assert_eq!(state.priority, Some(10));
}

#[tokio::test]
async fn test_create_rejects_invalid_data_before_any_call() {
    let (server, client) = setup().await;

    let mut state = a_record();
    state.data = Some("not-an-ip".to_owned());

    let err = RecordReconciler::new(&client)
        .create(&mut state)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Validation failed: invalid IPv4 address format for A record: not-an-ip"
    );

    // No request reached the server.
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Read ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_read_refreshes_fields_from_the_matched_record() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/records/get"))
        .and(query_param("domain", "www.example.com"))
        .and(query_param("zone", "example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "zone": { "name": "example.com", "type": "Primary" },
            "records": [
                {
                    "name": "www.example.com",
                    "type": "TXT",
                    "ttl": 300,
                    "rData": { "text": "\"v=spf1 -all\"" }
                },
                {
                    "name": "www.example.com",
                    "type": "A",
                    "ttl": 600,
                    "rData": { "ipAddress": "192.168.1.100" },
                    "disabled": true,
                    "dnssecStatus": "Unknown",
                    "lastUsedOn": "2026-08-20T10:00:00Z"
                }
            ]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut state = RecordState {
        id: "example.com:www:A:192.168.1.100".to_owned(),
        ..RecordState::default()
    };
    let outcome = RecordReconciler::new(&client).read(&mut state).await.unwrap();

    assert_eq!(outcome, ReadOutcome::Found);
    assert_eq!(state.zone, "example.com");
    assert_eq!(state.name, "www");
    assert_eq!(state.record_type, "A");
    assert_eq!(state.ttl, Some(600));
    assert_eq!(state.data.as_deref(), Some("192.168.1.100"));
    assert_eq!(state.disabled, Some(true));
    assert_eq!(state.last_used_on.as_deref(), Some("2026-08-20T10:00:00Z"));
}

#[tokio::test]
async fn test_read_uses_priority_to_pick_among_mx_siblings() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/records/get"))
        .and(query_param("domain", "@"))
        .and(query_param("zone", "example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "zone": { "name": "example.com", "type": "Primary" },
            "records": [
                {
                    "name": "example.com",
                    "type": "MX",
                    "ttl": 3600,
                    "rData": { "preference": 10, "exchange": "mx1.example.com" }
                },
                {
                    "name": "example.com",
                    "type": "MX",
                    "ttl": 3600,
                    "rData": { "preference": 20, "exchange": "mx2.example.com" }
                }
            ]
        }))))
        .mount(&server)
        .await;

    let mut state = RecordState {
        id: "example.com:@:MX:20:mx2.example.com".to_owned(),
        ..RecordState::default()
    };
    let outcome = RecordReconciler::new(&client).read(&mut state).await.unwrap();

    assert_eq!(outcome, ReadOutcome::Found);
    assert_eq!(state.priority, Some(20));
    assert_eq!(state.data.as_deref(), Some("mx2.example.com"));
}

#[tokio::test]
async fn test_read_reports_gone_when_nothing_matches() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/records/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "zone": { "name": "example.com", "type": "Primary" },
            "records": []
        }))))
        .mount(&server)
        .await;

    let mut state = RecordState {
        id: "example.com:www:A:192.168.1.100".to_owned(),
        ..RecordState::default()
    };
    let outcome = RecordReconciler::new(&client).read(&mut state).await.unwrap();

    assert_eq!(outcome, ReadOutcome::Gone);
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_addresses_current_values_and_sends_new_ones() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/records/update"))
        .and(query_param("domain", "www.example.com"))
        .and(query_param("zone", "example.com"))
        .and(query_param("type", "A"))
        .and(query_param("ipAddress", "192.168.1.100"))
        .and(query_param("newIpAddress", "192.168.1.200"))
        .and(query_param("ttl", "7200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "zone": { "name": "example.com", "type": "Primary" },
            "updatedRecord": {
                "name": "www.example.com",
                "type": "A",
                "ttl": 7200,
                "rData": { "ipAddress": "192.168.1.200" },
                "disabled": false,
                "dnssecStatus": "Unknown"
            }
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let prior = RecordState {
        id: "example.com:www:A:192.168.1.100".to_owned(),
        ..a_record()
    };
    let mut state = RecordState {
        ttl: Some(7200),
        data: Some("192.168.1.200".to_owned()),
        ..prior.clone()
    };
    RecordReconciler::new(&client)
        .update(&mut state, &prior)
        .await
        .unwrap();

    assert_eq!(state.id, "example.com:www:A:192.168.1.100");
    assert_eq!(state.ttl, Some(7200));
    assert_eq!(state.data.as_deref(), Some("192.168.1.200"));
    assert_eq!(state.disabled, Some(false));
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_sends_identifying_values() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/records/delete"))
        .and(query_param("domain", "www.example.com"))
        .and(query_param("zone", "example.com"))
        .and(query_param("type", "A"))
        .and(query_param("ipAddress", "192.168.1.100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let state = RecordState {
        id: "example.com:www:A:192.168.1.100".to_owned(),
        ..a_record()
    };
    RecordReconciler::new(&client).delete(&state).await.unwrap();
}

#[tokio::test]
async fn test_delete_succeeds_when_the_record_is_already_gone() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/records/delete"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(error_body("Cannot delete record: no such record exists")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let state = RecordState {
        id: "example.com:www:A:192.168.1.100".to_owned(),
        ..a_record()
    };
    RecordReconciler::new(&client).delete(&state).await.unwrap();
}

#[tokio::test]
async fn test_delete_surfaces_other_server_rejections() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/records/delete"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body("Access was denied.")))
        .mount(&server)
        .await;

    let state = RecordState {
        id: "example.com:www:A:192.168.1.100".to_owned(),
        ..a_record()
    };
    let err = RecordReconciler::new(&client)
        .delete(&state)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "API error: Access was denied.");
}
