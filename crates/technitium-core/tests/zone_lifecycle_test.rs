#![allow(clippy::unwrap_used)]
// Zone reconciler lifecycle against a mocked server.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use technitium_api::{Client, ClientConfig};
use technitium_core::{ReadOutcome, ZoneReconciler, ZoneState};

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

async fn mount_primary_options(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/zones/options/get"))
        .and(query_param("zone", "example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "name": "example.com",
            "type": "Primary",
            "internal": false,
            "disabled": false,
            "dnssecStatus": "Unsigned"
        }))))
        .mount(server)
        .await;
}

async fn mount_soa_listing(server: &MockServer, serial: u32) {
    Mock::given(method("GET"))
        .and(path("/api/zones/records/get"))
        .and(query_param("domain", "example.com"))
        .and(query_param("zone", "example.com"))
        .and(query_param("listZone", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "zone": { "name": "example.com", "type": "Primary" },
            "records": [{
                "name": "example.com",
                "type": "SOA",
                "ttl": 900,
                "rData": {
                    "primaryNameServer": "ns1.example.com",
                    "responsiblePerson": "hostadmin.example.com",
                    "serial": serial,
                    "refresh": 900,
                    "retry": 300,
                    "expire": 604_800,
                    "minimum": 900
                }
            }]
        }))))
        .mount(server)
        .await;
}

// ── Create ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_create_primary_zone_reads_back_options_and_serial() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/create"))
        .and(query_param("zone", "example.com"))
        .and(query_param("type", "Primary"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body(json!({ "domain": "example.com" }))),
        )
        .expect(1)
        .mount(&server)
        .await;
    mount_primary_options(&server).await;
    mount_soa_listing(&server, 29).await;

    let mut state = ZoneState {
        name: "example.com".to_owned(),
        zone_type: "Primary".to_owned(),
        ..ZoneState::default()
    };
    ZoneReconciler::new(&client).create(&mut state).await.unwrap();

    assert_eq!(state.id, "example.com");
    assert_eq!(state.soa_serial, Some(29));
    assert_eq!(state.internal, Some(false));
    assert_eq!(state.disabled, Some(false));
    assert_eq!(state.dnssec_status.as_deref(), Some("Unsigned"));
    assert_eq!(state.zone_transfer_protocol.as_deref(), Some("Tcp"));
    assert_eq!(state.validate_zone, Some(false));
    assert_eq!(state.use_soa_serial_date_scheme, Some(false));
    assert_eq!(state.protocol.as_deref(), Some("Udp"));
    assert_eq!(state.proxy_type.as_deref(), Some("DefaultProxy"));
}

#[tokio::test]
async fn test_create_forwarder_zone_sends_initialization_params() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/create"))
        .and(query_param("zone", "example.com"))
        .and(query_param("type", "Forwarder"))
        .and(query_param("initializeForwarder", "true"))
        .and(query_param("protocol", "Udp"))
        .and(query_param("forwarder", "8.8.8.8"))
        .and(query_param("dnssecValidation", "true"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(ok_body(json!({ "domain": "example.com" }))),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/zones/options/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "name": "example.com",
            "type": "Forwarder",
            "internal": false,
            "disabled": false,
            "dnssecStatus": "Unknown"
        }))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/zones/records/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "zone": { "name": "example.com", "type": "Forwarder" },
            "records": []
        }))))
        .mount(&server)
        .await;

    let mut state = ZoneState {
        name: "example.com".to_owned(),
        zone_type: "Forwarder".to_owned(),
        initialize_forwarder: Some(true),
        protocol: Some("Udp".to_owned()),
        forwarder: Some("8.8.8.8".to_owned()),
        dnssec_validation: Some(true),
        ..ZoneState::default()
    };
    ZoneReconciler::new(&client).create(&mut state).await.unwrap();

    // No SOA record in a forwarder zone listing.
    assert_eq!(state.soa_serial, Some(1));
    assert_eq!(state.initialize_forwarder, Some(true));
    assert_eq!(state.dnssec_validation, Some(true));
}

// ── Read ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_read_reports_gone_for_a_missing_zone() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/options/get"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(error_body("No such zone was found: example.com")),
        )
        .mount(&server)
        .await;

    let mut state = ZoneReconciler::import("example.com");
    let outcome = ZoneReconciler::new(&client).read(&mut state).await.unwrap();
    assert_eq!(outcome, ReadOutcome::Gone);
}

#[tokio::test]
async fn test_read_defaults_serial_when_the_record_listing_fails() {
    let (server, client) = setup().await;

    mount_primary_options(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/zones/records/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body("Access was denied.")))
        .mount(&server)
        .await;

    let mut state = ZoneReconciler::import("example.com");
    let outcome = ZoneReconciler::new(&client).read(&mut state).await.unwrap();

    assert_eq!(outcome, ReadOutcome::Found);
    assert_eq!(state.soa_serial, Some(1));
}

#[tokio::test]
async fn test_read_surfaces_unrelated_failures() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/options/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(error_body("Access was denied.")))
        .mount(&server)
        .await;

    let mut state = ZoneReconciler::import("example.com");
    let err = ZoneReconciler::new(&client)
        .read(&mut state)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "API error: Access was denied.");
}

// ── Update ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_update_sends_the_mutable_subset_and_rereads() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/options/set"))
        .and(query_param("zone", "example.com"))
        .and(query_param("primaryNameServerAddresses", "10.0.0.1,10.0.0.2"))
        .and(query_param("primaryZoneTransferProtocol", "Tls"))
        .and(query_param("primaryZoneTransferTsigKeyName", "key-1"))
        .and(query_param("validateZone", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/zones/options/get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ok_body(json!({
            "name": "example.com",
            "type": "Secondary",
            "internal": false,
            "disabled": false,
            "dnssecStatus": "Unsigned",
            "primaryNameServerAddresses": ["10.0.0.1", "10.0.0.2"],
            "primaryZoneTransferProtocol": "Tls",
            "primaryZoneTransferTsigKeyName": "key-1",
            "validateZone": true
        }))))
        .mount(&server)
        .await;
    mount_soa_listing(&server, 30).await;

    let mut state = ZoneState {
        name: "example.com".to_owned(),
        zone_type: "Secondary".to_owned(),
        primary_name_server_addresses: Some(vec!["10.0.0.1".to_owned(), "10.0.0.2".to_owned()]),
        zone_transfer_protocol: Some("Tls".to_owned()),
        tsig_key_name: Some("key-1".to_owned()),
        validate_zone: Some(true),
        ..ZoneState::default()
    };
    ZoneReconciler::new(&client).update(&mut state).await.unwrap();

    assert_eq!(state.zone_transfer_protocol.as_deref(), Some("Tls"));
    assert_eq!(state.tsig_key_name.as_deref(), Some("key-1"));
    assert_eq!(state.validate_zone, Some(true));
    assert_eq!(state.soa_serial, Some(30));
}

// ── Delete ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_delete_removes_the_zone() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/delete"))
        .and(query_param("zone", "example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&server)
        .await;

    let state = ZoneReconciler::import("example.com");
    ZoneReconciler::new(&client).delete(&state).await.unwrap();
}

#[tokio::test]
async fn test_delete_succeeds_when_the_zone_is_already_gone() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/zones/delete"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(error_body("No such zone was found: example.com")),
        )
        .mount(&server)
        .await;

    let state = ZoneReconciler::import("example.com");
    ZoneReconciler::new(&client).delete(&state).await.unwrap();
}
