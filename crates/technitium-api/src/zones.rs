// Zone management endpoints
//
// Zones are addressed by name. Creation takes kind-specific parameters
// (secondaries need transfer settings, forwarder zones need a forwarder);
// everything else goes through zones/options.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::{Client, QueryParams};
use crate::error::Error;

/// Zone summary as returned by `zones/list` and embedded in record
/// responses.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Zone {
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub internal: bool,
    pub disabled: bool,
    pub dnssec_status: Option<String>,
    pub soa_serial: Option<u32>,
    pub expiry: Option<String>,
    pub is_expired: Option<bool>,
    pub sync_failed: Option<bool>,
    pub notify_failed: Option<bool>,
    pub notify_failed_for: Option<Vec<String>>,
    pub last_modified: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of `zones/list` output.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoneListPage {
    pub page_number: u32,
    pub total_pages: u32,
    pub total_zones: u32,
    pub zones: Vec<Zone>,
}

/// Zone settings as returned by `zones/options/get`.
///
/// The endpoint reports far more knobs than the ones modelled here; the
/// rest land in `extra` untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ZoneOptions {
    pub name: String,
    #[serde(rename = "type")]
    pub zone_type: String,
    pub internal: bool,
    pub disabled: bool,
    pub dnssec_status: Option<String>,
    pub catalog: Option<String>,
    pub use_soa_serial_date_scheme: Option<bool>,
    pub primary_name_server_addresses: Option<Vec<String>>,
    pub primary_zone_transfer_protocol: Option<String>,
    pub primary_zone_transfer_tsig_key_name: Option<String>,
    pub validate_zone: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Parameters for `zones/create`.
///
/// Only `zone` and `zone_type` are universal; the optional fields apply to
/// specific zone kinds (secondaries take transfer settings, forwarder
/// zones take forwarder and proxy settings) and are serialized only when
/// set.
#[derive(Debug, Clone, Default)]
pub struct ZoneCreateRequest {
    pub zone: String,
    pub zone_type: String,
    pub catalog: Option<String>,
    pub use_soa_serial_date_scheme: Option<bool>,
    pub primary_name_server_addresses: Option<Vec<String>>,
    pub zone_transfer_protocol: Option<String>,
    pub tsig_key_name: Option<String>,
    pub validate_zone: Option<bool>,
    pub initialize_forwarder: Option<bool>,
    pub protocol: Option<String>,
    pub forwarder: Option<String>,
    pub dnssec_validation: Option<bool>,
    pub proxy_type: Option<String>,
    pub proxy_address: Option<String>,
    pub proxy_port: Option<u16>,
    pub proxy_username: Option<String>,
    pub proxy_password: Option<String>,
}

/// Updatable zone settings for `zones/options/set`. Absent fields are left
/// untouched on the server.
#[derive(Debug, Clone, Default)]
pub struct ZoneOptionsUpdate {
    pub catalog: Option<String>,
    pub primary_name_server_addresses: Option<Vec<String>>,
    pub primary_zone_transfer_protocol: Option<String>,
    pub primary_zone_transfer_tsig_key_name: Option<String>,
    pub validate_zone: Option<bool>,
}

fn push_opt(params: &mut QueryParams, key: &str, value: Option<String>) {
    if let Some(value) = value {
        params.insert(key.to_owned(), value);
    }
}

impl Client {
    /// List zones hosted on the server.
    ///
    /// `GET /api/zones/list`
    pub async fn list_zones(&self) -> Result<ZoneListPage, Error> {
        self.get_json("zones/list", &QueryParams::new()).await
    }

    /// Case-insensitive existence check backed by [`Client::list_zones`].
    pub async fn zone_exists(&self, zone: &str) -> Result<bool, Error> {
        let page = self.list_zones().await?;
        Ok(page
            .zones
            .iter()
            .any(|z| z.name.eq_ignore_ascii_case(zone)))
    }

    /// Create a zone of any supported kind.
    ///
    /// `GET /api/zones/create`
    pub async fn create_zone(&self, request: &ZoneCreateRequest) -> Result<(), Error> {
        debug!(zone = %request.zone, zone_type = %request.zone_type, "creating zone");
        let mut params = QueryParams::new();
        params.insert("zone".to_owned(), request.zone.clone());
        params.insert("type".to_owned(), request.zone_type.clone());
        push_opt(&mut params, "catalog", request.catalog.clone());
        push_opt(
            &mut params,
            "useSoaSerialDateScheme",
            request.use_soa_serial_date_scheme.map(|v| v.to_string()),
        );
        push_opt(
            &mut params,
            "primaryNameServerAddresses",
            request
                .primary_name_server_addresses
                .as_ref()
                .map(|addrs| addrs.join(",")),
        );
        push_opt(
            &mut params,
            "zoneTransferProtocol",
            request.zone_transfer_protocol.clone(),
        );
        push_opt(&mut params, "tsigKeyName", request.tsig_key_name.clone());
        push_opt(
            &mut params,
            "validateZone",
            request.validate_zone.map(|v| v.to_string()),
        );
        push_opt(
            &mut params,
            "initializeForwarder",
            request.initialize_forwarder.map(|v| v.to_string()),
        );
        push_opt(&mut params, "protocol", request.protocol.clone());
        push_opt(&mut params, "forwarder", request.forwarder.clone());
        push_opt(
            &mut params,
            "dnssecValidation",
            request.dnssec_validation.map(|v| v.to_string()),
        );
        push_opt(&mut params, "proxyType", request.proxy_type.clone());
        push_opt(&mut params, "proxyAddress", request.proxy_address.clone());
        push_opt(
            &mut params,
            "proxyPort",
            request.proxy_port.map(|v| v.to_string()),
        );
        push_opt(&mut params, "proxyUsername", request.proxy_username.clone());
        push_opt(&mut params, "proxyPassword", request.proxy_password.clone());

        self.get_unit("zones/create", &params).await
    }

    /// Fetch zone settings.
    ///
    /// `GET /api/zones/options/get`
    pub async fn get_zone_options(&self, zone: &str) -> Result<ZoneOptions, Error> {
        let mut params = QueryParams::new();
        params.insert("zone".to_owned(), zone.to_owned());
        self.get_json("zones/options/get", &params).await
    }

    /// Update zone settings.
    ///
    /// `GET /api/zones/options/set`
    pub async fn set_zone_options(
        &self,
        zone: &str,
        update: &ZoneOptionsUpdate,
    ) -> Result<(), Error> {
        debug!(zone, "updating zone options");
        let mut params = QueryParams::new();
        params.insert("zone".to_owned(), zone.to_owned());
        push_opt(&mut params, "catalog", update.catalog.clone());
        push_opt(
            &mut params,
            "primaryNameServerAddresses",
            update
                .primary_name_server_addresses
                .as_ref()
                .map(|addrs| addrs.join(",")),
        );
        push_opt(
            &mut params,
            "primaryZoneTransferProtocol",
            update.primary_zone_transfer_protocol.clone(),
        );
        push_opt(
            &mut params,
            "primaryZoneTransferTsigKeyName",
            update.primary_zone_transfer_tsig_key_name.clone(),
        );
        push_opt(
            &mut params,
            "validateZone",
            update.validate_zone.map(|v| v.to_string()),
        );
        self.get_unit("zones/options/set", &params).await
    }

    /// Delete a zone and every record in it.
    ///
    /// `GET /api/zones/delete`
    pub async fn delete_zone(&self, zone: &str) -> Result<(), Error> {
        debug!(zone, "deleting zone");
        let mut params = QueryParams::new();
        params.insert("zone".to_owned(), zone.to_owned());
        self.get_unit("zones/delete", &params).await
    }

    /// Enable a disabled zone.
    ///
    /// `GET /api/zones/enable`
    pub async fn enable_zone(&self, zone: &str) -> Result<(), Error> {
        let mut params = QueryParams::new();
        params.insert("zone".to_owned(), zone.to_owned());
        self.get_unit("zones/enable", &params).await
    }

    /// Disable a zone without deleting it.
    ///
    /// `GET /api/zones/disable`
    pub async fn disable_zone(&self, zone: &str) -> Result<(), Error> {
        let mut params = QueryParams::new();
        params.insert("zone".to_owned(), zone.to_owned());
        self.get_unit("zones/disable", &params).await
    }
}
