// DNS record endpoints
//
// Record mutations are parameterized with per-type option maps built by
// the caller; the wire shape mirrors the server's rData object, which
// carries a different field set for every record type.

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::client::{Client, QueryParams};
use crate::error::Error;
use crate::zones::Zone;

/// Type-dependent record payload. Every field is optional; the server
/// populates the subset that applies to the record's type and omits the
/// rest. Fields not modelled here are preserved in `extra`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecordData {
    // A / AAAA
    pub ip_address: Option<String>,
    // CNAME
    pub cname: Option<String>,
    // MX
    pub exchange: Option<String>,
    pub preference: Option<u16>,
    // TXT
    pub text: Option<String>,
    // PTR
    pub ptr_name: Option<String>,
    // NS
    pub name_server: Option<String>,
    // SRV
    pub priority: Option<u16>,
    pub weight: Option<u16>,
    pub port: Option<u16>,
    pub target: Option<String>,
    // FWD
    pub forwarder: Option<String>,
    pub protocol: Option<String>,
    pub forwarder_priority: Option<u16>,
    pub dnssec_validation: Option<bool>,
    pub proxy_type: Option<String>,
    pub proxy_address: Option<String>,
    pub proxy_port: Option<u16>,
    pub proxy_username: Option<String>,
    pub proxy_password: Option<String>,
    // SOA
    pub primary_name_server: Option<String>,
    pub responsible_person: Option<String>,
    pub serial: Option<u32>,
    pub refresh: Option<u32>,
    pub retry: Option<u32>,
    pub expire: Option<u32>,
    pub minimum: Option<u32>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single resource record as the server reports it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DnsRecord {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    pub r_data: RecordData,
    pub disabled: bool,
    pub dnssec_status: Option<String>,
    pub comments: Option<String>,
    pub last_used_on: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddRecordResponse {
    pub zone: Zone,
    pub added_record: DnsRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateRecordResponse {
    pub zone: Zone,
    pub updated_record: DnsRecord,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GetRecordsResponse {
    pub zone: Zone,
    pub records: Vec<DnsRecord>,
}

impl Client {
    /// Add a record to an authoritative zone. `options` carries the
    /// type-specific value parameters.
    ///
    /// `GET /api/zones/records/add`
    pub async fn add_record(
        &self,
        zone: &str,
        domain: &str,
        record_type: &str,
        ttl: u32,
        options: &QueryParams,
    ) -> Result<AddRecordResponse, Error> {
        debug!(zone, domain, record_type, ttl, "adding DNS record");
        let mut params = QueryParams::new();
        params.insert("domain".to_owned(), domain.to_owned());
        params.insert("zone".to_owned(), zone.to_owned());
        params.insert("type".to_owned(), record_type.to_owned());
        params.insert("ttl".to_owned(), ttl.to_string());
        for (key, value) in options {
            params.insert(key.clone(), value.clone());
        }
        self.get_json("zones/records/add", &params).await
    }

    /// List records at a domain name. With `list_zone` the server returns
    /// every record in the zone instead of just the ones at `domain`.
    ///
    /// `GET /api/zones/records/get`
    pub async fn get_records(
        &self,
        zone: &str,
        domain: &str,
        list_zone: bool,
    ) -> Result<GetRecordsResponse, Error> {
        let mut params = QueryParams::new();
        params.insert("domain".to_owned(), domain.to_owned());
        params.insert("zone".to_owned(), zone.to_owned());
        if list_zone {
            params.insert("listZone".to_owned(), "true".to_owned());
        }
        self.get_json("zones/records/get", &params).await
    }

    /// Update a record in place. The option map addresses the existing
    /// record through its current values and carries the replacement
    /// values alongside.
    ///
    /// `GET /api/zones/records/update`
    pub async fn update_record(
        &self,
        zone: &str,
        domain: &str,
        record_type: &str,
        options: &QueryParams,
    ) -> Result<UpdateRecordResponse, Error> {
        debug!(zone, domain, record_type, "updating DNS record");
        let mut params = QueryParams::new();
        params.insert("domain".to_owned(), domain.to_owned());
        params.insert("zone".to_owned(), zone.to_owned());
        params.insert("type".to_owned(), record_type.to_owned());
        for (key, value) in options {
            params.insert(key.clone(), value.clone());
        }
        self.get_json("zones/records/update", &params).await
    }

    /// Delete a record. The option map must identify the record by its
    /// type-specific values.
    ///
    /// `GET /api/zones/records/delete`
    pub async fn delete_record(
        &self,
        zone: &str,
        domain: &str,
        record_type: &str,
        options: &QueryParams,
    ) -> Result<(), Error> {
        debug!(zone, domain, record_type, "deleting DNS record");
        let mut params = QueryParams::new();
        params.insert("domain".to_owned(), domain.to_owned());
        params.insert("zone".to_owned(), zone.to_owned());
        params.insert("type".to_owned(), record_type.to_owned());
        for (key, value) in options {
            params.insert(key.clone(), value.clone());
        }
        self.get_unit("zones/records/delete", &params).await
    }
}
