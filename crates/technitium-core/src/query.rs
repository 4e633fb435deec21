// ── Read-only query surfaces ──
//
// List-shaped reads for reporting and lookups. Nothing here mutates
// server state or a state bag; installed-app and store-app listings
// come straight off the API client and need no wrapper.

use serde::Serialize;
use tracing::debug;

use technitium_api::records::DnsRecord;
use technitium_api::Client;

use crate::error::CoreError;
use crate::reconcile::{ReadOutcome, ZoneReconciler, ZoneState};

/// One record row in a zone listing, with the payload flattened into a
/// display string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RecordSummary {
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    pub data: String,
    pub disabled: bool,
    pub comments: String,
}

/// List records in a zone, optionally narrowed to one name and a set
/// of record types.
///
/// With no `domain`, or with the zone apex as `domain`, the whole zone
/// is listed; any other name lists that name only. An empty
/// `record_types` slice means no type filter.
pub async fn list_records(
    client: &Client,
    zone: &str,
    domain: Option<&str>,
    record_types: &[String],
) -> Result<Vec<RecordSummary>, CoreError> {
    let domain = domain.unwrap_or(zone);
    let list_zone = domain == zone;

    debug!(zone, domain, list_zone, "listing DNS records");

    let response = client.get_records(zone, domain, list_zone).await?;
    let summaries = response
        .records
        .iter()
        .filter(|record| {
            record_types.is_empty() || record_types.iter().any(|t| *t == record.record_type)
        })
        .map(|record| RecordSummary {
            name: record.name.clone(),
            record_type: record.record_type.clone(),
            ttl: record.ttl,
            data: format_record_data(record),
            disabled: record.disabled,
            comments: record.comments.clone().unwrap_or_default(),
        })
        .collect();
    Ok(summaries)
}

/// Look up one zone by name, with its full option set and SOA serial.
/// Returns `None` when the zone does not exist.
pub async fn lookup_zone(client: &Client, name: &str) -> Result<Option<ZoneState>, CoreError> {
    let mut state = ZoneReconciler::import(name);
    match ZoneReconciler::new(client).read(&mut state).await? {
        ReadOutcome::Found => Ok(Some(state)),
        ReadOutcome::Gone => Ok(None),
    }
}

/// Render a record's payload as one display string. Types without a
/// flat representation come back as a `[TYPE record]` placeholder.
#[must_use]
pub fn format_record_data(record: &DnsRecord) -> String {
    let rdata = &record.r_data;
    match record.record_type.as_str() {
        "A" | "AAAA" => rdata.ip_address.clone().unwrap_or_default(),
        "CNAME" => rdata.cname.clone().unwrap_or_default(),
        "MX" => format!(
            "{} {}",
            rdata.preference.unwrap_or_default(),
            rdata.exchange.clone().unwrap_or_default()
        ),
        "TXT" => rdata.text.clone().unwrap_or_default(),
        "PTR" => rdata.ptr_name.clone().unwrap_or_default(),
        "NS" => rdata.name_server.clone().unwrap_or_default(),
        "SRV" => format!(
            "{} {} {} {}",
            rdata.priority.unwrap_or_default(),
            rdata.weight.unwrap_or_default(),
            rdata.port.unwrap_or_default(),
            rdata.target.clone().unwrap_or_default()
        ),
        "SOA" => format!(
            "{} {} {} {} {} {} {}",
            rdata.primary_name_server.clone().unwrap_or_default(),
            rdata.responsible_person.clone().unwrap_or_default(),
            rdata.serial.unwrap_or_default(),
            rdata.refresh.unwrap_or_default(),
            rdata.retry.unwrap_or_default(),
            rdata.expire.unwrap_or_default(),
            rdata.minimum.unwrap_or_default()
        ),
        other => format!("[{other} record]"),
    }
}
