// ── DNS record domain model ──
//
// The engine-facing state of a record is a flat attribute bag
// (`RecordState`); the typed model lives underneath it. `validate`
// turns a bag into a typed payload, `options` serializes that payload
// into wire parameters, and `fqdn`/`identity`/`matcher` support the
// reconcile loop around them.

pub mod fqdn;
pub mod identity;
pub mod matcher;
pub mod options;
pub mod rdata;
pub mod validate;

use serde::{Deserialize, Serialize};

pub use identity::RecordIdentity;
pub use options::OperationKind;
pub use rdata::{ForwarderProtocol, FwdData, ProxyKind, RData};

/// Record types managed by the reconciler.
///
/// SOA appears in list responses and zone serial reads but is never
/// created or deleted through this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum RecordType {
    A,
    Aaaa,
    Cname,
    Mx,
    Txt,
    Ptr,
    Ns,
    Srv,
    Fwd,
}

/// Flat per-record attribute bag exchanged with the calling engine.
///
/// The engine diffs and persists these; the reconciler fills the
/// read-only tail (`disabled`, `dnssec_status`, `last_used_on`) from
/// server responses and never reads it back out. Which of the optional
/// fields are meaningful depends on `record_type`; `validate` enforces
/// the per-type rules before any network call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordState {
    /// Composite identity string, assigned on create or import.
    pub id: String,
    pub zone: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: Option<u32>,
    /// Generic payload: address, target host, text, depending on type.
    pub data: Option<String>,
    /// MX preference or SRV priority.
    pub priority: Option<u16>,
    pub weight: Option<u16>,
    pub port: Option<u16>,
    pub comments: Option<String>,

    // FWD-only settings
    pub protocol: Option<String>,
    pub forwarder: Option<String>,
    pub forwarder_priority: Option<u16>,
    pub dnssec_validation: Option<bool>,
    pub proxy_type: Option<String>,
    pub proxy_address: Option<String>,
    pub proxy_port: Option<u16>,
    pub proxy_username: Option<String>,
    pub proxy_password: Option<String>,

    // Read-only, populated from server responses
    pub disabled: Option<bool>,
    pub dnssec_status: Option<String>,
    pub last_used_on: Option<String>,
}
