//! Reconciliation layer between `technitium-api` and a declarative
//! state engine.
//!
//! This crate owns the domain model and reconciliation logic for
//! managing a Technitium DNS Server:
//!
//! - **Reconcilers** ([`reconcile`]) — One driver per managed object
//!   kind: [`RecordReconciler`], [`ZoneReconciler`], [`AppReconciler`],
//!   and [`AppConfigReconciler`]. Each exposes the create / read /
//!   update / delete / import lifecycle over a flat state bag and
//!   reports objects that vanished out of band through
//!   [`ReadOutcome::Gone`] instead of an error.
//!
//! - **Record model** ([`record`]) — Typed record payloads
//!   ([`RData`]), composite identities ([`RecordIdentity`]),
//!   wire-parameter mapping, relative-name normalization, and the list
//!   matcher that re-locates a managed record among its siblings.
//!
//! - **Query surfaces** ([`query`]) — Read-only zone and record
//!   listings with display-formatted payloads.
//!
//! - **[`CoreError`]** — Validation and precondition failures raised
//!   locally, with API client failures passed through transparently.

pub mod error;
pub mod query;
pub mod reconcile;
pub mod record;

// ── Primary re-exports ──────────────────────────────────────────────
pub use error::CoreError;
pub use query::{list_records, lookup_zone, RecordSummary};
pub use reconcile::{
    AppConfigReconciler, AppConfigState, AppReconciler, AppState, InstallMethod, ReadOutcome,
    RecordReconciler, ZoneReconciler, ZoneState,
};
pub use record::{
    ForwarderProtocol, FwdData, OperationKind, ProxyKind, RData, RecordIdentity, RecordState,
    RecordType,
};
