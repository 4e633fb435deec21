// ── Record lifecycle ──
//
// Create, read, update, delete, and import for a single DNS record.
// Reads re-derive the record's current values from a list query plus
// the matcher, since the server has no per-record fetch. Field
// population mirrors what each call can actually know: writes refresh
// the computed tail, reads refresh everything the identity does not
// pin down.

use tracing::debug;

use technitium_api::records::DnsRecord;
use technitium_api::Client;

use crate::error::CoreError;
use crate::record::options::{self, OperationKind};
use crate::record::{fqdn, matcher, validate, RecordIdentity, RecordState};

use super::ReadOutcome;

/// Drives the lifecycle of DNS records against one server.
pub struct RecordReconciler<'a> {
    client: &'a Client,
}

impl<'a> RecordReconciler<'a> {
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Validate, create the record, and assign its composite identity.
    ///
    /// The identity is built from the declared values, not the
    /// response; the server echoes normalized forms that would change
    /// the ID on every apply.
    pub async fn create(&self, state: &mut RecordState) -> Result<(), CoreError> {
        let rdata = validate::validate(state)?;
        let params = options::build(&rdata, OperationKind::Create, state.comments.as_deref());
        let domain = fqdn::normalize(&state.name, &state.zone);

        debug!(
            zone = %state.zone,
            name = %domain,
            record_type = %state.record_type,
            "creating DNS record"
        );

        let response = self
            .client
            .add_record(
                &state.zone,
                &domain,
                &state.record_type,
                state.ttl.unwrap_or_default(),
                &params,
            )
            .await?;

        state.id = RecordIdentity::new(
            &state.zone,
            &state.name,
            &state.record_type,
            state.priority,
            state.data.as_deref(),
        )
        .to_string();

        apply_written_record(state, &response.added_record);
        debug!(id = %state.id, "DNS record created");
        Ok(())
    }

    /// Refresh the bag from the server, or report the record gone.
    pub async fn read(&self, state: &mut RecordState) -> Result<ReadOutcome, CoreError> {
        let identity: RecordIdentity = state.id.parse()?;
        let domain = fqdn::normalize(&identity.name, &identity.zone);

        let response = self
            .client
            .get_records(&identity.zone, &domain, false)
            .await?;

        let Some(record) = matcher::find(
            &response.records,
            &identity.record_type,
            identity.priority,
            identity.data.as_deref(),
        ) else {
            debug!(id = %state.id, "DNS record no longer exists remotely");
            return Ok(ReadOutcome::Gone);
        };

        state.zone = identity.zone.clone();
        state.name = identity.name.clone();
        state.record_type = identity.record_type.clone();
        apply_found_record(state, record);
        Ok(ReadOutcome::Found)
    }

    /// Replace the record's values in place.
    ///
    /// The update call addresses the existing record through bare
    /// parameter names built from `prior` and carries the desired
    /// values under `new`-prefixed names built from `state`.
    pub async fn update(
        &self,
        state: &mut RecordState,
        prior: &RecordState,
    ) -> Result<(), CoreError> {
        let current = validate::validate(prior)?;
        let desired = validate::validate(state)?;

        let mut params = options::build(&current, OperationKind::Current, None);
        for (key, value) in options::build(&desired, OperationKind::New, state.comments.as_deref())
        {
            params.insert(key, value);
        }
        params.insert("ttl".to_owned(), state.ttl.unwrap_or_default().to_string());

        let domain = fqdn::normalize(&state.name, &state.zone);
        debug!(
            zone = %state.zone,
            name = %domain,
            record_type = %state.record_type,
            "updating DNS record"
        );

        let response = self
            .client
            .update_record(&state.zone, &domain, &state.record_type, &params)
            .await?;

        if state.id.is_empty() {
            state.id = prior.id.clone();
        }
        apply_written_record(state, &response.updated_record);
        debug!(id = %state.id, "DNS record updated");
        Ok(())
    }

    /// Remove the record. Deleting an instance that is already gone
    /// remotely counts as success so teardown stays idempotent.
    pub async fn delete(&self, state: &RecordState) -> Result<(), CoreError> {
        let rdata = validate::validate(state)?;
        let params = options::build(&rdata, OperationKind::Delete, None);
        let domain = fqdn::normalize(&state.name, &state.zone);

        debug!(
            zone = %state.zone,
            name = %domain,
            record_type = %state.record_type,
            "deleting DNS record"
        );

        match self
            .client
            .delete_record(&state.zone, &domain, &state.record_type, &params)
            .await
        {
            Ok(()) => Ok(()),
            Err(err) if is_already_gone(&err) => {
                debug!(id = %state.id, "DNS record already removed remotely");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Seed a state bag from a composite identity string. No network
    /// call happens here; the next read fills the remaining fields.
    pub fn import(id: &str) -> Result<RecordState, CoreError> {
        let identity: RecordIdentity = id.parse()?;
        Ok(RecordState {
            id: id.to_owned(),
            zone: identity.zone,
            name: identity.name,
            record_type: identity.record_type,
            priority: identity.priority,
            data: identity.data,
            ..RecordState::default()
        })
    }
}

/// Servers report missing zones and records as domain errors; for
/// deletes those mean the work is already done.
fn is_already_gone(err: &technitium_api::Error) -> bool {
    err.domain_message().is_some_and(|message| {
        let message = message.to_ascii_lowercase();
        message.contains("no such")
            || message.contains("not found")
            || message.contains("does not exist")
    })
}

/// Computed-field population after create and update responses.
/// Declared values stay untouched; only the read-only tail and unset
/// optional fields refresh from the server.
fn apply_written_record(state: &mut RecordState, record: &DnsRecord) {
    state.disabled = Some(record.disabled);
    state.dnssec_status = Some(record.dnssec_status.clone().unwrap_or_default());
    if record.ttl > 0 {
        state.ttl = Some(record.ttl);
    }
    apply_computed_defaults(state);

    if state.record_type == "FWD" {
        if state.protocol.is_none() {
            state.protocol = record.r_data.protocol.clone();
        }
        if state.forwarder.is_none() {
            state.forwarder = record.r_data.forwarder.clone();
        }
        apply_remote_proxy(state, record);
    }

    state.last_used_on = Some(record.last_used_on.clone().unwrap_or_default());
}

/// Full field refresh after a successful read. The identity supplies
/// zone, name, and type; everything else comes from the matched
/// record. Comments are write-only and never read back.
fn apply_found_record(state: &mut RecordState, record: &DnsRecord) {
    if record.ttl > 0 {
        state.ttl = Some(record.ttl);
    }
    state.disabled = Some(record.disabled);
    state.dnssec_status = Some(record.dnssec_status.clone().unwrap_or_default());
    apply_computed_defaults(state);
    state.last_used_on = Some(record.last_used_on.clone().unwrap_or_default());

    let rdata = &record.r_data;
    match state.record_type.as_str() {
        "A" | "AAAA" => state.data = Some(rdata.ip_address.clone().unwrap_or_default()),
        "CNAME" => state.data = Some(rdata.cname.clone().unwrap_or_default()),
        "MX" => {
            state.data = Some(rdata.exchange.clone().unwrap_or_default());
            state.priority = Some(rdata.preference.unwrap_or_default());
        }
        "TXT" => {
            let text = rdata.text.clone().unwrap_or_default();
            state.data = Some(text.trim_matches('"').to_owned());
        }
        "PTR" => state.data = Some(rdata.ptr_name.clone().unwrap_or_default()),
        "NS" => state.data = Some(rdata.name_server.clone().unwrap_or_default()),
        "SRV" => {
            state.data = Some(rdata.target.clone().unwrap_or_default());
            state.priority = Some(rdata.priority.unwrap_or_default());
            state.weight = Some(rdata.weight.unwrap_or_default());
            state.port = Some(rdata.port.unwrap_or_default());
        }
        "FWD" => {
            state.data = Some(rdata.forwarder.clone().unwrap_or_default());
            state.protocol = rdata.protocol.clone();
            state.forwarder = rdata.forwarder.clone();
            state.forwarder_priority = Some(rdata.forwarder_priority.unwrap_or_default());
            state.dnssec_validation = Some(rdata.dnssec_validation.unwrap_or_default());
            apply_remote_proxy(state, record);
            if let Some(port) = rdata.proxy_port.filter(|p| *p > 0) {
                state.proxy_port = Some(port);
            }
        }
        _ => {}
    }
}

/// The engine expects every computed numeric field to hold a concrete
/// value after a call, even for record types that never use it.
fn apply_computed_defaults(state: &mut RecordState) {
    state.priority.get_or_insert(0);
    state.weight.get_or_insert(0);
    state.port.get_or_insert(0);
    state.forwarder_priority.get_or_insert(0);
    state.dnssec_validation.get_or_insert(false);
    state.proxy_port.get_or_insert(0);
}

/// Proxy fields refresh only when the caller configured them and the
/// server reports a value; otherwise the server-side `DefaultProxy`
/// would bleed into configs that never asked for a proxy.
fn apply_remote_proxy(state: &mut RecordState, record: &DnsRecord) {
    let rdata = &record.r_data;
    if state.proxy_type.is_some() {
        if let Some(value) = non_empty(&rdata.proxy_type) {
            state.proxy_type = Some(value);
        }
    }
    if state.proxy_address.is_some() {
        if let Some(value) = non_empty(&rdata.proxy_address) {
            state.proxy_address = Some(value);
        }
    }
    if state.proxy_username.is_some() {
        if let Some(value) = non_empty(&rdata.proxy_username) {
            state.proxy_username = Some(value);
        }
    }
    if state.proxy_password.is_some() {
        if let Some(value) = non_empty(&rdata.proxy_password) {
            state.proxy_password = Some(value);
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.clone().filter(|v| !v.is_empty())
}
