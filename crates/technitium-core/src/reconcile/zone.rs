// ── Zone lifecycle ──
//
// Zones are identified by name alone. Writes go through zones/create
// and zones/options/set; every write is followed by a read-back so the
// computed fields (internal, dnssecStatus, disabled, SOA serial) stay
// current. The options endpoint only reports settings the zone kind
// actually has, so absent response fields fall back to the declared
// value or a schema default rather than clearing the bag.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use technitium_api::zones::{ZoneCreateRequest, ZoneOptions, ZoneOptionsUpdate};
use technitium_api::Client;

use crate::error::CoreError;

use super::ReadOutcome;

/// Declared and observed state of one zone.
///
/// Creation-only fields (`use_soa_serial_date_scheme`, forwarder
/// initialization, proxy settings) are sent on create and never
/// updated afterwards; the mutable subset is catalog, primary
/// name-server addresses, transfer protocol, TSIG key name, and
/// `validate_zone`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneState {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
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
    /// Read-only fields refreshed from the server.
    pub internal: Option<bool>,
    pub dnssec_status: Option<String>,
    pub disabled: Option<bool>,
    pub soa_serial: Option<u32>,
}

/// Drives the lifecycle of zones against one server.
pub struct ZoneReconciler<'a> {
    client: &'a Client,
}

impl<'a> ZoneReconciler<'a> {
    #[must_use]
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Create the zone, then read it back for the computed fields.
    pub async fn create(&self, state: &mut ZoneState) -> Result<(), CoreError> {
        debug!(zone = %state.name, zone_type = %state.zone_type, "creating zone");
        self.client.create_zone(&create_request(state)).await?;
        state.id = state.name.clone();
        self.refresh(state).await?;
        debug!(zone = %state.name, "zone created");
        Ok(())
    }

    /// Refresh the bag from the server, or report the zone gone.
    pub async fn read(&self, state: &mut ZoneState) -> Result<ReadOutcome, CoreError> {
        match self.refresh(state).await {
            Ok(()) => Ok(ReadOutcome::Found),
            Err(CoreError::Api(err)) if zone_is_gone(&err) => {
                debug!(zone = %state.name, "zone no longer exists remotely");
                Ok(ReadOutcome::Gone)
            }
            Err(err) => Err(err),
        }
    }

    /// Push the mutable options subset, then read back.
    pub async fn update(&self, state: &mut ZoneState) -> Result<(), CoreError> {
        debug!(zone = %state.name, "updating zone options");
        let update = ZoneOptionsUpdate {
            catalog: state.catalog.clone(),
            primary_name_server_addresses: state.primary_name_server_addresses.clone(),
            primary_zone_transfer_protocol: state.zone_transfer_protocol.clone(),
            primary_zone_transfer_tsig_key_name: state.tsig_key_name.clone(),
            validate_zone: state.validate_zone,
        };
        self.client.set_zone_options(&state.name, &update).await?;
        self.refresh(state).await
    }

    /// Delete the zone and everything in it. A zone that is already
    /// gone remotely counts as success.
    pub async fn delete(&self, state: &ZoneState) -> Result<(), CoreError> {
        match self.client.delete_zone(&state.name).await {
            Ok(()) => Ok(()),
            Err(err) if zone_is_gone(&err) => {
                debug!(zone = %state.name, "zone already removed remotely");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Seed a state bag from a zone name. The next read fills the rest.
    #[must_use]
    pub fn import(name: &str) -> ZoneState {
        ZoneState {
            id: name.to_owned(),
            name: name.to_owned(),
            ..ZoneState::default()
        }
    }

    /// Pull zone options plus the SOA serial. The serial lives in the
    /// zone's record listing; failing to read it degrades to serial 1
    /// instead of failing the whole refresh.
    async fn refresh(&self, state: &mut ZoneState) -> Result<(), CoreError> {
        let options = self.client.get_zone_options(&state.name).await?;
        state.id = state.name.clone();
        apply_zone_options(state, &options);

        match self.client.get_records(&state.name, &state.name, true).await {
            Ok(response) => {
                let serial = response
                    .records
                    .iter()
                    .filter(|record| record.record_type == "SOA")
                    .find_map(|record| record.r_data.serial);
                state.soa_serial = Some(serial.unwrap_or(1));
            }
            Err(err) => {
                warn!(
                    zone = %state.name,
                    error = %err,
                    "failed to read zone records for SOA serial"
                );
                state.soa_serial.get_or_insert(1);
            }
        }
        Ok(())
    }
}

/// The options endpoint rejects unknown zones with a domain error;
/// both phrasings below appear across server versions.
fn zone_is_gone(err: &technitium_api::Error) -> bool {
    err.domain_message()
        .is_some_and(|message| message.contains("No such zone") || message.contains("was not found"))
}

fn create_request(state: &ZoneState) -> ZoneCreateRequest {
    ZoneCreateRequest {
        zone: state.name.clone(),
        zone_type: state.zone_type.clone(),
        catalog: state.catalog.clone(),
        use_soa_serial_date_scheme: state.use_soa_serial_date_scheme,
        primary_name_server_addresses: state.primary_name_server_addresses.clone(),
        zone_transfer_protocol: state.zone_transfer_protocol.clone(),
        tsig_key_name: state.tsig_key_name.clone(),
        validate_zone: state.validate_zone,
        initialize_forwarder: state.initialize_forwarder,
        protocol: state.protocol.clone(),
        forwarder: state.forwarder.clone(),
        dnssec_validation: state.dnssec_validation,
        proxy_type: state.proxy_type.clone(),
        proxy_address: state.proxy_address.clone(),
        proxy_port: state.proxy_port,
        proxy_username: state.proxy_username.clone(),
        proxy_password: state.proxy_password.clone(),
    }
}

/// Map the options payload onto the bag. Fields the server reports
/// override the bag; fields it omits keep their declared value or take
/// the schema default.
fn apply_zone_options(state: &mut ZoneState, options: &ZoneOptions) {
    state.zone_type = options.zone_type.clone();
    state.internal = Some(options.internal);
    state.dnssec_status = Some(options.dnssec_status.clone().unwrap_or_default());
    state.disabled = Some(options.disabled);

    if let Some(scheme) = options.use_soa_serial_date_scheme {
        state.use_soa_serial_date_scheme = Some(scheme);
    } else {
        // Not reported back by the server; keep the created value.
        state.use_soa_serial_date_scheme.get_or_insert(false);
    }

    if let Some(catalog) = options.catalog.clone().filter(|c| !c.is_empty()) {
        state.catalog = Some(catalog);
    }

    if let Some(addresses) = options
        .primary_name_server_addresses
        .clone()
        .filter(|addresses| !addresses.is_empty())
    {
        state.primary_name_server_addresses = Some(addresses);
    }

    state.zone_transfer_protocol = Some(
        options
            .primary_zone_transfer_protocol
            .clone()
            .filter(|protocol| !protocol.is_empty())
            .unwrap_or_else(|| "Tcp".to_owned()),
    );

    if let Some(key) = options
        .primary_zone_transfer_tsig_key_name
        .clone()
        .filter(|key| !key.is_empty())
    {
        state.tsig_key_name = Some(key);
    }

    state.validate_zone = Some(options.validate_zone.unwrap_or(false));
    state.initialize_forwarder.get_or_insert(false);
    state.dnssec_validation.get_or_insert(false);

    // Forwarder creation settings are write-only; the reported values
    // are the server-side constants.
    state.protocol = Some("Udp".to_owned());
    state.proxy_type = Some("DefaultProxy".to_owned());
}
