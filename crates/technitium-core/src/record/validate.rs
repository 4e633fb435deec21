// ── Pre-flight record validation ──
//
// Runs before any network call and produces the typed payload the
// option mapper consumes. Every rejection here is deterministic; the
// messages surface to users verbatim, so they name the offending field
// and the accepted values.

use crate::error::CoreError;

use super::rdata::{ForwarderProtocol, FwdData, ProxyKind, RData};
use super::{RecordState, RecordType};

/// Check the per-type field rules and build the typed payload.
///
/// Empty strings count as unset, matching how the attribute bag treats
/// optional fields elsewhere.
pub fn validate(state: &RecordState) -> Result<RData, CoreError> {
    let record_type: RecordType = state.record_type.parse().map_err(|_| {
        validation(format!(
            "invalid record type: {} (must be one of: A, AAAA, CNAME, MX, TXT, PTR, NS, SRV, FWD)",
            state.record_type
        ))
    })?;

    let data = state.data.clone().unwrap_or_default();

    match record_type {
        RecordType::A => {
            if !data.contains('.') {
                return Err(validation(format!(
                    "invalid IPv4 address format for A record: {data}"
                )));
            }
            Ok(RData::A { ip_address: data })
        }
        RecordType::Aaaa => {
            if !data.contains(':') {
                return Err(validation(format!(
                    "invalid IPv6 address format for AAAA record: {data}"
                )));
            }
            Ok(RData::Aaaa { ip_address: data })
        }
        RecordType::Cname => Ok(RData::Cname { cname: data }),
        RecordType::Mx => {
            let Some(preference) = state.priority else {
                return Err(validation("priority is required for MX records"));
            };
            Ok(RData::Mx {
                exchange: data,
                preference,
            })
        }
        RecordType::Txt => Ok(RData::Txt { text: data }),
        RecordType::Ptr => Ok(RData::Ptr { ptr_name: data }),
        RecordType::Ns => Ok(RData::Ns { name_server: data }),
        RecordType::Srv => {
            let (Some(priority), Some(weight), Some(port)) =
                (state.priority, state.weight, state.port)
            else {
                return Err(validation("priority/weight/port is required for SRV records"));
            };
            Ok(RData::Srv {
                target: data,
                priority,
                weight,
                port,
            })
        }
        RecordType::Fwd => validate_forwarder(state, &data),
    }
}

fn validate_forwarder(state: &RecordState, data: &str) -> Result<RData, CoreError> {
    let forwarder = state
        .forwarder
        .clone()
        .filter(|f| !f.is_empty())
        .or_else(|| (!data.is_empty()).then(|| data.to_owned()))
        .ok_or_else(|| {
            validation(
                "forwarder address is required for FWD records (use either 'forwarder' or 'data' field)",
            )
        })?;

    let protocol = match state.protocol.as_deref() {
        Some(p) if !p.is_empty() => p.parse::<ForwarderProtocol>().map_err(|_| {
            validation(format!(
                "invalid protocol for FWD record: {p} (must be one of: Udp, Tcp, Tls, Https, Quic)"
            ))
        })?,
        _ => ForwarderProtocol::Udp,
    };

    let proxy_type = match state.proxy_type.as_deref() {
        Some(pt) if !pt.is_empty() => Some(pt.parse::<ProxyKind>().map_err(|_| {
            validation(format!(
                "invalid proxy type for FWD record: {pt} (must be one of: NoProxy, DefaultProxy, Http, Socks5)"
            ))
        })?),
        _ => None,
    };

    if let Some(kind) = proxy_type {
        let has_address = state
            .proxy_address
            .as_deref()
            .is_some_and(|a| !a.is_empty());
        if kind.requires_address() && !has_address {
            return Err(validation(format!(
                "proxy_address is required when proxy_type is {kind}"
            )));
        }
    }

    Ok(RData::Fwd(FwdData {
        forwarder,
        protocol,
        forwarder_priority: state.forwarder_priority,
        dnssec_validation: state.dnssec_validation,
        proxy_type,
        proxy_address: state.proxy_address.clone().filter(|a| !a.is_empty()),
        proxy_port: state.proxy_port,
        proxy_username: state.proxy_username.clone().filter(|u| !u.is_empty()),
        proxy_password: state.proxy_password.clone(),
    }))
}

fn validation(message: impl Into<String>) -> CoreError {
    CoreError::Validation {
        message: message.into(),
    }
}
