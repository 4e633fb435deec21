// ── Typed record payloads ──
//
// A closed sum over the record types the reconciler writes. Building
// one goes through `validate`, which is where malformed field
// combinations are rejected; the option mapper serializes variants
// into wire parameters without any stringly-typed keys in between.

use super::RecordType;

/// Transport used to reach a forwarder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum ForwarderProtocol {
    #[default]
    Udp,
    Tcp,
    Tls,
    Https,
    Quic,
}

/// Proxy a forwarder routes its queries through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, strum::Display, strum::EnumString)]
pub enum ProxyKind {
    NoProxy,
    #[default]
    DefaultProxy,
    Http,
    Socks5,
}

impl ProxyKind {
    /// Http and Socks5 proxies need an explicit address.
    #[must_use]
    pub fn requires_address(self) -> bool {
        matches!(self, Self::Http | Self::Socks5)
    }
}

/// FWD record payload. Only `forwarder` is mandatory; the protocol
/// defaults to UDP because the server applies no default of its own.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FwdData {
    pub forwarder: String,
    pub protocol: ForwarderProtocol,
    pub forwarder_priority: Option<u16>,
    pub dnssec_validation: Option<bool>,
    pub proxy_type: Option<ProxyKind>,
    pub proxy_address: Option<String>,
    pub proxy_port: Option<u16>,
    pub proxy_username: Option<String>,
    pub proxy_password: Option<String>,
}

/// Type-specific record payload.
#[derive(Debug, Clone, PartialEq)]
pub enum RData {
    A {
        ip_address: String,
    },
    Aaaa {
        ip_address: String,
    },
    Cname {
        cname: String,
    },
    Mx {
        exchange: String,
        preference: u16,
    },
    Txt {
        text: String,
    },
    Ptr {
        ptr_name: String,
    },
    Ns {
        name_server: String,
    },
    Srv {
        target: String,
        priority: u16,
        weight: u16,
        port: u16,
    },
    Fwd(FwdData),
}

impl RData {
    #[must_use]
    pub fn record_type(&self) -> RecordType {
        match self {
            Self::A { .. } => RecordType::A,
            Self::Aaaa { .. } => RecordType::Aaaa,
            Self::Cname { .. } => RecordType::Cname,
            Self::Mx { .. } => RecordType::Mx,
            Self::Txt { .. } => RecordType::Txt,
            Self::Ptr { .. } => RecordType::Ptr,
            Self::Ns { .. } => RecordType::Ns,
            Self::Srv { .. } => RecordType::Srv,
            Self::Fwd(_) => RecordType::Fwd,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::RecordType;
    use super::{ForwarderProtocol, ProxyKind, RData};

    #[test]
    fn record_types_render_uppercase() {
        assert_eq!(RecordType::Aaaa.to_string(), "AAAA");
        assert_eq!(RecordType::Cname.to_string(), "CNAME");
        assert_eq!(RecordType::Fwd.to_string(), "FWD");
        assert_eq!("SRV".parse::<RecordType>().unwrap(), RecordType::Srv);
    }

    #[test]
    fn lowercase_type_names_are_rejected() {
        assert!("cname".parse::<RecordType>().is_err());
    }

    #[test]
    fn forwarder_protocol_round_trips() {
        assert_eq!(ForwarderProtocol::default(), ForwarderProtocol::Udp);
        assert_eq!(
            "Quic".parse::<ForwarderProtocol>().unwrap(),
            ForwarderProtocol::Quic
        );
        assert_eq!(ForwarderProtocol::Https.to_string(), "Https");
    }

    #[test]
    fn proxy_kinds_know_when_an_address_is_needed() {
        assert!(ProxyKind::Http.requires_address());
        assert!(ProxyKind::Socks5.requires_address());
        assert!(!ProxyKind::NoProxy.requires_address());
        assert!(!ProxyKind::DefaultProxy.requires_address());
    }

    #[test]
    fn payload_reports_its_record_type() {
        let rdata = RData::Mx {
            exchange: "mail.example.com".into(),
            preference: 10,
        };
        assert_eq!(rdata.record_type(), RecordType::Mx);
        assert_eq!(rdata.record_type().to_string(), "MX");
    }
}
