// ── Wire parameter mapping ──
//
// Serializes a typed payload into the query parameters the records
// endpoints expect. Update calls merge two builds of this table: bare
// names locate the existing record, `new`-prefixed names carry the
// desired values.

use technitium_api::QueryParams;

use super::rdata::{FwdData, RData};

/// Which side of a lifecycle call a parameter set describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Create,
    /// The existing record an update must locate.
    Current,
    /// The desired record values of an update.
    New,
    Delete,
}

impl OperationKind {
    fn prefix(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Create | Self::Current | Self::Delete => "",
        }
    }

    /// Comments ride along only when writing the desired state.
    fn carries_comments(self) -> bool {
        matches!(self, Self::Create | Self::New)
    }
}

/// Build the parameter table for one record payload.
pub fn build(rdata: &RData, kind: OperationKind, comments: Option<&str>) -> QueryParams {
    let mut params = QueryParams::new();

    for (name, value) in typed_params(rdata) {
        params.insert(prefixed(kind.prefix(), name), value);
    }

    // FWD auxiliary settings keep their bare names on every operation;
    // the update endpoint has no `new`-prefixed variants for them.
    if let RData::Fwd(fwd) = rdata {
        for (name, value) in forwarder_settings(fwd) {
            params.insert(name.to_owned(), value);
        }
    }

    if kind.carries_comments() {
        if let Some(comments) = comments {
            params.insert("comments".to_owned(), comments.to_owned());
        }
    }

    params
}

fn typed_params(rdata: &RData) -> Vec<(&'static str, String)> {
    match rdata {
        RData::A { ip_address } | RData::Aaaa { ip_address } => {
            vec![("ipAddress", ip_address.clone())]
        }
        RData::Cname { cname } => vec![("cname", cname.clone())],
        RData::Mx {
            exchange,
            preference,
        } => vec![
            ("exchange", exchange.clone()),
            ("preference", preference.to_string()),
        ],
        // The server quotes TXT values itself; sending a pre-quoted
        // value would double-quote it.
        RData::Txt { text } => vec![("text", text.trim_matches('"').to_owned())],
        RData::Ptr { ptr_name } => vec![("ptrName", ptr_name.clone())],
        RData::Ns { name_server } => vec![("nameServer", name_server.clone())],
        RData::Srv {
            target,
            priority,
            weight,
            port,
        } => vec![
            ("target", target.clone()),
            ("priority", priority.to_string()),
            ("weight", weight.to_string()),
            ("port", port.to_string()),
        ],
        RData::Fwd(fwd) => vec![
            ("protocol", fwd.protocol.to_string()),
            ("forwarder", fwd.forwarder.clone()),
        ],
    }
}

fn forwarder_settings(fwd: &FwdData) -> Vec<(&'static str, String)> {
    let mut settings = Vec::new();
    if let Some(priority) = fwd.forwarder_priority {
        settings.push(("forwarderPriority", priority.to_string()));
    }
    if let Some(validate) = fwd.dnssec_validation {
        settings.push(("dnssecValidation", validate.to_string()));
    }
    if let Some(kind) = fwd.proxy_type {
        settings.push(("proxyType", kind.to_string()));
    }
    if let Some(address) = &fwd.proxy_address {
        settings.push(("proxyAddress", address.clone()));
    }
    if let Some(port) = fwd.proxy_port {
        settings.push(("proxyPort", port.to_string()));
    }
    if let Some(username) = &fwd.proxy_username {
        settings.push(("proxyUsername", username.clone()));
    }
    if let Some(password) = &fwd.proxy_password {
        settings.push(("proxyPassword", password.clone()));
    }
    settings
}

fn prefixed(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        return name.to_owned();
    }
    let mut key = String::with_capacity(prefix.len() + name.len());
    key.push_str(prefix);
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        key.extend(first.to_uppercase());
    }
    key.push_str(chars.as_str());
    key
}
