// ── Composite record identity ──
//
// Technitium exposes no durable per-record ID, so the reconciler
// synthesizes one from the record's own declared values:
//
//   zone:name:type[:priority][:data]
//
// The string form exists only at the engine boundary, as the opaque
// resource ID and as import input; everything internal operates on the
// parsed struct. The priority segment is carried for MX and SRV. The
// data segment is dropped for TXT (free-form text breaks the
// delimiter) and FWD (the forwarder address is mutable), so two TXT or
// FWD records sharing zone, name, and type cannot be told apart by
// identity alone; reads resolve to the first match. AAAA data embeds
// colons itself, so a decoded AAAA identity keeps only the first data
// segment; matching still narrows correctly because candidate lists
// are already scoped to zone and name.

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Parsed form of the composite identity string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordIdentity {
    pub zone: String,
    pub name: String,
    pub record_type: String,
    pub priority: Option<u16>,
    pub data: Option<String>,
}

impl RecordIdentity {
    /// Build the identity for a freshly created record from its
    /// declared values, applying the per-type segment rules.
    #[must_use]
    pub fn new(
        zone: &str,
        name: &str,
        record_type: &str,
        priority: Option<u16>,
        data: Option<&str>,
    ) -> Self {
        let keeps_priority = matches!(record_type, "MX" | "SRV");
        let keeps_data = !matches!(record_type, "TXT" | "FWD");
        Self {
            zone: zone.to_owned(),
            name: name.to_owned(),
            record_type: record_type.to_owned(),
            priority: priority.filter(|_| keeps_priority),
            data: data
                .filter(|d| keeps_data && !d.is_empty())
                .map(str::to_owned),
        }
    }
}

impl fmt::Display for RecordIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.zone, self.name, self.record_type)?;
        if let Some(priority) = self.priority {
            write!(f, ":{priority}")?;
        }
        if let Some(data) = &self.data {
            write!(f, ":{data}")?;
        }
        Ok(())
    }
}

impl FromStr for RecordIdentity {
    type Err = CoreError;

    /// The fourth segment is a priority when it parses as a number and
    /// a data value otherwise; a fifth segment is always data. Anything
    /// past the fifth is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() < 3 {
            return Err(CoreError::InvalidId {
                message:
                    "Import ID must be in the format zone:name:type or zone:name:type:priority:data"
                        .to_owned(),
            });
        }

        let mut identity = Self {
            zone: parts[0].to_owned(),
            name: parts[1].to_owned(),
            record_type: parts[2].to_owned(),
            priority: None,
            data: None,
        };
        if let Some(fourth) = parts.get(3) {
            match fourth.parse::<u16>() {
                Ok(priority) => identity.priority = Some(priority),
                Err(_) => identity.data = Some((*fourth).to_owned()),
            }
        }
        if let Some(fifth) = parts.get(4) {
            identity.data = Some((*fifth).to_owned());
        }
        Ok(identity)
    }
}
