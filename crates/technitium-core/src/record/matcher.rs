// ── Candidate matching for record reads ──
//
// `zones/records/get` returns every record at a name. Read narrows
// that list back down to the one instance its identity describes. A
// miss is a state signal (the record is gone remotely), never an
// error.

use technitium_api::records::DnsRecord;

/// Find the record matching the identity constraints.
///
/// Candidates are filtered by type, then checked against whichever
/// constraints the identity actually carries; the first candidate
/// passing every supplied check wins. TXT values are compared both raw
/// and quote-stripped because the server's quoting behavior differs
/// across releases. PTR, NS, and SRV identities carry no usable data
/// constraint, so for those the first record of the type wins.
pub fn find<'a>(
    candidates: &'a [DnsRecord],
    record_type: &str,
    priority: Option<u16>,
    data: Option<&str>,
) -> Option<&'a DnsRecord> {
    candidates
        .iter()
        .filter(|record| record.record_type == record_type)
        .find(|record| matches(record, record_type, priority, data))
}

fn matches(record: &DnsRecord, record_type: &str, priority: Option<u16>, data: Option<&str>) -> bool {
    match record_type {
        "MX" => {
            let preference_ok = priority.is_none_or(|p| record.r_data.preference == Some(p));
            let exchange_ok = data.is_none_or(|d| record.r_data.exchange.as_deref() == Some(d));
            preference_ok && exchange_ok
        }
        "A" | "AAAA" => data.is_none_or(|d| record.r_data.ip_address.as_deref() == Some(d)),
        "CNAME" => data.is_none_or(|d| record.r_data.cname.as_deref() == Some(d)),
        "FWD" => data.is_none_or(|d| record.r_data.forwarder.as_deref() == Some(d)),
        "TXT" => data.is_none_or(|d| {
            let text = record.r_data.text.as_deref().unwrap_or("");
            text == d || text.trim_matches('"') == d.trim_matches('"')
        }),
        _ => true,
    }
}
