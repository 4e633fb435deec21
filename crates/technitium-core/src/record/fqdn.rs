// ── Zone-relative name handling ──

/// Anchor a record name to its zone.
///
/// `"@"` and the zone apex pass through untouched. Anything else gets
/// `.zone` appended unless the name already ends with a trailing dot,
/// with `.zone`, or with the zone itself. The function is idempotent,
/// so create, read, update, and delete can all normalize without
/// tracking whether the caller already supplied a qualified name.
#[must_use]
pub fn normalize(name: &str, zone: &str) -> String {
    if name == "@" || name == zone {
        return name.to_owned();
    }
    if name.ends_with('.') || name.ends_with(&format!(".{zone}")) || name.ends_with(zone) {
        return name.to_owned();
    }
    format!("{name}.{zone}")
}
