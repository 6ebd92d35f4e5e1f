/// Identifiers that carry no information: absent, blank, or a spreadsheet "nan".
pub fn is_usable_identifier(id: Option<&str>) -> bool {
    match id.map(str::trim) {
        Some(s) => !s.is_empty() && !s.eq_ignore_ascii_case("nan"),
        None => false,
    }
}

/// Keys to try for one identifier, most literal first.
///
/// The raw key is followed by at most one delimiter-substituted variant:
/// `_` becomes `-` when the key holds an underscore, otherwise `-` becomes `_`.
pub fn key_variants(raw: &str) -> Vec<String> {
    let raw = raw.trim();
    let mut out = vec![raw.to_string()];
    if raw.contains('_') {
        out.push(raw.replace('_', "-"));
    } else if raw.contains('-') {
        out.push(raw.replace('-', "_"));
    }
    out
}
