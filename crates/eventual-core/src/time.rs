// Timestamp conversion between what the backend returns (ISO-8601) and
// what it accepts on writes (`dd/mm/YYYY HH:MM`).

use chrono::{DateTime, NaiveDateTime};

/// Format the backend accepts for event timestamps.
pub const INPUT_FORMAT: &str = "%d/%m/%Y %H:%M";

/// Reformat a stored timestamp for an edit form.
///
/// Accepts RFC 3339 and naive ISO-8601 (with or without fractional
/// seconds). Anything unparseable, including a value already in input
/// form, is returned unchanged.
pub fn to_input_format(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format(INPUT_FORMAT).to_string();
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return dt.format(INPUT_FORMAT).to_string();
        }
    }
    raw.to_owned()
}

/// Whether a timestamp is already in `dd/mm/YYYY HH:MM` form.
pub fn is_input_format(raw: &str) -> bool {
    NaiveDateTime::parse_from_str(raw.trim(), INPUT_FORMAT).is_ok()
}
