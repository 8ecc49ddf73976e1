//! Line classification for PM:INFO telemetry
//!
//! Decides whether a line carries a telemetry record and which payload
//! dialect it uses. Every function here is total: arbitrary input yields
//! `false`/`None`, never a panic.

use std::collections::HashSet;

use super::patterns::{KEY_VALUE, NUMBER};
use crate::app::models::Encoding;
use crate::constants::{MIN_KEY_VALUE_FIELDS, MIN_POSITIONAL_FIELDS, TELEMETRY_MARKER, keys};

/// Return the text after the first case-insensitive marker occurrence
pub fn locate_payload(line: &str) -> Option<&str> {
    let marker = TELEMETRY_MARKER.as_bytes();
    let start = line
        .as_bytes()
        .windows(marker.len())
        .position(|window| window.eq_ignore_ascii_case(marker))?;

    // The marker is ASCII, so the byte after it is a char boundary
    line.get(start + marker.len()..)
}

/// Cheap marker-only test, used for pre-scanning files
pub fn contains_marker(line: &str) -> bool {
    locate_payload(line).is_some()
}

/// Classify a payload (the text after the marker)
pub fn classify_payload(payload: &str) -> Option<Encoding> {
    let encoding = Encoding::detect(payload);
    let eligible = match encoding {
        Encoding::KeyValue => recognized_key_count(payload) >= MIN_KEY_VALUE_FIELDS,
        Encoding::Positional => NUMBER.find_iter(payload).count() >= MIN_POSITIONAL_FIELDS,
    };

    eligible.then_some(encoding)
}

/// Classify a full log line, returning its dialect when it is eligible
pub fn classify_line(line: &str) -> Option<Encoding> {
    locate_payload(line).and_then(classify_payload)
}

/// True iff the line is an eligible telemetry line
pub fn classify(line: &str) -> bool {
    classify_line(line).is_some()
}

/// Number of distinct required keys present in a key-value payload
fn recognized_key_count(payload: &str) -> usize {
    let found: HashSet<String> = KEY_VALUE
        .captures_iter(payload)
        .filter_map(|caps| caps.get(1))
        .map(|key| key.as_str().to_lowercase())
        .collect();

    keys::REQUIRED
        .iter()
        .filter(|&&key| found.contains(key))
        .count()
}
