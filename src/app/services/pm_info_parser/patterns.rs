//! Compiled token patterns for PM:INFO lines

use regex::Regex;
use std::sync::LazyLock;

/// Optionally signed, optionally decimal numeric literal
pub static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("number pattern is valid"));

/// `key=value` pair with a numeric value
pub static KEY_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\w+)=([-+]?[0-9]*\.?[0-9]+)").expect("key-value pattern is valid")
});

/// Bare `HH:MM:SS` time of day
pub static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([0-9]{2}:[0-9]{2}:[0-9]{2})").expect("clock time pattern is valid")
});

/// `I>` uptime stamp in seconds
pub static UPTIME_SECONDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"I>([0-9]+\.[0-9]+)").expect("uptime pattern is valid"));

/// `MM/DD HH:MM:SS` date stamp
pub static DATE_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{2}/[0-9]{2}\s+([0-9]{2}:[0-9]{2}:[0-9]{2})")
        .expect("date time pattern is valid")
});
