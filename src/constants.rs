//! Application constants for the PM:INFO processor
//!
//! This module contains the telemetry marker, field layout of both payload
//! dialects, unit thresholds and intake defaults used throughout the crate.

// =============================================================================
// Telemetry Marker
// =============================================================================

/// Vendor telemetry marker, matched case-insensitively
pub const TELEMETRY_MARKER: &str = "PM:INFO";

// =============================================================================
// Key-Value Dialect
// =============================================================================

/// Keys recognized in `key=value` payloads (compared lowercase)
pub mod keys {
    pub const CURRENT: &str = "curr";
    pub const VOLTAGE: &str = "volt";
    pub const TEMPERATURE: &str = "temp";
    pub const CHARGE: &str = "charge";

    /// All keys that count towards classification
    pub const REQUIRED: &[&str] = &[CURRENT, VOLTAGE, TEMPERATURE, CHARGE];
}

/// Minimum number of distinct required keys for a key-value line to classify
pub const MIN_KEY_VALUE_FIELDS: usize = 3;

/// Key-value voltage is reported in millivolts when above the threshold
pub const KEY_VALUE_VOLTAGE_DIVISOR: f64 = 1000.0;

// =============================================================================
// Positional Dialect
// =============================================================================

/// Token offsets within a positional payload
///
/// Layout: `83214 85 43090 -29781 26 2 0 -17187`
pub mod positional {
    /// Battery level
    pub const BATTERY_LEVEL: usize = 0;
    /// Battery level as shown in the UI
    pub const UI_BATTERY_LEVEL: usize = 1;
    /// Battery voltage, 0.1 mV units
    pub const VBAT: usize = 2;
    /// Secondary battery level reading
    pub const BATTERY_LEVEL_2: usize = 3;
    /// Temperature in degrees Celsius
    pub const TEMPERATURE: usize = 4;
    /// Charger input voltage
    pub const VBUS: usize = 5;
    /// Charge state code (0-7)
    pub const CHARGE_STATE: usize = 6;
    /// Battery current in microamps
    pub const CURRENT: usize = 7;

    /// Tokens expected for a complete positional record
    pub const FIELD_COUNT: usize = 8;
}

/// Minimum number of numeric tokens for a positional line to classify
pub const MIN_POSITIONAL_FIELDS: usize = 4;

/// Positional voltage is reported in 0.1 mV when above the threshold
pub const POSITIONAL_VOLTAGE_DIVISOR: f64 = 10000.0;

/// Raw voltages with a magnitude above this are treated as sub-volt units
pub const VOLTAGE_SCALE_THRESHOLD: f64 = 1000.0;

// =============================================================================
// Assembly Limits
// =============================================================================

/// Counted per-line faults tolerated before the assembler stops early
pub const MAX_PARSE_ERRORS: usize = 10;

// =============================================================================
// Intake Defaults
// =============================================================================

/// File extensions accepted by the intake check
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["log", "txt"];

/// Lines scanned for the marker before committing to a full parse
pub const DEFAULT_PRESCAN_LINES: usize = 100;

/// Maximum accepted file size in megabytes
pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 30;

/// Default configuration file name looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "pminfo-processor.toml";
