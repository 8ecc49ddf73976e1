//! Channel extraction for classified PM:INFO lines
//!
//! Extraction never fails: a line that cannot be read yields the all-zero
//! record with a line-number time, and the reason is reported through
//! `tracing` and the returned [`ExtractionOutcome`]. The two payload dialects
//! have unrelated offsets and unit scales and are handled by separate
//! functions.

use tracing::{debug, warn};

use super::classifier::locate_payload;
use super::patterns::{KEY_VALUE, NUMBER};
use super::time_parsers::{TimeSource, extract_time, fallback_time};
use crate::app::models::{ChargeState, Encoding, Record};
use crate::constants::{
    KEY_VALUE_VOLTAGE_DIVISOR, POSITIONAL_VOLTAGE_DIVISOR, VOLTAGE_SCALE_THRESHOLD, keys,
    positional,
};
use crate::{Error, Result};

/// How completely a line was read
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionOutcome {
    /// All channels read from the payload
    Complete,
    /// Positional payload with fewer than eight values, zero-padded
    Padded { found: usize },
    /// Line could not be read; the record is all zeros
    Fallback { reason: String },
}

/// Result of extracting one line
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Extracted record (zero record on fallback)
    pub record: Record,

    /// Payload dialect, if the marker was found
    pub encoding: Option<Encoding>,

    pub outcome: ExtractionOutcome,

    /// Where the record time came from
    pub time_source: TimeSource,

    /// Charge state code was out of range and replaced by 0
    pub charge_state_clamped: bool,
}

impl Extraction {
    pub fn is_fallback(&self) -> bool {
        matches!(self.outcome, ExtractionOutcome::Fallback { .. })
    }

    pub fn is_padded(&self) -> bool {
        matches!(self.outcome, ExtractionOutcome::Padded { .. })
    }
}

/// Channel values read from a payload before the time is attached
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Channels {
    current: f64,
    voltage: f64,
    temperature: f64,
    charge_state: ChargeState,
    clamped: bool,
}

/// Extract a record from a classified line
///
/// `line_number` is 1-based and only used for the fallback time and logs.
pub fn extract(line: &str, line_number: usize) -> Extraction {
    match try_extract(line, line_number) {
        Ok(extraction) => extraction,
        Err(e) => {
            warn!("Line {}: extraction failed, using zero record: {}", line_number, e);
            Extraction {
                record: Record::zero(fallback_time(line_number)),
                encoding: None,
                outcome: ExtractionOutcome::Fallback {
                    reason: e.to_string(),
                },
                time_source: TimeSource::LineNumber,
                charge_state_clamped: false,
            }
        }
    }
}

fn try_extract(line: &str, line_number: usize) -> Result<Extraction> {
    let payload = locate_payload(line).ok_or_else(|| {
        Error::data_validation(format!("Line {} has no PM:INFO marker", line_number))
    })?;

    let (time, time_source) = extract_time(line, line_number);
    let encoding = Encoding::detect(payload);

    let (channels, outcome) = match encoding {
        Encoding::KeyValue => (
            parse_key_value(payload, line_number),
            ExtractionOutcome::Complete,
        ),
        Encoding::Positional => {
            let (channels, found) = parse_positional(payload, line_number);
            let outcome = if found < positional::FIELD_COUNT {
                ExtractionOutcome::Padded { found }
            } else {
                ExtractionOutcome::Complete
            };
            (channels, outcome)
        }
    };

    Ok(Extraction {
        record: Record {
            time,
            current: channels.current,
            voltage: channels.voltage,
            temperature: channels.temperature,
            charge_state: channels.charge_state,
        },
        encoding: Some(encoding),
        outcome,
        time_source,
        charge_state_clamped: channels.clamped,
    })
}

/// Parse `curr=150 volt=4200 temp=25 charge=0`
///
/// Voltage above the threshold is in millivolts. Repeated keys overwrite,
/// including the clamp flag: an out-of-range `charge` followed by an in-range
/// one leaves the line unclamped, though the first value was already logged.
fn parse_key_value(payload: &str, line_number: usize) -> Channels {
    let mut channels = Channels::default();

    for caps in KEY_VALUE.captures_iter(payload) {
        let key = caps[1].to_lowercase();
        let value = safe_parse_float(&caps[2]);

        match key.as_str() {
            keys::CURRENT => channels.current = value,
            keys::VOLTAGE => {
                channels.voltage = scale_voltage(value, KEY_VALUE_VOLTAGE_DIVISOR);
            }
            keys::TEMPERATURE => channels.temperature = value,
            keys::CHARGE => {
                let (state, clamped) = clamp_charge_state(value, line_number);
                channels.charge_state = state;
                channels.clamped = clamped;
            }
            _ => {}
        }
    }

    channels
}

/// Parse `83214 85 43090 -29781 26 2 0 -17187`, returning the token count found
///
/// Voltage above the threshold is in 0.1 mV.
fn parse_positional(payload: &str, line_number: usize) -> (Channels, usize) {
    let mut values: Vec<&str> = NUMBER.find_iter(payload).map(|m| m.as_str()).collect();
    let found = values.len();

    if found < positional::FIELD_COUNT {
        warn!(
            "Line {}: found {} numeric values, expected {}; padding with zeros",
            line_number,
            found,
            positional::FIELD_COUNT
        );
        values.resize(positional::FIELD_COUNT, "0");
    }

    let (charge_state, clamped) =
        clamp_charge_state(safe_parse_float(values[positional::CHARGE_STATE]), line_number);

    let channels = Channels {
        current: safe_parse_float(values[positional::CURRENT]),
        voltage: scale_voltage(
            safe_parse_float(values[positional::VBAT]),
            POSITIONAL_VOLTAGE_DIVISOR,
        ),
        temperature: safe_parse_float(values[positional::TEMPERATURE]),
        charge_state,
        clamped,
    };

    (channels, found)
}

/// Divide raw voltages whose magnitude exceeds the threshold
fn scale_voltage(raw: f64, divisor: f64) -> f64 {
    if raw.abs() > VOLTAGE_SCALE_THRESHOLD {
        raw / divisor
    } else {
        raw
    }
}

/// Truncate to a charge state code, replacing out-of-range codes with 0
fn clamp_charge_state(raw: f64, line_number: usize) -> (ChargeState, bool) {
    let code = raw.trunc() as i64;
    match ChargeState::from_code(code) {
        Some(state) => (state, false),
        None => {
            warn!(
                "Line {}: charge state {} out of range, reset to 0",
                line_number, code
            );
            (ChargeState::NoCharge, true)
        }
    }
}

/// Parse a numeric token, defaulting to 0.0
fn safe_parse_float(token: &str) -> f64 {
    token.parse::<f64>().unwrap_or_else(|_| {
        debug!("Could not parse '{}' as float, using 0.0", token);
        0.0
    })
}
