//! Data models for PM:INFO telemetry processing
//!
//! This module contains the core data structures for representing battery
//! telemetry records extracted from device logs and the ordered series they
//! form.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Payload Encoding
// =============================================================================

/// The two payload dialects that share the `PM:INFO` marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Encoding {
    /// `curr=150 volt=4200 temp=25 charge=0`
    KeyValue,
    /// `83214 85 43090 -29781 26 2 0 -17187`
    Positional,
}

impl Encoding {
    /// Decide the dialect of a payload by its structure alone
    pub fn detect(payload: &str) -> Self {
        if payload.contains('=') {
            Encoding::KeyValue
        } else {
            Encoding::Positional
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Encoding::KeyValue => write!(f, "key-value"),
            Encoding::Positional => write!(f, "positional"),
        }
    }
}

// =============================================================================
// Charge State
// =============================================================================

/// Charger state codes reported by the power-management firmware
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChargeState {
    /// Charging stopped
    #[default]
    NoCharge = 0,
    /// Battery discharging
    Discharge = 1,
    /// Pre-charge (trickle) phase
    Precharge = 2,
    /// Constant-current phase
    #[serde(rename = "cc_charge")]
    ConstantCurrent = 3,
    /// Constant-voltage phase
    #[serde(rename = "cv_charge")]
    ConstantVoltage = 4,
    /// Battery full
    Full = 5,
    /// Charge cycle complete
    Done = 6,
    /// Charger fault
    Fault = 7,
}

impl ChargeState {
    /// All states in code order
    pub const ALL: [ChargeState; 8] = [
        ChargeState::NoCharge,
        ChargeState::Discharge,
        ChargeState::Precharge,
        ChargeState::ConstantCurrent,
        ChargeState::ConstantVoltage,
        ChargeState::Full,
        ChargeState::Done,
        ChargeState::Fault,
    ];

    /// Look up a state by its numeric code
    pub fn from_code(code: i64) -> Option<Self> {
        usize::try_from(code)
            .ok()
            .and_then(|index| Self::ALL.get(index).copied())
    }

    /// Numeric code as emitted by the device
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Key used in serialized charge-state histograms
    pub fn key(self) -> &'static str {
        match self {
            ChargeState::NoCharge => "no_charge",
            ChargeState::Discharge => "discharge",
            ChargeState::Precharge => "precharge",
            ChargeState::ConstantCurrent => "cc_charge",
            ChargeState::ConstantVoltage => "cv_charge",
            ChargeState::Full => "full",
            ChargeState::Done => "done",
            ChargeState::Fault => "fault",
        }
    }

    /// Human-readable description
    pub fn description(self) -> &'static str {
        match self {
            ChargeState::NoCharge => "No charge",
            ChargeState::Discharge => "Discharging",
            ChargeState::Precharge => "Pre-charge",
            ChargeState::ConstantCurrent => "Constant current",
            ChargeState::ConstantVoltage => "Constant voltage",
            ChargeState::Full => "Full",
            ChargeState::Done => "Done",
            ChargeState::Fault => "Fault",
        }
    }
}

impl TryFrom<i64> for ChargeState {
    type Error = Error;

    fn try_from(code: i64) -> Result<Self> {
        Self::from_code(code).ok_or_else(|| {
            Error::data_validation(format!(
                "Invalid charge state code {}: must be between 0 and 7",
                code
            ))
        })
    }
}

impl fmt::Display for ChargeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Telemetry Record
// =============================================================================

/// One accepted telemetry data point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Time of day as `HH:MM:SS` (may be synthesized from the line number)
    pub time: String,

    /// Battery current in microamps
    pub current: f64,

    /// Battery voltage in volts
    pub voltage: f64,

    /// Temperature in degrees Celsius
    pub temperature: f64,

    /// Charger state
    pub charge_state: ChargeState,
}

impl Record {
    /// Create a new record with validation
    pub fn new(
        time: String,
        current: f64,
        voltage: f64,
        temperature: f64,
        charge_state: ChargeState,
    ) -> Result<Self> {
        let record = Self {
            time,
            current,
            voltage,
            temperature,
            charge_state,
        };

        record.validate()?;
        Ok(record)
    }

    /// The all-zero record used when extraction cannot read a line
    pub fn zero(time: String) -> Self {
        Self {
            time,
            current: 0.0,
            voltage: 0.0,
            temperature: 0.0,
            charge_state: ChargeState::NoCharge,
        }
    }

    /// Validate channel values
    pub fn validate(&self) -> Result<()> {
        if self.time.trim().is_empty() {
            return Err(Error::data_validation("Record time cannot be empty"));
        }

        for (channel, value) in [
            ("current", self.current),
            ("voltage", self.voltage),
            ("temperature", self.temperature),
        ] {
            if !value.is_finite() {
                return Err(Error::data_validation(format!(
                    "Non-finite {} value: {}",
                    channel, value
                )));
            }
        }

        Ok(())
    }
}

// =============================================================================
// Telemetry Series
// =============================================================================

/// Ordered telemetry series in source line order
///
/// Stored column-wise to match the downstream chart contract. Columns are
/// only ever extended together through [`Series::push`], so they always have
/// equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    time: Vec<String>,
    current: Vec<f64>,
    temperature: Vec<f64>,
    voltage: Vec<f64>,
    charge_state: Vec<u8>,
}

impl Series {
    /// Create an empty series
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty series with room for `capacity` records
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            time: Vec::with_capacity(capacity),
            current: Vec::with_capacity(capacity),
            temperature: Vec::with_capacity(capacity),
            voltage: Vec::with_capacity(capacity),
            charge_state: Vec::with_capacity(capacity),
        }
    }

    /// Append one record to all five columns
    pub fn push(&mut self, record: Record) {
        self.time.push(record.time);
        self.current.push(record.current);
        self.temperature.push(record.temperature);
        self.voltage.push(record.voltage);
        self.charge_state.push(record.charge_state.code());
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[String] {
        &self.time
    }

    pub fn current(&self) -> &[f64] {
        &self.current
    }

    pub fn temperature(&self) -> &[f64] {
        &self.temperature
    }

    pub fn voltage(&self) -> &[f64] {
        &self.voltage
    }

    pub fn charge_state(&self) -> &[u8] {
        &self.charge_state
    }

    /// Reassemble the record at `index`
    pub fn get(&self, index: usize) -> Option<Record> {
        if index >= self.len() {
            return None;
        }

        Some(Record {
            time: self.time[index].clone(),
            current: self.current[index],
            voltage: self.voltage[index],
            temperature: self.temperature[index],
            charge_state: ChargeState::from_code(i64::from(self.charge_state[index]))
                .unwrap_or_default(),
        })
    }

    /// Iterate over records in series order
    pub fn iter(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.len()).filter_map(move |index| self.get(index))
    }
}

impl FromIterator<Record> for Series {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        let mut series = Series::new();
        for record in iter {
            series.push(record);
        }
        series
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_record(time: &str, current: f64) -> Record {
        Record::new(time.to_string(), current, 4.2, 25.0, ChargeState::Discharge).unwrap()
    }

    #[test]
    fn test_encoding_detection() {
        assert_eq!(
            Encoding::detect(" curr=150 volt=4200"),
            Encoding::KeyValue
        );
        assert_eq!(
            Encoding::detect(" 83214 85 43090 -29781"),
            Encoding::Positional
        );
        assert_eq!(Encoding::detect(""), Encoding::Positional);
    }

    #[test]
    fn test_charge_state_codes() {
        for (code, state) in ChargeState::ALL.iter().enumerate() {
            assert_eq!(state.code() as usize, code);
            assert_eq!(ChargeState::from_code(code as i64), Some(*state));
        }

        assert_eq!(ChargeState::from_code(8), None);
        assert_eq!(ChargeState::from_code(-1), None);
        assert!(ChargeState::try_from(9).is_err());
        assert_eq!(ChargeState::try_from(3).unwrap(), ChargeState::ConstantCurrent);
    }

    #[test]
    fn test_charge_state_serialization_keys() {
        for state in ChargeState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.key()));
        }
    }

    #[test]
    fn test_record_validation() {
        assert!(Record::new("00:00:01".to_string(), 1.0, 2.0, 3.0, ChargeState::Full).is_ok());

        let result = Record::new(
            "00:00:01".to_string(),
            f64::INFINITY,
            2.0,
            3.0,
            ChargeState::Full,
        );
        assert!(matches!(result, Err(Error::DataValidation { .. })));

        let result = Record::new("00:00:01".to_string(), 1.0, f64::NAN, 3.0, ChargeState::Full);
        assert!(result.is_err());

        let result = Record::new("  ".to_string(), 1.0, 2.0, 3.0, ChargeState::Full);
        assert!(result.is_err());
    }

    #[test]
    fn test_series_columns_stay_aligned() {
        let mut series = Series::new();
        assert!(series.is_empty());

        series.push(create_test_record("00:00:01", 100.0));
        series.push(create_test_record("00:00:02", -50.0));

        assert_eq!(series.len(), 2);
        assert_eq!(series.time().len(), 2);
        assert_eq!(series.current().len(), 2);
        assert_eq!(series.voltage().len(), 2);
        assert_eq!(series.temperature().len(), 2);
        assert_eq!(series.charge_state().len(), 2);

        assert_eq!(series.current(), &[100.0, -50.0]);
        assert_eq!(series.charge_state(), &[1, 1]);
    }

    #[test]
    fn test_series_get_and_iter() {
        let series: Series = vec![
            create_test_record("10:00:00", 1.0),
            create_test_record("10:00:01", 2.0),
        ]
        .into_iter()
        .collect();

        let first = series.get(0).unwrap();
        assert_eq!(first.time, "10:00:00");
        assert_eq!(first.charge_state, ChargeState::Discharge);
        assert!(series.get(2).is_none());

        let times: Vec<String> = series.iter().map(|r| r.time).collect();
        assert_eq!(times, vec!["10:00:00", "10:00:01"]);
    }

    #[test]
    fn test_series_serialization_contract() {
        let mut series = Series::new();
        series.push(create_test_record("00:00:01", 150.0));

        let value = serde_json::to_value(&series).unwrap();
        assert_eq!(value["time"][0], "00:00:01");
        assert_eq!(value["current"][0], 150.0);
        assert_eq!(value["voltage"][0], 4.2);
        assert_eq!(value["temperature"][0], 25.0);
        assert_eq!(value["chargeState"][0], 1);
    }
}
