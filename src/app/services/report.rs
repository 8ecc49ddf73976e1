//! Success and failure payloads handed to report consumers
//!
//! The chart front end consumes `{data, stats}`; failures are reported as
//! `{error, details}` with a class that separates user-correctable input
//! problems from internal faults.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;

use super::summary::Summary;
use crate::Error;
use crate::app::models::Series;

/// Successful analysis of one file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    /// Parsed time series
    pub data: Series,

    /// Summary statistics over `data`
    pub stats: Summary,
}

impl AnalysisReport {
    /// Build a report, computing the summary from the series
    pub fn new(data: Series) -> Self {
        let stats = Summary::from_series(&data);
        Self { data, stats }
    }

    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::serialization("Failed to serialize analysis report", e))
    }
}

/// Whether a failure is the caller's to fix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureClass {
    /// Wrong file or wrong format
    ClientError,
    /// Unexpected internal fault
    ServerError,
}

impl FailureClass {
    /// Process exit code for this class
    pub fn exit_code(self) -> i32 {
        match self {
            FailureClass::ClientError => 2,
            FailureClass::ServerError => 1,
        }
    }
}

/// Failed analysis of one file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Human-readable message
    pub error: String,

    /// Corrective hint or diagnostic detail
    pub details: String,

    #[serde(skip)]
    pub class: Option<FailureClass>,
}

impl ErrorReport {
    /// Map a processing error to its report
    pub fn from_error(error: &Error) -> Self {
        if error.is_validation() {
            Self {
                error: format!("Data validation error: {}", error),
                details: hint_for(error).to_string(),
                class: Some(FailureClass::ClientError),
            }
        } else {
            Self {
                error: "File processing failed".to_string(),
                details: diagnostic_chain(error),
                class: Some(FailureClass::ServerError),
            }
        }
    }

    pub fn class(&self) -> FailureClass {
        self.class.unwrap_or(FailureClass::ServerError)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::serialization("Failed to serialize error report", e))
    }
}

impl From<&Error> for ErrorReport {
    fn from(error: &Error) -> Self {
        Self::from_error(error)
    }
}

fn hint_for(error: &Error) -> &'static str {
    match error {
        Error::UnsupportedFileType { .. } => "Unsupported file extension; see intake.allowed_extensions",
        Error::EmptyFile { .. } => "The file has no content",
        Error::FileNotFound { .. } => "Check the file path",
        Error::FileTooLarge { .. } => "Split the log or raise intake.max_file_size_mb",
        _ => "Please check that the file is a device log containing PM:INFO lines",
    }
}

/// Error message followed by its source chain
fn diagnostic_chain(error: &Error) -> String {
    let mut message = error.to_string();
    let mut source = StdError::source(error);
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = StdError::source(cause);
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::{ChargeState, Record};

    #[test]
    fn test_analysis_report_shape() {
        let mut series = Series::new();
        series.push(
            Record::new("00:00:01".to_string(), 150.0, 4.2, 25.0, ChargeState::NoCharge).unwrap(),
        );

        let report = AnalysisReport::new(series);
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert_eq!(value["data"]["time"][0], "00:00:01");
        assert_eq!(value["data"]["chargeState"][0], 0);
        assert_eq!(value["stats"]["totalPoints"], 1);
        assert_eq!(value["stats"]["chargeStateCounts"]["no_charge"], 1);
        assert_eq!(value["stats"]["maxCurrent"], 150.0);
    }

    #[test]
    fn test_validation_errors_are_client_errors() {
        let report = ErrorReport::from_error(&Error::no_marker_found("nothing here"));

        assert_eq!(report.class(), FailureClass::ClientError);
        assert!(report.error.starts_with("Data validation error:"));
        assert!(report.details.contains("PM:INFO"));

        let report = ErrorReport::from(&Error::empty_result(3));
        assert_eq!(report.class(), FailureClass::ClientError);

        let report = ErrorReport::from(&Error::unsupported_file_type("a.csv"));
        assert_eq!(report.details, "Unsupported file extension; see intake.allowed_extensions");
    }

    #[test]
    fn test_internal_errors_are_server_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let report = ErrorReport::from_error(&Error::io("Failed to read device.log", io));

        assert_eq!(report.class(), FailureClass::ServerError);
        assert_eq!(report.error, "File processing failed");
        assert!(report.details.contains("Failed to read device.log"));
        assert!(report.details.ends_with("denied"));
    }

    #[test]
    fn test_error_report_json_omits_class() {
        let report = ErrorReport::from_error(&Error::empty_file("a.log"));
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();

        assert!(value.get("error").is_some());
        assert!(value.get("details").is_some());
        assert!(value.get("class").is_none());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(FailureClass::ClientError.exit_code(), 2);
        assert_eq!(FailureClass::ServerError.exit_code(), 1);
    }
}
