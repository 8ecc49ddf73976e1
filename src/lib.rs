//! PM:INFO Telemetry Processor Library
//!
//! A Rust library for extracting battery and power-management telemetry from
//! free-form device log files carrying the vendor `PM:INFO` marker.
//!
//! This library provides tools for:
//! - Classifying log lines into the key-value and positional telemetry dialects
//! - Extracting current, voltage, temperature and charge state with unit normalization
//! - Assembling an ordered time series with a bounded fault budget
//! - Summarizing a finished series (per-channel extrema, averages, charge-state histogram)
//! - File intake checks and JSON reporting for the command-line front end

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod intake;
        pub mod pm_info_parser;
        pub mod report;
        pub mod summary;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{ChargeState, Encoding, Record, Series};
pub use app::services::pm_info_parser::{PmInfoParser, ParseResult, ParseStats};
pub use app::services::summary::Summary;
pub use config::Config;

/// Result type alias for the PM:INFO processor
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for PM:INFO processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// No line in the input classified as a telemetry record
    #[error("No valid PM:INFO data lines found: {message}")]
    NoMarkerFound { message: String },

    /// Candidate lines existed but none produced an accepted record
    #[error("No PM:INFO data lines could be parsed ({candidates} candidate lines)")]
    EmptyResult { candidates: usize },

    /// File extension not in the intake allow-list
    #[error("Unsupported file type: {file_name}")]
    UnsupportedFileType { file_name: String },

    /// File has no content
    #[error("File is empty: {path}")]
    EmptyFile { path: String },

    /// File exceeds the configured intake size limit
    #[error("File too large: {path} is {size_bytes} bytes, limit is {limit_bytes} bytes")]
    FileTooLarge {
        path: String,
        size_bytes: u64,
        limit_bytes: u64,
    },

    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Data validation error
    #[error("Invalid data: {message}")]
    DataValidation { message: String },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Report serialization error
    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a no-marker-found error
    pub fn no_marker_found(message: impl Into<String>) -> Self {
        Self::NoMarkerFound {
            message: message.into(),
        }
    }

    /// Create an empty-result error
    pub fn empty_result(candidates: usize) -> Self {
        Self::EmptyResult { candidates }
    }

    /// Create an unsupported file type error
    pub fn unsupported_file_type(file_name: impl Into<String>) -> Self {
        Self::UnsupportedFileType {
            file_name: file_name.into(),
        }
    }

    /// Create an empty file error
    pub fn empty_file(path: impl Into<String>) -> Self {
        Self::EmptyFile { path: path.into() }
    }

    /// Create a file too large error
    pub fn file_too_large(path: impl Into<String>, size_bytes: u64, limit_bytes: u64) -> Self {
        Self::FileTooLarge {
            path: path.into(),
            size_bytes,
            limit_bytes,
        }
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a serialization error with context
    pub fn serialization(message: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            message: message.into(),
            source,
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Whether the user can fix this by supplying a different file
    ///
    /// Validation errors map to a client-error response; everything else is
    /// an internal fault reported with diagnostic detail.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::NoMarkerFound { .. }
                | Self::EmptyResult { .. }
                | Self::UnsupportedFileType { .. }
                | Self::EmptyFile { .. }
                | Self::FileTooLarge { .. }
                | Self::FileNotFound { .. }
                | Self::DataValidation { .. }
        )
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<toml::de::Error> for Error {
    fn from(error: toml::de::Error) -> Self {
        Self::Configuration {
            message: format!("Invalid configuration file: {}", error),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization {
            message: "JSON serialization failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}
