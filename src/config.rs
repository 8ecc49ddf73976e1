//! Configuration management and validation.
//!
//! Provides configuration structures for file intake, concurrency and
//! logging. Configuration is layered: built-in defaults, then an optional
//! TOML file, then command-line overrides. The parser core itself needs no
//! configuration.

use crate::constants::{
    DEFAULT_ALLOWED_EXTENSIONS, DEFAULT_CONFIG_FILE, DEFAULT_MAX_FILE_SIZE_MB,
    DEFAULT_PRESCAN_LINES,
};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub intake: IntakeConfig,
    pub performance: PerformanceConfig,
    pub logging: LoggingConfig,
}

/// File intake checks applied before parsing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Accepted file extensions, compared case-insensitively
    pub allowed_extensions: Vec<String>,

    /// Lines scanned for the marker before a full parse (0 disables the pre-scan)
    pub prescan_lines: usize,

    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            prescan_lines: DEFAULT_PRESCAN_LINES,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
        }
    }
}

impl IntakeConfig {
    /// Size limit in bytes
    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    /// Check a file name against the extension allow-list
    pub fn is_allowed_file(&self, file_name: &str) -> bool {
        match file_name.rsplit_once('.') {
            Some((_, ext)) => self
                .allowed_extensions
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

/// Concurrency settings for multi-file runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerformanceConfig {
    /// Files analyzed at the same time
    pub max_concurrent_files: usize,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            max_concurrent_files: num_cpus::get(),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is not set
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Default config file location (working directory)
    pub fn default_config_path() -> PathBuf {
        PathBuf::from(DEFAULT_CONFIG_FILE)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;

        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load defaults, then the given file or the default file when present
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let config = match config_file {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::file_not_found(path.display().to_string()));
                }
                debug!("Loading config file: {}", path.display());
                Self::from_file(path)?
            }
            None => {
                let default_path = Self::default_config_path();
                if default_path.exists() {
                    debug!("Loading default config file: {}", default_path.display());
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.intake.allowed_extensions.is_empty() {
            return Err(Error::configuration(
                "intake.allowed_extensions must not be empty",
            ));
        }

        if self
            .intake
            .allowed_extensions
            .iter()
            .any(|ext| ext.trim().is_empty() || ext.contains('.'))
        {
            return Err(Error::configuration(
                "intake.allowed_extensions entries must be bare extensions like \"log\"",
            ));
        }

        if self.intake.max_file_size_mb == 0 {
            return Err(Error::configuration(
                "intake.max_file_size_mb must be greater than 0",
            ));
        }

        if self.performance.max_concurrent_files == 0 {
            return Err(Error::configuration(
                "performance.max_concurrent_files must be greater than 0",
            ));
        }

        Ok(())
    }

    /// Set the number of files analyzed concurrently
    pub fn with_max_concurrent_files(mut self, max_files: usize) -> Self {
        self.performance.max_concurrent_files = max_files;
        self
    }

    /// Set the pre-scan window
    pub fn with_prescan_lines(mut self, lines: usize) -> Self {
        self.intake.prescan_lines = lines;
        self
    }

    /// Set the file size limit
    pub fn with_max_file_size_mb(mut self, size_mb: u64) -> Self {
        self.intake.max_file_size_mb = size_mb;
        self
    }

    /// Set the default log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.logging.level = level.into();
        self
    }
}
