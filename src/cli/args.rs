//! Command-line argument definitions for the PM:INFO processor
//!
//! Defines the CLI interface using the clap derive API. Both subcommands take
//! one or more log files or directories; directories are searched recursively
//! for files with an allowed extension.

use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI arguments for the PM:INFO telemetry processor
///
/// Extracts battery current, voltage, temperature and charge state from
/// device logs carrying `PM:INFO` lines.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pminfo-processor",
    version,
    about = "Extract battery telemetry time series from PM:INFO device logs",
    long_about = "Reads device log files, picks out the PM:INFO power-management lines in either \
                  the key-value or the positional dialect, and produces a time series of current, \
                  voltage, temperature and charge state together with summary statistics."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Parse log files and report the series with summary statistics
    Analyze(AnalyzeArgs),
    /// Check log files and count telemetry lines without extracting records
    Validate(ValidateArgs),
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Human,
    /// JSON report for the chart front end and scripting
    Json,
}

/// Arguments for the analyze command
#[derive(Debug, Clone, Parser)]
pub struct AnalyzeArgs {
    /// Log files or directories to analyze
    #[arg(value_name = "PATHS", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(
        short = 'o',
        long = "output",
        value_name = "FILE",
        help = "Write the report to a file instead of stdout"
    )]
    pub output_file: Option<PathBuf>,

    /// Configuration file
    ///
    /// Defaults to pminfo-processor.toml in the working directory when present.
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Number of files analyzed concurrently (overrides the config file)
    #[arg(short = 'j', long = "jobs", value_name = "N")]
    pub jobs: Option<usize>,

    /// Lines scanned for the marker before a full parse, 0 disables (overrides the config file)
    #[arg(long = "prescan-lines", value_name = "N")]
    pub prescan_lines: Option<usize>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose: u8,

    /// Only log errors and hide the progress bar
    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Arguments for the validate command
#[derive(Debug, Clone, Parser)]
pub struct ValidateArgs {
    /// Log files or directories to check
    #[arg(value_name = "PATHS", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Lines scanned for the marker before classification, 0 disables
    #[arg(long = "prescan-lines", value_name = "N")]
    pub prescan_lines: Option<usize>,

    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v info, -vv debug, -vvv trace)"
    )]
    pub verbose: u8,

    #[arg(short = 'q', long = "quiet", conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Map quiet/verbose flags to a tracing level name
fn log_level(quiet: bool, verbose: u8) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

impl AnalyzeArgs {
    /// Validate argument consistency before any file is read
    pub fn validate(&self) -> Result<()> {
        if self.jobs == Some(0) {
            return Err(Error::configuration(
                "Number of jobs must be greater than 0",
            ));
        }

        if let Some(output_file) = &self.output_file {
            if let Some(parent) = output_file.parent() {
                if !parent.as_os_str().is_empty() && !parent.is_dir() {
                    return Err(Error::configuration(format!(
                        "Output directory does not exist: {}",
                        parent.display()
                    )));
                }
            }
        }

        Ok(())
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level(self.quiet, self.verbose)
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl ValidateArgs {
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.quiet, self.verbose)
    }
}

impl Args {
    /// Whether a subcommand was given
    pub fn has_command(&self) -> bool {
        self.command.is_some()
    }
}
