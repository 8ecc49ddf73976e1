//! File intake checks and single-file analysis
//!
//! Intake applies the cheap file-level rejections (extension, emptiness,
//! size, marker pre-scan) before the parser sees a file, then runs the
//! parser and the summary. The pre-scan only saves work: a file that passes
//! it can still fail the parse with `NoMarkerFound`.

use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::pm_info_parser::classifier::contains_marker;
use super::pm_info_parser::{ParseStats, PmInfoParser};
use super::report::AnalysisReport;
use super::summary::Summary;
use crate::app::models::Series;
use crate::config::IntakeConfig;
use crate::{Error, Result};

/// Outcome of analyzing one file
#[derive(Debug, Clone)]
pub struct FileAnalysis {
    /// Name or path the content came from
    pub source: PathBuf,

    pub series: Series,

    /// Parser statistics, including skipped and degraded lines
    pub stats: ParseStats,

    pub summary: Summary,
}

impl FileAnalysis {
    /// Consume into the `{data, stats}` report
    pub fn into_report(self) -> AnalysisReport {
        AnalysisReport {
            data: self.series,
            stats: self.summary,
        }
    }
}

/// File gatekeeper in front of the parser
#[derive(Debug, Clone)]
pub struct Intake {
    config: IntakeConfig,
    parser: PmInfoParser,
}

impl Intake {
    /// Create an intake with the standard parser
    pub fn new(config: IntakeConfig) -> Self {
        Self {
            config,
            parser: PmInfoParser::new(),
        }
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Reject files by name before reading them
    pub fn check_file_name(&self, file_name: &str) -> Result<()> {
        if file_name.is_empty() {
            return Err(Error::unsupported_file_type("<no file name>"));
        }
        if !self.config.is_allowed_file(file_name) {
            return Err(Error::unsupported_file_type(file_name));
        }
        Ok(())
    }

    /// Reject empty and oversized content
    pub fn check_size(&self, source: &str, size_bytes: u64) -> Result<()> {
        if size_bytes == 0 {
            return Err(Error::empty_file(source));
        }

        let limit = self.config.max_file_size_bytes();
        if size_bytes > limit {
            return Err(Error::file_too_large(source, size_bytes, limit));
        }
        Ok(())
    }

    /// Look for the marker in the first configured lines
    pub fn prescan(&self, bytes: &[u8]) -> Result<()> {
        if self.config.prescan_lines == 0 {
            return Ok(());
        }

        let found = bytes
            .split(|byte| *byte == b'\n')
            .take(self.config.prescan_lines)
            .enumerate()
            .find(|(_, line)| contains_marker(&String::from_utf8_lossy(line)));

        match found {
            Some((index, _)) => {
                debug!("Found PM:INFO marker at line {}", index + 1);
                Ok(())
            }
            None => Err(Error::no_marker_found(format!(
                "no PM:INFO content in the first {} lines",
                self.config.prescan_lines
            ))),
        }
    }

    /// Check and analyze in-memory content, e.g. an uploaded file
    pub fn analyze_bytes(&self, file_name: &str, bytes: &[u8]) -> Result<FileAnalysis> {
        self.check_file_name(file_name)?;
        self.check_size(file_name, bytes.len() as u64)?;
        self.prescan(bytes)?;

        let result = self.parser.parse_bytes(bytes)?;
        let summary = Summary::from_series(&result.series);

        Ok(FileAnalysis {
            source: PathBuf::from(file_name),
            series: result.series,
            stats: result.stats,
            summary,
        })
    }

    /// Check and analyze a file on disk
    pub fn analyze_file(&self, path: &Path) -> Result<FileAnalysis> {
        info!("Analyzing file: {}", path.display());

        let bytes = self.read_checked(path)?;
        let file_name = file_name_of(path);
        let mut analysis = self.analyze_bytes(&file_name, &bytes)?;
        analysis.source = path.to_path_buf();

        info!(
            "Analyzed {}: {} records, {} skipped",
            path.display(),
            analysis.stats.records_parsed,
            analysis.stats.lines_skipped()
        );
        Ok(analysis)
    }

    /// Check a file on disk and classify its lines without extracting
    pub fn scan_file(&self, path: &Path) -> Result<ParseStats> {
        let bytes = self.read_checked(path)?;
        self.prescan(&bytes)?;
        Ok(self.parser.scan_bytes(&bytes))
    }

    /// Name, existence and size checks followed by a full read
    fn read_checked(&self, path: &Path) -> Result<Vec<u8>> {
        self.check_file_name(&file_name_of(path))?;

        if !path.is_file() {
            return Err(Error::file_not_found(path.display().to_string()));
        }

        let metadata = std::fs::metadata(path)
            .map_err(|e| Error::io(format!("Failed to stat {}", path.display()), e))?;
        debug!("File size: {} bytes", metadata.len());
        self.check_size(&path.display().to_string(), metadata.len())?;

        std::fs::read(path).map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
