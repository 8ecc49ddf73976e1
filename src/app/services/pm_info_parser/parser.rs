//! Series assembly for PM:INFO log files
//!
//! This module drives classification and extraction over a whole file,
//! enforces the per-file fault budget and validates the assembled series.

use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, error, info, warn};

use super::classifier::{classify_payload, locate_payload};
use super::extractor::{Extraction, extract};
use super::stats::{ParseResult, ParseStats};
use crate::app::models::{Encoding, Series};
use crate::constants::MAX_PARSE_ERRORS;
use crate::{Error, Result};

/// PM:INFO log parser
///
/// Holds no per-file state; one instance can parse any number of files,
/// including from several threads at once.
#[derive(Debug, Clone)]
pub struct PmInfoParser {
    max_parse_errors: usize,
}

impl Default for PmInfoParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse complete log text with the default parser
pub fn parse(text: &str) -> Result<ParseResult> {
    PmInfoParser::new().parse_str(text)
}

impl PmInfoParser {
    /// Create a parser with the standard fault budget
    pub fn new() -> Self {
        Self {
            max_parse_errors: MAX_PARSE_ERRORS,
        }
    }

    /// Override the number of counted faults tolerated before stopping
    pub fn with_max_parse_errors(mut self, max_parse_errors: usize) -> Self {
        self.max_parse_errors = max_parse_errors;
        self
    }

    /// Read and parse a log file
    pub fn parse_file(&self, file_path: &Path) -> Result<ParseResult> {
        info!("Parsing PM:INFO log file: {}", file_path.display());

        let bytes = std::fs::read(file_path).map_err(|e| {
            Error::io(format!("Failed to read file {}", file_path.display()), e)
        })?;

        self.parse_bytes(&bytes)
    }

    /// Parse raw file content, replacing invalid UTF-8 sequences
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<ParseResult> {
        let text = String::from_utf8_lossy(bytes);
        if matches!(text, Cow::Owned(_)) {
            debug!("Input contained invalid UTF-8; undecodable bytes were replaced");
        }

        self.parse_str(&text)
    }

    /// Classify every line without extracting, for quick file validation
    pub fn scan_bytes(&self, bytes: &[u8]) -> ParseStats {
        let text = String::from_utf8_lossy(bytes);
        let lines: Vec<&str> = text.lines().collect();

        let mut stats = ParseStats::new();
        stats.total_lines = lines.len();
        self.classify_lines(&lines, &mut stats);
        stats
    }

    /// Parse complete log text into a series
    pub fn parse_str(&self, text: &str) -> Result<ParseResult> {
        let mut stats = ParseStats::new();
        let lines: Vec<&str> = text.lines().collect();
        stats.total_lines = lines.len();
        debug!("Read {} lines", stats.total_lines);

        let candidates = self.classify_lines(&lines, &mut stats);
        if candidates.is_empty() {
            let message = if stats.marker_lines == 0 {
                "no line contains the PM:INFO marker".to_string()
            } else {
                format!(
                    "{} marker lines found but none has enough telemetry fields",
                    stats.marker_lines
                )
            };
            error!("No valid PM:INFO data lines: {}", message);
            return Err(Error::no_marker_found(message));
        }

        info!("Found {} valid PM:INFO data lines", candidates.len());

        let series = self.assemble_series(&lines, &candidates, &mut stats);
        if series.is_empty() {
            error!(
                "None of {} candidate lines produced a record",
                stats.candidate_lines
            );
            return Err(Error::empty_result(stats.candidate_lines));
        }

        info!(
            "Parsed {} records from {} candidate lines",
            stats.records_parsed, stats.candidate_lines
        );
        if stats.parse_errors > 0 {
            warn!("Skipped {} lines with errors", stats.parse_errors);
        }
        if stats.degraded_records() > 0 {
            debug!(
                "{} padded and {} zero-fallback records",
                stats.padded_records, stats.fallback_records
            );
        }

        Ok(ParseResult { series, stats })
    }

    /// First pass: indices of lines that classify as telemetry
    fn classify_lines(&self, lines: &[&str], stats: &mut ParseStats) -> Vec<usize> {
        let mut candidates = Vec::new();

        for (index, line) in lines.iter().enumerate() {
            let Some(payload) = locate_payload(line) else {
                continue;
            };
            stats.marker_lines += 1;

            match classify_payload(payload) {
                Some(Encoding::KeyValue) => stats.key_value_lines += 1,
                Some(Encoding::Positional) => stats.positional_lines += 1,
                None => {
                    debug!("Line {}: marker present but too few fields", index + 1);
                    continue;
                }
            }
            candidates.push(index);
        }

        stats.candidate_lines = candidates.len();
        candidates
    }

    /// Second pass: extract candidates in line order
    fn assemble_series(
        &self,
        lines: &[&str],
        candidates: &[usize],
        stats: &mut ParseStats,
    ) -> Series {
        let mut series = Series::with_capacity(candidates.len());

        for &index in candidates {
            let line_number = index + 1;

            match self.process_line(lines[index], line_number) {
                Ok(extraction) => {
                    if extraction.is_padded() {
                        stats.padded_records += 1;
                    }
                    if extraction.is_fallback() {
                        stats.fallback_records += 1;
                    }
                    if extraction.charge_state_clamped {
                        stats.clamped_charge_states += 1;
                    }
                    if extraction.time_source.is_synthetic() {
                        stats.synthetic_times += 1;
                    }

                    series.push(extraction.record);
                    stats.records_parsed += 1;
                }
                Err(e) => {
                    stats.parse_errors += 1;
                    stats.errors.push(format!("Line {}: {}", line_number, e));
                    warn!("Error processing line {}: {}", line_number, e);

                    if stats.parse_errors > self.max_parse_errors {
                        warn!(
                            "Too many parse errors ({}), stopping at line {}",
                            stats.parse_errors, line_number
                        );
                        stats.truncated = true;
                        break;
                    }
                }
            }
        }

        series
    }

    /// Extract one line and check the record before it is accepted
    fn process_line(&self, line: &str, line_number: usize) -> Result<Extraction> {
        let extraction = extract(line, line_number);
        extraction.record.validate()?;
        Ok(extraction)
    }
}
