//! Parsing statistics and result structures for PM:INFO processing
//!
//! This module provides types for tracking how many lines were eligible,
//! how many were read completely or in degraded form, and the assembled
//! series handed to downstream consumers.

use crate::app::models::Series;

/// Parsing result with the series and basic statistics
#[derive(Debug, Clone)]
pub struct ParseResult {
    /// Accepted records in source line order
    pub series: Series,

    /// Parsing statistics
    pub stats: ParseStats,
}

/// Parsing statistics for one log file
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParseStats {
    /// Total number of lines in the input
    pub total_lines: usize,

    /// Lines containing the telemetry marker
    pub marker_lines: usize,

    /// Lines that classified as telemetry records
    pub candidate_lines: usize,

    /// Candidate lines in the key-value dialect
    pub key_value_lines: usize,

    /// Candidate lines in the positional dialect
    pub positional_lines: usize,

    /// Records appended to the series
    pub records_parsed: usize,

    /// Positional records padded with zeros
    pub padded_records: usize,

    /// Records replaced by the zero fallback during extraction
    pub fallback_records: usize,

    /// Records whose charge state was clamped to 0
    pub clamped_charge_states: usize,

    /// Records whose time was synthesized from the line number
    pub synthetic_times: usize,

    /// Per-line faults counted by the assembler
    pub parse_errors: usize,

    /// Processing stopped early after too many faults
    pub truncated: bool,

    /// Fault messages for debugging
    pub errors: Vec<String>,
}

impl ParseStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate lines that did not end up in the series
    pub fn lines_skipped(&self) -> usize {
        self.candidate_lines.saturating_sub(self.records_parsed)
    }

    /// Records read with a degraded path (padding or zero fallback)
    pub fn degraded_records(&self) -> usize {
        self.padded_records + self.fallback_records
    }

    /// Calculate success rate as a percentage of candidate lines
    pub fn success_rate(&self) -> f64 {
        if self.candidate_lines == 0 {
            0.0
        } else {
            (self.records_parsed as f64 / self.candidate_lines as f64) * 100.0
        }
    }
}
