//! PM:INFO log parser for battery telemetry
//!
//! This module turns a complete device log into an ordered telemetry series.
//! Lines are handled independently, so every stage below except the
//! assembler is a pure function over a single line.
//!
//! ## Architecture
//!
//! The parser is organized into logical components:
//! - [`patterns`] - Compiled token patterns shared by all stages
//! - [`classifier`] - Marker detection and payload dialect classification
//! - [`time_parsers`] - Time-of-day extraction with line-number fallback
//! - [`extractor`] - Never-fail channel extraction for both dialects
//! - [`parser`] - Series assembly with a bounded fault budget
//! - [`stats`] - Parsing statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use pminfo_processor::app::services::pm_info_parser::PmInfoParser;
//!
//! # fn example() -> pminfo_processor::Result<()> {
//! let log = "boot ok\nPM:INFO curr=150 volt=4200 temp=25 charge=0\n";
//! let result = PmInfoParser::new().parse_str(log)?;
//!
//! assert_eq!(result.series.len(), 1);
//! assert_eq!(result.series.voltage(), &[4.2]);
//! # Ok(())
//! # }
//! ```

pub mod classifier;
pub mod extractor;
pub mod parser;
pub mod patterns;
pub mod stats;
pub mod time_parsers;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use classifier::{classify, classify_line, contains_marker};
pub use extractor::{Extraction, ExtractionOutcome, extract};
pub use parser::{PmInfoParser, parse};
pub use stats::{ParseResult, ParseStats};
