//! Validate command implementation
//!
//! Applies the intake checks and classifies every line without extracting
//! records, so a directory of logs can be triaged quickly.

use super::shared::{
    RunStats, collect_input_files, load_configuration, process_files, resolve_log_level,
    setup_logging,
};
use crate::app::services::intake::Intake;
use crate::app::services::pm_info_parser::ParseStats;
use crate::app::services::report::ErrorReport;
use crate::cli::args::{OutputFormat, ValidateArgs};
use crate::{Error, Result};
use colored::*;
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Classification counts for one file
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ValidationEntry {
    file: String,
    valid: bool,
    total_lines: usize,
    marker_lines: usize,
    key_value_lines: usize,
    positional_lines: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ValidationEntry {
    fn new(path: &Path, outcome: &Result<ParseStats>) -> Self {
        let file = path.display().to_string();
        match outcome {
            Ok(stats) => Self {
                file,
                valid: stats.candidate_lines > 0,
                total_lines: stats.total_lines,
                marker_lines: stats.marker_lines,
                key_value_lines: stats.key_value_lines,
                positional_lines: stats.positional_lines,
                error: None,
            },
            Err(e) => Self {
                file,
                valid: false,
                total_lines: 0,
                marker_lines: 0,
                key_value_lines: 0,
                positional_lines: 0,
                error: Some(e.to_string()),
            },
        }
    }
}

/// Validate command runner
pub async fn run_validate(args: ValidateArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    let config = load_configuration(args.config_file.as_deref(), None, args.prescan_lines)?;
    setup_logging(
        resolve_log_level(args.quiet, args.verbose, args.get_log_level(), &config),
        args.quiet,
    );
    debug!("Validate arguments: {:?}", args);

    let files = collect_input_files(&args.paths, &config.intake)?;
    info!("Validating {} files", files.len());

    let intake = Arc::new(Intake::new(config.intake.clone()));
    let results = process_files(
        files,
        config.performance.max_concurrent_files,
        None,
        move |path| intake.scan_file(path),
    )
    .await;

    let mut stats = RunStats {
        files_processed: results.len(),
        ..RunStats::default()
    };
    let mut entries = Vec::with_capacity(results.len());
    for (path, outcome) in &results {
        match outcome {
            Ok(scan) if scan.candidate_lines > 0 => stats.files_succeeded += 1,
            Ok(_) => stats.record_failure(
                ErrorReport::from_error(&Error::no_marker_found(
                    "marker present but no line has enough telemetry fields",
                ))
                .class(),
            ),
            Err(e) => stats.record_failure(ErrorReport::from_error(e).class()),
        }
        entries.push(ValidationEntry::new(path, outcome));
    }

    match args.format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&entries)
                .map_err(|e| Error::serialization("Failed to serialize validation report", e))?;
            println!("{}", json);
        }
        OutputFormat::Human => print_human(&entries),
    }

    stats.processing_time = start_time.elapsed();
    info!(
        "Validation completed in {:.2}s: {} of {} files contain telemetry",
        stats.processing_time.as_secs_f64(),
        stats.files_succeeded,
        stats.files_processed
    );

    Ok(stats)
}

fn print_human(entries: &[ValidationEntry]) {
    println!("\n{}", "PM:INFO log validation".bold());

    for entry in entries {
        match &entry.error {
            None if entry.valid => println!(
                "  {} {} ({} lines, {} marker, {} key-value, {} positional)",
                "✓".bright_green(),
                entry.file,
                entry.total_lines,
                entry.marker_lines,
                entry.key_value_lines,
                entry.positional_lines
            ),
            None => println!(
                "  {} {} ({} marker lines, none with enough fields)",
                "✗".bright_red(),
                entry.file,
                entry.marker_lines
            ),
            Some(error) => println!("  {} {}: {}", "✗".bright_red(), entry.file, error.red()),
        }
    }

    let valid = entries.iter().filter(|entry| entry.valid).count();
    println!(
        "\n{} {} of {} files contain PM:INFO telemetry",
        "Summary:".bright_cyan(),
        valid,
        entries.len()
    );
}
