//! Analyze command implementation
//!
//! Runs intake and the parser over every input file, then renders either a
//! human-readable summary or the JSON report consumed by the chart front end.

use super::shared::{
    RunStats, collect_input_files, create_progress_bar, load_configuration, process_files,
    resolve_log_level, setup_logging, write_output,
};
use crate::app::models::ChargeState;
use crate::app::services::intake::{FileAnalysis, Intake};
use crate::app::services::report::{AnalysisReport, ErrorReport};
use crate::cli::args::{AnalyzeArgs, OutputFormat};
use crate::{Error, Result};
use colored::*;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// One entry of a multi-file JSON report
#[derive(Debug, Serialize)]
struct FileReport {
    file: String,
    #[serde(flatten)]
    outcome: FileOutcome,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum FileOutcome {
    Analysis(AnalysisReport),
    Failure(ErrorReport),
}

/// Analyze command runner
pub async fn run_analyze(args: AnalyzeArgs) -> Result<RunStats> {
    let start_time = Instant::now();

    args.validate()?;
    let config = load_configuration(args.config_file.as_deref(), args.jobs, args.prescan_lines)?;
    setup_logging(
        resolve_log_level(args.quiet, args.verbose, args.get_log_level(), &config),
        args.quiet,
    );
    debug!("Analyze arguments: {:?}", args);

    let files = collect_input_files(&args.paths, &config.intake)?;
    info!(
        "Analyzing {} files with up to {} at a time",
        files.len(),
        config.performance.max_concurrent_files
    );

    let progress_bar = (args.show_progress() && files.len() > 1)
        .then(|| create_progress_bar(files.len() as u64, "Analyzing logs"));

    let intake = Arc::new(Intake::new(config.intake.clone()));
    let results = process_files(
        files,
        config.performance.max_concurrent_files,
        progress_bar.as_ref(),
        move |path| intake.analyze_file(path),
    )
    .await;

    if let Some(pb) = &progress_bar {
        pb.finish_and_clear();
    }

    let mut stats = RunStats {
        files_processed: results.len(),
        ..RunStats::default()
    };
    for (path, outcome) in &results {
        match outcome {
            Ok(analysis) => {
                stats.files_succeeded += 1;
                stats.records_parsed += analysis.series.len();
            }
            Err(e) => {
                warn!("Failed to analyze {}: {}", path.display(), e);
                stats.record_failure(ErrorReport::from_error(e).class());
            }
        }
    }

    if args.output_file.is_some() {
        colored::control::set_override(false);
    }
    let rendered = match args.format {
        OutputFormat::Json => render_json(results)?,
        OutputFormat::Human => render_human(&results),
    };
    write_output(args.output_file.as_deref(), &rendered)?;

    stats.processing_time = start_time.elapsed();
    info!(
        "Analysis completed in {:.2}s: {} of {} files succeeded, {} records",
        stats.processing_time.as_secs_f64(),
        stats.files_succeeded,
        stats.files_processed,
        stats.records_parsed
    );

    Ok(stats)
}

/// Single file: the bare `{data, stats}` or `{error, details}` object.
/// Several files: an array of those objects tagged with the file path.
fn render_json(results: Vec<(PathBuf, Result<FileAnalysis>)>) -> Result<String> {
    let single = results.len() == 1;
    let reports: Vec<FileReport> = results
        .into_iter()
        .map(|(path, outcome)| FileReport {
            file: path.display().to_string(),
            outcome: match outcome {
                Ok(analysis) => FileOutcome::Analysis(analysis.into_report()),
                Err(e) => FileOutcome::Failure(ErrorReport::from_error(&e)),
            },
        })
        .collect();

    let serialized = if single {
        serde_json::to_string_pretty(&reports[0].outcome)
    } else {
        serde_json::to_string_pretty(&reports)
    };

    serialized.map_err(|e| Error::serialization("Failed to serialize analysis report", e))
}

fn render_human(results: &[(PathBuf, Result<FileAnalysis>)]) -> String {
    let mut lines = vec![format!(
        "{} {}",
        "PM:INFO telemetry report".bold(),
        format!("(generated {})", chrono::Local::now().format("%Y-%m-%d %H:%M:%S")).dimmed()
    )];

    for (path, outcome) in results {
        lines.push(String::new());
        match outcome {
            Ok(analysis) => lines.extend(analysis_lines(analysis)),
            Err(e) => {
                let report = ErrorReport::from_error(e);
                lines.push(format!("{} {}", "✗".bright_red(), path.display()));
                lines.push(format!("  {}", report.error.red()));
                lines.push(format!("  {}", report.details.dimmed()));
            }
        }
    }

    lines.join("\n")
}

fn analysis_lines(analysis: &FileAnalysis) -> Vec<String> {
    let summary = &analysis.summary;
    let stats = &analysis.stats;

    let mut lines = vec![
        format!("{} {}", "✓".bright_green(), analysis.source.display()),
        format!(
            "  {} {} from {} lines ({} key-value, {} positional, {} skipped, {:.1}% accepted)",
            "Records:".bright_cyan(),
            summary.total_points,
            stats.total_lines,
            stats.key_value_lines,
            stats.positional_lines,
            stats.lines_skipped(),
            stats.success_rate()
        ),
        format!(
            "  {} avg {:.1} µA, min {:.1} µA, max {:.1} µA",
            "Current:".bright_cyan(),
            summary.avg_current,
            summary.min_current,
            summary.max_current
        ),
        format!("  {} avg {:.3} V", "Voltage:".bright_cyan(), summary.avg_voltage),
        format!(
            "  {} avg {:.1} °C, min {:.1} °C, max {:.1} °C",
            "Temperature:".bright_cyan(),
            summary.avg_temp,
            summary.min_temp,
            summary.max_temp
        ),
        format!("  {}", "Charge states:".bright_cyan()),
    ];

    lines.extend(
        ChargeState::ALL
            .into_iter()
            .map(|state| (state, summary.count(state)))
            .filter(|(_, count)| *count > 0)
            .map(|(state, count)| format!("    {:<12} {}", state.key(), count)),
    );

    if stats.degraded_records() > 0 || stats.synthetic_times > 0 {
        lines.push(format!(
            "  {} {} padded, {} fallback, {} clamped charge states, {} synthetic times",
            "Degraded:".yellow(),
            stats.padded_records,
            stats.fallback_records,
            stats.clamped_charge_states,
            stats.synthetic_times
        ));
    }

    if stats.parse_errors > 0 {
        lines.push(format!(
            "  {} {} rejected lines{}",
            "Errors:".yellow(),
            stats.parse_errors,
            if stats.truncated {
                ", series truncated"
            } else {
                ""
            }
        ));
    }

    lines
}
