//! Shared utilities for CLI commands
//!
//! Logging setup, configuration loading, input discovery and the bounded
//! concurrent file runner used by both subcommands.

use crate::app::services::report::FailureClass;
use crate::config::{Config, IntakeConfig};
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task;
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Outcome counters for one command run
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    /// Files handed to the parser
    pub files_processed: usize,
    /// Files that produced a report
    pub files_succeeded: usize,
    /// Files rejected or failed
    pub files_failed: usize,
    /// Records across all successful files
    pub records_parsed: usize,
    /// Most severe failure class seen, if any
    pub failure: Option<FailureClass>,
    pub processing_time: std::time::Duration,
}

impl RunStats {
    /// Record one failure, keeping the most severe class
    pub fn record_failure(&mut self, class: FailureClass) {
        self.files_failed += 1;
        self.failure = match (self.failure, class) {
            (Some(FailureClass::ServerError), _) | (_, FailureClass::ServerError) => {
                Some(FailureClass::ServerError)
            }
            _ => Some(FailureClass::ClientError),
        };
    }

    /// Process exit code for the run
    pub fn exit_code(&self) -> i32 {
        self.failure.map(FailureClass::exit_code).unwrap_or(0)
    }
}

/// Pick the log level: explicit flags win over the configured default
pub fn resolve_log_level<'a>(
    quiet: bool,
    verbose: u8,
    flag_level: &'a str,
    config: &'a Config,
) -> &'a str {
    if quiet || verbose > 0 {
        flag_level
    } else {
        &config.logging.level
    }
}

/// Set up structured logging on stderr
///
/// A subscriber installed earlier in the process is kept.
pub fn setup_logging(log_level: &str, quiet: bool) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pminfo_processor={}", log_level)));

    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    };

    match result {
        Ok(()) => debug!("Logging initialized at level: {}", log_level),
        Err(e) => debug!("Keeping existing logging subscriber: {}", e),
    }
}

/// Load layered configuration and apply command-line overrides
pub fn load_configuration(
    config_file: Option<&Path>,
    jobs: Option<usize>,
    prescan_lines: Option<usize>,
) -> Result<Config> {
    let mut config = Config::load_layered(config_file)?;

    if let Some(jobs) = jobs {
        config = config.with_max_concurrent_files(jobs);
    }
    if let Some(lines) = prescan_lines {
        config = config.with_prescan_lines(lines);
    }

    config.validate()?;
    Ok(config)
}

/// Expand the command-line paths into the list of files to process
///
/// Directories are walked recursively and filtered by the allowed extensions.
/// Plain paths are passed through unchanged so intake can report exactly why
/// a file was rejected.
pub fn collect_input_files(paths: &[PathBuf], intake: &IntakeConfig) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if !path.is_dir() {
            files.push(path.clone());
            continue;
        }

        let before = files.len();
        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                Error::directory_traversal(format!("Failed to walk {}", path.display()), e)
            })?;

            if entry.file_type().is_file()
                && intake.is_allowed_file(&entry.file_name().to_string_lossy())
            {
                files.push(entry.into_path());
            }
        }

        if files.len() == before {
            warn!("No log files found in directory: {}", path.display());
        } else {
            debug!(
                "Found {} log files in {}",
                files.len() - before,
                path.display()
            );
        }
    }

    if files.is_empty() {
        return Err(Error::configuration("No log files found in the given paths"));
    }

    Ok(files)
}

/// Run blocking per-file work with bounded concurrency
///
/// Results come back in input order regardless of completion order.
pub async fn process_files<T, F>(
    files: Vec<PathBuf>,
    max_concurrent: usize,
    progress: Option<&ProgressBar>,
    work: F,
) -> Vec<(PathBuf, Result<T>)>
where
    T: Send + 'static,
    F: Fn(&Path) -> Result<T> + Send + Sync + 'static,
{
    let work = Arc::new(work);
    let mut results = Vec::with_capacity(files.len());

    let mut outcomes = stream::iter(files)
        .map(|path| {
            let work = Arc::clone(&work);
            async move {
                let task_path = path.clone();
                let outcome = task::spawn_blocking(move || work(&task_path))
                    .await
                    .unwrap_or_else(|e| {
                        Err(Error::processing_interrupted(format!(
                            "Worker task failed: {}",
                            e
                        )))
                    });
                (path, outcome)
            }
        })
        .buffered(max_concurrent.max(1));

    while let Some((path, outcome)) = outcomes.next().await {
        if let Some(pb) = progress {
            pb.set_message(path.display().to_string());
            pb.inc(1);
        }
        results.push((path, outcome));
    }

    results
}

/// Create a progress bar with appropriate styling
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
        .map(|style| style.progress_chars("#>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Write command output to a file or stdout
pub fn write_output(output_file: Option<&Path>, content: &str) -> Result<()> {
    match output_file {
        Some(path) => std::fs::write(path, content)
            .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e)),
        None => {
            println!("{}", content);
            Ok(())
        }
    }
}
