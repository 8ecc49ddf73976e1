//! Command implementations for the PM:INFO processor CLI
//!
//! Each subcommand lives in its own module; helpers shared between them are
//! in `shared`.

pub mod analyze;
pub mod shared;
pub mod validate;

pub use shared::RunStats;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Dispatch to the subcommand handler
///
/// - `analyze`: full parse with JSON or human-readable report
/// - `validate`: intake checks and line classification only
pub async fn run(args: Args) -> Result<RunStats> {
    match args.command {
        Some(Commands::Analyze(analyze_args)) => analyze::run_analyze(analyze_args).await,
        Some(Commands::Validate(validate_args)) => validate::run_validate(validate_args).await,
        None => Err(Error::configuration("No command given")),
    }
}
