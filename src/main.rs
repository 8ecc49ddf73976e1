use clap::Parser;
use pminfo_processor::cli::{args::Args, commands};
use std::process;

fn main() {
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if !args.has_command() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        let shutdown_signal = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("Failed to install CTRL+C signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        };

        tokio::select! {
            result = commands::run(args) => result,
            _ = shutdown_signal => {
                eprintln!("\nReceived CTRL+C, shutting down...");
                Err(pminfo_processor::Error::processing_interrupted(
                    "Processing interrupted by user",
                ))
            }
        }
    });

    match result {
        // Per-file failures were already reported; the exit code carries their class
        Ok(stats) => process::exit(stats.exit_code()),
        Err(error) => {
            let code = if error.is_validation() { 2 } else { 1 };
            eprintln!("Error: {:#}", anyhow::Error::from(error));
            process::exit(code);
        }
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("PM:INFO Processor - Battery Telemetry Extractor");
    println!("===============================================");
    println!();
    println!("Extract battery current, voltage, temperature and charge state from");
    println!("device logs containing PM:INFO power-management lines.");
    println!();
    println!("USAGE:");
    println!("    pminfo-processor <COMMAND> [OPTIONS] <PATHS>...");
    println!();
    println!("COMMANDS:");
    println!("    analyze     Parse logs and report the time series with summary statistics");
    println!("    validate    Check logs and count telemetry lines without extracting");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("EXAMPLES:");
    println!("    # Summarize one log:");
    println!("    pminfo-processor analyze device.log");
    println!();
    println!("    # JSON report for the chart front end:");
    println!("    pminfo-processor analyze device.log --format json --output report.json");
    println!();
    println!("    # Triage a directory of logs:");
    println!("    pminfo-processor validate logs/");
    println!();
    println!("For detailed help on any command, use:");
    println!("    pminfo-processor <COMMAND> --help");
}
