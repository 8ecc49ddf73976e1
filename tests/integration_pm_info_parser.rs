//! End-to-end tests for PM:INFO log analysis
//!
//! These tests write realistic device logs to temporary files and run them
//! through intake, the parser, the summary and the JSON report, and through
//! the `analyze` command itself.

use pminfo_processor::app::services::intake::Intake;
use pminfo_processor::app::services::report::{ErrorReport, FailureClass};
use pminfo_processor::cli::args::{AnalyzeArgs, OutputFormat};
use pminfo_processor::cli::commands::analyze::run_analyze;
use pminfo_processor::config::IntakeConfig;
use pminfo_processor::{ChargeState, Error};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Mixed-dialect log as it comes off a device
const DEVICE_LOG: &str = "\
01-01 00:00:00.000 I/boot: starting services
PM:INFO curr=150 volt=4200 temp=25 charge=0
10:15:30 battery PM:INFO curr=-320 volt=3.7 temp=31 charge=3
[    5.303] I>5.303 PM:INFO 83214 85 43090 -29781 26 2 0 -17187
12/31 23:59:59 pm:info 85 85 41235 85 27 5000 9 850
PM:INFO status ok
I>12.000000 PM:INFO 90 90 40100 90 28
";

fn write_log(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn analyze_args(paths: Vec<PathBuf>, output: &Path) -> AnalyzeArgs {
    AnalyzeArgs {
        paths,
        format: OutputFormat::Json,
        output_file: Some(output.to_path_buf()),
        config_file: None,
        jobs: Some(2),
        prescan_lines: None,
        verbose: 0,
        quiet: true,
    }
}

/// Purpose: Validate the full pipeline on a mixed-dialect log
/// Benefit: Covers classification, scaling, clamping, padding and time extraction together
#[test]
fn test_analyze_device_log() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_log(temp_dir.path(), "device.log", DEVICE_LOG);

    let analysis = Intake::new(IntakeConfig::default())
        .analyze_file(&path)
        .unwrap();
    let series = &analysis.series;

    assert_eq!(series.len(), 5);
    assert_eq!(
        series.time(),
        &["00:00:02", "10:15:30", "00:00:05", "23:59:59", "00:00:12"]
    );
    assert_eq!(series.current(), &[150.0, -320.0, -17187.0, 850.0, 0.0]);
    assert_eq!(series.temperature(), &[25.0, 31.0, 26.0, 27.0, 28.0]);
    assert!((series.voltage()[0] - 4.2).abs() < 1e-12);
    assert!((series.voltage()[1] - 3.7).abs() < 1e-12);
    assert!((series.voltage()[2] - 4.309).abs() < 1e-12);
    assert_eq!(series.charge_state(), &[0, 3, 0, 0, 0]);

    let stats = &analysis.stats;
    assert_eq!(stats.total_lines, 7);
    assert_eq!(stats.marker_lines, 6);
    assert_eq!(stats.key_value_lines, 2);
    assert_eq!(stats.positional_lines, 3);
    assert_eq!(stats.padded_records, 1);
    assert_eq!(stats.clamped_charge_states, 1);
    assert_eq!(stats.parse_errors, 0);
    assert!(!stats.truncated);

    let summary = &analysis.summary;
    assert_eq!(summary.total_points, 5);
    assert_eq!(summary.count(ChargeState::NoCharge), 4);
    assert_eq!(summary.count(ChargeState::ConstantCurrent), 1);
    assert_eq!(summary.max_current, 850.0);
    assert_eq!(summary.min_current, -17187.0);
}

/// Purpose: Check the JSON contract consumed by the chart front end
#[test]
fn test_report_json_contract() {
    let analysis = Intake::new(IntakeConfig::default())
        .analyze_bytes("device.txt", DEVICE_LOG.as_bytes())
        .unwrap();

    let json = analysis.into_report().to_json().unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    for column in ["time", "current", "temperature", "voltage", "chargeState"] {
        assert_eq!(value["data"][column].as_array().unwrap().len(), 5, "{}", column);
    }
    for key in [
        "totalPoints",
        "avgCurrent",
        "maxCurrent",
        "minCurrent",
        "avgTemp",
        "maxTemp",
        "minTemp",
        "avgVoltage",
        "chargeStateCounts",
    ] {
        assert!(value["stats"].get(key).is_some(), "missing {}", key);
    }
    assert_eq!(value["stats"]["chargeStateCounts"]["cc_charge"], 1);
}

/// Purpose: Ensure each rejection reaches the caller as a classified error report
#[test]
fn test_rejections_are_client_errors() {
    let temp_dir = TempDir::new().unwrap();
    let intake = Intake::new(IntakeConfig::default());

    let cases = [
        write_log(temp_dir.path(), "device.csv", DEVICE_LOG),
        write_log(temp_dir.path(), "empty.log", ""),
        write_log(temp_dir.path(), "kernel.log", "just kernel noise\n"),
        write_log(temp_dir.path(), "status.log", "PM:INFO status ok\n"),
    ];

    for path in &cases {
        let error = intake.analyze_file(path).unwrap_err();
        let report = ErrorReport::from_error(&error);

        assert!(error.is_validation(), "{}: {}", path.display(), error);
        assert_eq!(report.class(), FailureClass::ClientError);
        assert!(report.error.starts_with("Data validation error:"));
    }
}

/// Purpose: Verify the fault budget across a whole file
#[test]
fn test_truncation_on_overflowing_values() {
    let overflow = "9".repeat(400);
    let mut log = String::from("PM:INFO curr=1 volt=4000 temp=20 charge=1\n");
    for _ in 0..11 {
        log.push_str(&format!("PM:INFO curr=1 volt={} temp=20 charge=1\n", overflow));
    }
    log.push_str("PM:INFO curr=2 volt=4000 temp=20 charge=1\n");

    let analysis = Intake::new(IntakeConfig::default())
        .analyze_bytes("device.log", log.as_bytes())
        .unwrap();

    assert!(analysis.stats.truncated);
    assert_eq!(analysis.stats.parse_errors, 11);
    assert_eq!(analysis.series.current(), &[1.0]);
}

/// Purpose: Run the analyze command over a directory and a missing file
/// Benefit: Exercises discovery, concurrent analysis, ordering and the exit class
#[tokio::test]
async fn test_analyze_command_multiple_files() {
    let temp_dir = TempDir::new().unwrap();
    let logs = temp_dir.path().join("logs");
    std::fs::create_dir(&logs).unwrap();
    write_log(&logs, "a.log", DEVICE_LOG);
    write_log(&logs, "b.txt", "PM:INFO 85 85 41235 85 25 5000 3 850\n");
    write_log(&logs, "notes.md", "PM:INFO curr=1 volt=2 temp=3\n");

    let missing = temp_dir.path().join("missing.log");
    let output = temp_dir.path().join("report.json");

    let stats = run_analyze(analyze_args(vec![logs.clone(), missing.clone()], &output))
        .await
        .unwrap();

    assert_eq!(stats.files_processed, 3);
    assert_eq!(stats.files_succeeded, 2);
    assert_eq!(stats.records_parsed, 6);
    assert_eq!(stats.exit_code(), 2);

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    let entries = value.as_array().unwrap();

    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0]["file"], logs.join("a.log").display().to_string());
    assert_eq!(entries[0]["stats"]["totalPoints"], 5);
    assert_eq!(entries[1]["stats"]["chargeStateCounts"]["cc_charge"], 1);
    assert_eq!(entries[2]["file"], missing.display().to_string());
    assert!(entries[2].get("error").is_some());
}

/// Purpose: A single file produces the bare `{data, stats}` object
#[tokio::test]
async fn test_analyze_command_single_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_log(temp_dir.path(), "device.log", DEVICE_LOG);
    let output = temp_dir.path().join("report.json");

    let stats = run_analyze(analyze_args(vec![path], &output)).await.unwrap();
    assert_eq!(stats.exit_code(), 0);

    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(value["data"]["time"][0], "00:00:02");
    assert_eq!(value["stats"]["totalPoints"], 5);
}

#[tokio::test]
async fn test_analyze_command_rejects_empty_directory() {
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("report.json");

    let result = run_analyze(analyze_args(vec![temp_dir.path().to_path_buf()], &output)).await;
    assert!(matches!(result, Err(Error::Configuration { .. })));
}
