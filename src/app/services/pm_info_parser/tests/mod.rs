//! Test utilities for PM:INFO parser testing
//!
//! This module provides sample log content and helper functions used across
//! the parser test modules.

use std::io::Write;
use tempfile::NamedTempFile;


/// Line whose voltage overflows to infinity, rejected at record validation
pub fn overflowing_line() -> String {
    format!("PM:INFO curr=1 volt={} temp=25 charge=0", "9".repeat(400))
}

/// Helper to create a mixed-dialect device log
pub fn create_test_log() -> String {
    r#"[    0.000000] Booting Linux on physical CPU 0x0
10/12 18:06:15 PM:INFO curr=150 volt=4200 temp=25 charge=3
I>5.303 PM:INFO 83214 85 43090 -29781 26 2 0 -17187
kernel: usb 1-1: new high-speed USB device
I>6.512 pm:info 83100 85 43010 -29700 27 2 1 -16000
PM:INFO status ok
10/12 18:06:20 PM:INFO curr=-20 volt=3.7 temp=31 charge=9"#
        .to_string()
}

/// Helper to create a log without any telemetry
pub fn create_log_without_marker() -> String {
    r#"[    0.000000] Booting Linux on physical CPU 0x0
kernel: usb 1-1: new high-speed USB device
charger: curr=150 volt=4200 temp=25 charge=0"#
        .to_string()
}

/// Helper to create a temporary file with given content
pub fn create_temp_file(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "{}", content).unwrap();
    temp_file
}
