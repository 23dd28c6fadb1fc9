//! CLI integration tests

use std::process::Command;

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "mfp-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Machine Failure Predictor"),
        "Should show app name"
    );
    assert!(stdout.contains("predict"), "Should show predict command");
    assert!(stdout.contains("status"), "Should show status command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = Command::new("cargo")
        .args(["run", "-p", "mfp-cli", "--", "--version"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("mfp"), "Should show binary name");
}

/// Test predict subcommand help
#[test]
fn test_predict_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "mfp-cli", "--", "predict", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Predict help should succeed");
    assert!(
        stdout.contains("--air-temperature"),
        "Should show air temperature option"
    );
    assert!(
        stdout.contains("--process-temperature"),
        "Should show process temperature option"
    );
    assert!(
        stdout.contains("--rotational-speed"),
        "Should show rotational speed option"
    );
    assert!(stdout.contains("--torque"), "Should show torque option");
    assert!(
        stdout.contains("--tool-wear"),
        "Should show tool wear option"
    );
    assert!(stdout.contains("--quality"), "Should show quality option");
}

/// Test status subcommand help
#[test]
fn test_status_help() {
    let output = Command::new("cargo")
        .args(["run", "-p", "mfp-cli", "--", "status", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "Status help should succeed");
}

/// Test format option
#[test]
fn test_format_option() {
    let output = Command::new("cargo")
        .args(["run", "-p", "mfp-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--format"), "Should show format option");
    assert!(stdout.contains("table"), "Should show table format");
    assert!(stdout.contains("json"), "Should show json format");
}

/// Test api-url option
#[test]
fn test_api_url_option() {
    let output = Command::new("cargo")
        .args(["run", "-p", "mfp-cli", "--", "--help"])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("--api-url"), "Should show api-url option");
    assert!(stdout.contains("MFP_API_URL"), "Should show env var");
}

/// Test quality grade accepts only known grades
#[test]
fn test_invalid_quality_grade() {
    let output = Command::new("cargo")
        .args([
            "run",
            "-p",
            "mfp-cli",
            "--",
            "predict",
            "--quality",
            "X",
        ])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Unknown grade should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid value") || stderr.contains("possible values"),
        "Should list the accepted grades"
    );
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = Command::new("cargo")
        .args(["run", "-p", "mfp-cli", "--", "invalid-command"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}
