use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn mldebug() -> Command {
    let mut cmd = Command::cargo_bin("mldebug").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_diagnose_from_pairs() {
    mldebug()
        .args(["diagnose", "-m", "train_accuracy=95", "-m", "test_accuracy=68"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "• OVERFITTING DETECTED: Train accuracy (95%) significantly higher than test accuracy (68%)",
        ))
        .stdout(predicate::str::contains("Issues found: 1"));
}

#[test]
fn test_json_output() {
    let output = mldebug()
        .args(["--format", "json", "diagnose", "-m", "dataset_size=500", "-m", "batch_size=8"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["issues_found"], 1);
    assert_eq!(
        value["diagnoses"][0],
        "SMALL DATASET WARNING: Only 500 samples may not be sufficient"
    );
}

#[test]
fn test_input_file_and_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metrics.json");
    fs::write(&path, r#"{"train_accuracy": 65, "test_accuracy": 63, "batch_size": null}"#).unwrap();

    mldebug()
        .args(["diagnose", "--input"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("UNDERFITTING DETECTED"));

    mldebug()
        .args(["diagnose", "--input", "-"])
        .write_stdin(r#"{"train_accuracy": 92, "test_accuracy": 88}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("GOOD MODEL"));
}

#[test]
fn test_extract_from_reply_text() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reply.txt");
    fs::write(
        &path,
        "```json\n{\"loss_oscillation\": \"high\", \"dataset_size\": null}\n```\n",
    )
    .unwrap();

    mldebug()
        .args(["diagnose", "--extract"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("LEARNING RATE TOO HIGH"));
}

#[test]
fn test_no_issues_is_not_an_error() {
    mldebug()
        .args(["diagnose", "-m", "dataset_size=5000", "-m", "batch_size=64"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No issues detected"));
}

#[test]
fn test_validation_failure() {
    mldebug()
        .args(["diagnose", "-m", "train_accuracy=150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("train_accuracy"));
}

#[test]
fn test_no_metrics() {
    mldebug()
        .current_dir(tempfile::tempdir().unwrap().path())
        .arg("diagnose")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No metrics provided"));
}

#[test]
fn test_config_defaults_and_format() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("mldebug.yml"),
        "output: json\nlog_level: warn\nmetrics:\n  dataset_size: 5000\n",
    )
    .unwrap();

    let output = mldebug()
        .current_dir(dir.path())
        .args(["diagnose", "-m", "batch_size=8"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        value["diagnoses"][0],
        "BATCH SIZE TOO SMALL: Batch size of 8 may cause noisy gradients"
    );
}

#[test]
fn test_interactive_mode() {
    mldebug()
        .current_dir(tempfile::tempdir().unwrap().path())
        .arg("interactive")
        .write_stdin("92\n88\n5000\n64\n\n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("GOOD MODEL"));
}

#[test]
fn test_rules_listing() {
    mldebug()
        .arg("rules")
        .assert()
        .success()
        .stdout(predicate::str::contains("1. overfitting"))
        .stdout(predicate::str::contains("7. good_performance"));
}

#[test]
fn test_interactive_json_stdout_is_clean() {
    let output = mldebug()
        .current_dir(tempfile::tempdir().unwrap().path())
        .args(["--format", "json", "interactive"])
        .write_stdin("95\n68\n\n\n\n\n")
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["issues_found"], 1);

    let prompts = String::from_utf8(output.stderr).unwrap();
    assert!(prompts.contains("STRUCTURED INPUT MODE"));
    assert!(prompts.contains("Training accuracy (0-100): "));
}

#[test]
fn test_float_accuracies_keep_decimal_point() {
    mldebug()
        .args(["diagnose", "--input", "-"])
        .write_stdin(r#"{"train_accuracy": 95.0, "test_accuracy": 68.0}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Train accuracy (95.0%) significantly higher than test accuracy (68.0%)",
        ));
}

#[test]
fn test_config_with_null_metric() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.yml");
    fs::write(&path, "metrics:\n  batch_size: null\n  dataset_size: 500\n").unwrap();

    mldebug()
        .arg("--config")
        .arg(&path)
        .arg("diagnose")
        .assert()
        .success()
        .stdout(predicate::str::contains("SMALL DATASET WARNING"))
        .stdout(predicate::str::contains("Issues found: 1"));
}

#[test]
fn test_config_path_logged_at_debug() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("mldebug.yml"), "log_level: debug\n").unwrap();

    mldebug()
        .current_dir(dir.path())
        .args(["diagnose", "-m", "dataset_size=5000"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Using config mldebug.yml"));
}
