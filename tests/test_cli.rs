//! Tests for the `triage` binary

use diabetes_triage::training::MetricsReport;
use std::path::Path;
use std::process::{Command, Output};

fn triage(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_triage"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

#[test]
fn test_train_writes_model_and_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("models").join("model.bin");
    let metrics_path = dir.path().join("out").join("metrics.json");

    let output = triage(
        dir.path(),
        &[
            "train",
            "--out", model_path.to_str().unwrap(),
            "--metrics", metrics_path.to_str().unwrap(),
            "--seed", "42",
            "--version", "v0.1",
        ],
    );

    assert!(
        output.status.success(),
        "train failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(model_path.exists());
    assert!(metrics_path.exists());

    let metrics = MetricsReport::load(&metrics_path).unwrap();
    assert_eq!(metrics.version, "v0.1");
    assert_eq!(metrics.seed, 42);
    assert!(metrics.rmse.is_finite() && metrics.rmse > 0.0);
}

#[test]
fn test_unknown_version_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.bin");
    let metrics_path = dir.path().join("metrics.json");

    let output = triage(
        dir.path(),
        &[
            "train",
            "--version", "v9",
            "--out", model_path.to_str().unwrap(),
            "--metrics", metrics_path.to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("v9"), "stderr does not name the version: {}", stderr);
    assert!(!model_path.exists());
    assert!(!metrics_path.exists());
}

#[test]
fn test_out_of_range_test_size_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let model_path = dir.path().join("model.bin");

    let output = triage(
        dir.path(),
        &[
            "train",
            "--test-size", "1.5",
            "--out", model_path.to_str().unwrap(),
            "--metrics", dir.path().join("metrics.json").to_str().unwrap(),
        ],
    );

    assert!(!output.status.success());
    assert!(!model_path.exists());
}
