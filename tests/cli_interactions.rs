//! CLI options interaction tests
//!
//! These tests run the `fla` binary against temporary result directories and
//! check the console summary, the JSON report, the rendered image and the
//! exit codes.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const ENV_KEYS: &[&str] = &[
    "LATENCY_DATASETS",
    "LATENCY_OUTPUT",
    "LATENCY_BINS",
    "LATENCY_IQR_FACTOR",
    "LATENCY_WIDTH",
    "LATENCY_HEIGHT",
    "LATENCY_FORMAT",
    "ENABLE_COLOR",
    "LATENCY_LOG_FORMAT",
];

/// Command running inside `workdir` with no latency variables inherited
fn create_test_cmd(workdir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fla").unwrap();
    cmd.current_dir(workdir);
    for key in ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd
}

/// Create `name` under `root` holding one empty frame file per latency
fn create_dataset(root: &Path, name: &str, latencies: &[u64]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    for (i, latency) in latencies.iter().enumerate() {
        File::create(dir.join(format!("2024.03.05_14.22.{:02}.250_HW_{}_{}ms.jpg", i, 1000 + i, latency))).unwrap();
    }
    dir
}

fn dataset_arg(label: &str, dir: &Path) -> String {
    format!("{}={}", label, dir.display())
}

#[test]
fn test_text_summary_without_plot() {
    let temp = TempDir::new().unwrap();
    let cam0 = create_dataset(temp.path(), "cam0", &[10, 11, 12, 13, 90]);

    create_test_cmd(temp.path())
        .args(["-d", &dataset_arg("cam0", &cam0)])
        .args(["-d", &dataset_arg("cam1", &temp.path().join("missing"))])
        .args(["--no-plot", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "\ncam0\n  Total frames: 5\n  Outliers removed: 1\n  Valid frames: 4\n  \
             Mean latency: 11.50ms\n  Median latency: 11.50ms\n  Std deviation: 1.12ms\n  \
             Min latency: 10ms\n  Max latency: 13ms\n",
        ))
        .stdout(predicate::str::contains("cam1: No files found"))
        .stdout(predicate::str::contains("Histogram saved to").not());

    assert!(!temp.path().join("latency_analysis.png").exists());
}

#[test]
fn test_default_datasets_in_empty_directory() {
    let temp = TempDir::new().unwrap();

    create_test_cmd(temp.path())
        .args(["--no-plot", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("V1 vis.0 (1920x1080 H.264): No files found"))
        .stdout(predicate::str::contains("V2 vis.1 (1280x720 MJPEG): No files found"))
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_non_matching_files_are_ignored() {
    let temp = TempDir::new().unwrap();
    let dir = create_dataset(temp.path(), "cam", &[21]);
    for name in ["frame.jpg", "frame_12ms.png", "frame_12ms.jpg.bak", "frame_ms.jpg", "notes.txt"] {
        File::create(dir.join(name)).unwrap();
    }

    create_test_cmd(temp.path())
        .args(["-d", &dataset_arg("cam", &dir), "--no-plot", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  Total frames: 1\n"))
        .stdout(predicate::str::contains("  Min latency: 21ms\n"));
}

#[test]
fn test_plot_writes_png() {
    let temp = TempDir::new().unwrap();
    let a = create_dataset(temp.path(), "a", &[30, 31, 32, 33, 34, 35, 80]);
    let b = create_dataset(temp.path(), "b", &[5, 6, 6, 7]);
    let output = temp.path().join("plots").join("grid.png");

    create_test_cmd(temp.path())
        .args(["-d", &dataset_arg("a", &a), "-d", &dataset_arg("b", &b)])
        .args(["-o", output.to_str().unwrap(), "--width", "600", "--height", "400", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("\n\nHistogram saved to: {}", output.display())));

    assert_eq!(image::image_dimensions(&output).unwrap(), (600, 400));
}

#[test]
fn test_json_report() {
    let temp = TempDir::new().unwrap();
    let cam = create_dataset(temp.path(), "cam", &[10, 20, 30, 40, 1000]);

    let assert = create_test_cmd(temp.path())
        .args(["-d", &dataset_arg("cam", &cam), "-d", "gone=nowhere"])
        .args(["--format", "json", "--no-plot"])
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();

    let datasets = json["datasets"].as_array().unwrap();
    assert_eq!(datasets.len(), 2);
    assert_eq!(datasets[0]["label"], "cam");
    assert_eq!(datasets[0]["status"], "analyzed");
    assert_eq!(datasets[0]["summary"]["total_frames"], 5);
    assert_eq!(datasets[0]["summary"]["outliers_removed"], 1);
    assert_eq!(datasets[0]["summary"]["mean_ms"], 25.0);
    assert_eq!(datasets[0]["metadata"]["frames_with_metadata"], 5);
    assert_eq!(datasets[1]["status"], "no_files");
    assert!(json.get("image_path").is_none());
}

#[test]
fn test_environment_datasets_and_cli_precedence() {
    let temp = TempDir::new().unwrap();
    let env_dir = create_dataset(temp.path(), "from_env", &[8, 9]);
    let cli_dir = create_dataset(temp.path(), "from_cli", &[50]);

    create_test_cmd(temp.path())
        .env("LATENCY_DATASETS", dataset_arg("env cam", &env_dir))
        .args(["--no-plot", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nenv cam\n  Total frames: 2\n"));

    create_test_cmd(temp.path())
        .env("LATENCY_DATASETS", dataset_arg("env cam", &env_dir))
        .args(["-d", &dataset_arg("cli cam", &cli_dir), "--no-plot", "--no-color"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\ncli cam\n"))
        .stdout(predicate::str::contains("env cam").not());
}

#[test]
fn test_env_file_is_loaded() {
    let temp = TempDir::new().unwrap();
    let cam = create_dataset(temp.path(), "cam", &[1, 2, 3]);
    fs::write(
        temp.path().join(".env"),
        format!("LATENCY_DATASETS={}\nLATENCY_BINS=7\nLATENCY_FORMAT=json\n", dataset_arg("cam", &cam)),
    )
    .unwrap();

    let assert = create_test_cmd(temp.path()).arg("--no-plot").assert().success();
    let json: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(json["bins"], 7);
    assert_eq!(json["datasets"][0]["label"], "cam");
}

#[test]
fn test_conflicting_color_flags_exit_with_usage_code() {
    let temp = TempDir::new().unwrap();

    create_test_cmd(temp.path())
        .args(["--color", "--no-color", "--no-plot"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--color and --no-color"));
}

#[test]
fn test_invalid_output_extension() {
    let temp = TempDir::new().unwrap();

    create_test_cmd(temp.path())
        .args(["-o", "grid.jpg", "--no-color"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("[CONFIG]"))
        .stderr(predicate::str::contains("Troubleshooting:"));
}

#[test]
fn test_malformed_dataset_flag_is_rejected_by_parser() {
    let temp = TempDir::new().unwrap();

    create_test_cmd(temp.path())
        .args(["-d", "no-separator"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("LABEL=PATH"));
}

#[test]
fn test_debug_banner_goes_to_stderr() {
    let temp = TempDir::new().unwrap();
    let cam = create_dataset(temp.path(), "cam", &[4, 5]);

    create_test_cmd(temp.path())
        .args(["-d", &dataset_arg("cam", &cam), "--no-plot", "--no-color", "--debug"])
        .assert()
        .success()
        .stderr(predicate::str::contains("frame-latency-analyzer v"))
        .stderr(predicate::str::contains("Configuration loaded successfully"))
        .stdout(predicate::str::contains("frame-latency-analyzer v").not());
}

#[test]
fn test_env_example_prints_every_variable() {
    let temp = TempDir::new().unwrap();

    create_test_cmd(temp.path())
        .arg("--env-example")
        .assert()
        .success()
        .stdout(predicate::str::contains("# LATENCY_DATASETS="))
        .stdout(predicate::str::contains("# LATENCY_LOG_FORMAT=console"));

    assert!(!temp.path().join("latency_analysis.png").exists());
}

#[test]
fn test_env_help_lists_priority() {
    let temp = TempDir::new().unwrap();

    create_test_cmd(temp.path())
        .arg("--env-help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Supported Environment Variables:"))
        .stdout(predicate::str::contains("Configuration Priority"));
}

#[test]
fn test_json_log_lines_on_stderr() {
    let temp = TempDir::new().unwrap();
    let cam = create_dataset(temp.path(), "cam", &[7, 8, 9]);

    let assert = create_test_cmd(temp.path())
        .args(["-d", &dataset_arg("cam", &cam), "-d", "gone=nowhere"])
        .args(["--no-plot", "--no-color", "--verbose", "--log-format", "json"])
        .assert()
        .success();

    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    let entries: Vec<serde_json::Value> = stderr
        .lines()
        .filter(|line| line.starts_with('{'))
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert!(entries.iter().any(|e| e["message"] == "No latency files found" && e["fields"]["dataset"] == "gone"));
    assert!(entries.iter().all(|e| e["fields"]["session_id"].is_string()));
}
