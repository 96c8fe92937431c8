use std::process::Command;

use slidex_lib::{ErrorCategory, SlidexOutput};
use tempfile::TempDir;

#[test]
fn missing_root_exits_with_fatal_code_and_json_error() {
    let dir = TempDir::new().expect("tempdir");
    let missing = dir.path().join("no-slides-here");

    let output = Command::new(env!("CARGO_BIN_EXE_slidex"))
        .arg(&missing)
        .args(["--format", "json"])
        .output()
        .expect("run slidex");

    assert_eq!(output.status.code(), Some(2));
    let body: SlidexOutput = serde_json::from_slice(&output.stdout).expect("json output");
    match body {
        SlidexOutput::Error(err) => {
            assert!(err.error.message.contains("Directory not found"));
        }
        other => panic!("expected error output, got {other:?}"),
    }
}

#[test]
fn empty_root_exits_successfully_without_launching_a_browser() {
    let dir = TempDir::new().expect("tempdir");
    std::fs::write(dir.path().join("readme.txt"), "nothing to render").expect("write");

    let output = Command::new(env!("CARGO_BIN_EXE_slidex"))
        .arg(dir.path())
        .args(["--format", "json", "--chrome", "/definitely/not/chrome"])
        .output()
        .expect("run slidex");

    assert_eq!(output.status.code(), Some(0));
    let body: SlidexOutput = serde_json::from_slice(&output.stdout).expect("json output");
    match body {
        SlidexOutput::Export(export) => {
            assert!(!export.success);
            assert_eq!(export.message.as_deref(), Some("No files to export"));
            assert_eq!(export.discovered, 0);
        }
        other => panic!("expected export output, got {other:?}"),
    }
}

#[test]
fn invalid_config_file_exits_with_fatal_code() {
    let dir = TempDir::new().expect("tempdir");
    let cfg = dir.path().join("slidex.toml");
    std::fs::write(&cfg, "image_quality = 250\n").expect("write config");

    let status = Command::new(env!("CARGO_BIN_EXE_slidex"))
        .arg(dir.path())
        .arg("--config")
        .arg(&cfg)
        .args(["--format", "pretty"])
        .status()
        .expect("run slidex");

    assert_eq!(status.code(), Some(2));
}

#[test]
fn summary_can_be_written_to_a_file() {
    let dir = TempDir::new().expect("tempdir");
    let summary = dir.path().join("summary.json");

    let status = Command::new(env!("CARGO_BIN_EXE_slidex"))
        .arg(dir.path())
        .args(["--format", "json", "-o"])
        .arg(&summary)
        .status()
        .expect("run slidex");

    assert_eq!(status.code(), Some(0));
    let raw = std::fs::read_to_string(&summary).expect("summary file");
    assert!(raw.contains("\"mode\":\"export\""));
}

#[test]
fn unwritable_summary_path_reports_io_error() {
    let dir = TempDir::new().expect("tempdir");
    let summary = dir.path().join("no-such-dir").join("summary.json");

    let output = Command::new(env!("CARGO_BIN_EXE_slidex"))
        .arg(dir.path())
        .args(["--format", "json", "-o"])
        .arg(&summary)
        .output()
        .expect("run slidex");

    assert_eq!(output.status.code(), Some(2));
    let body: SlidexOutput = serde_json::from_slice(&output.stdout).expect("json output");
    match body {
        SlidexOutput::Error(err) => assert_eq!(err.error.category, ErrorCategory::Io),
        other => panic!("expected error output, got {other:?}"),
    }
}
