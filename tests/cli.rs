//! Integration tests for the matrix_compare_rs CLI.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_matrix_compare_rs"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute matrix_compare_rs")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path is UTF-8")
}

fn write_fixtures(dir: &TempDir) -> (std::path::PathBuf, std::path::PathBuf) {
    let before = dir.path().join("before.txt");
    let after = dir.path().join("after.txt");
    fs::write(&before, "2 2\n1 2 3 4 ").unwrap();
    fs::write(&after, "2 2\n1 5 0 4 ").unwrap();
    (before, after)
}

#[test]
fn test_compare_pass_exits_zero() {
    let dir = TempDir::new().unwrap();
    let (before, after) = write_fixtures(&dir);

    let output = run(&[
        "compare",
        path_str(&before),
        path_str(&after),
        "--abs-threshold",
        "2",
        "--pct-threshold",
        "50",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("verdict:    pass"), "stdout: {}", stdout);
    assert!(stdout.contains("2 of 4 cells"), "stdout: {}", stdout);
}

#[test]
fn test_compare_fail_is_reported_not_an_error() {
    let dir = TempDir::new().unwrap();
    let (before, after) = write_fixtures(&dir);

    let output = run(&[
        "compare",
        path_str(&before),
        path_str(&after),
        "--abs-threshold",
        "2",
        "--pct-threshold",
        "49",
        "--json",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["verdict"], "fail");
    assert_eq!(json["exceeding"], 2);
    assert_eq!(json["total"], 4);
}

#[test]
fn test_compare_shape_mismatch_is_operational_error() {
    let dir = TempDir::new().unwrap();
    let (before, _) = write_fixtures(&dir);
    let wide = dir.path().join("wide.txt");
    fs::write(&wide, "3 2\n1 2 3 4 5 6 ").unwrap();

    let output = run(&["compare", path_str(&before), path_str(&wide)]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

#[test]
fn test_compare_writes_diff() {
    let dir = TempDir::new().unwrap();
    let (before, after) = write_fixtures(&dir);
    let diff = dir.path().join("diff.txt");

    let output = run(&[
        "compare",
        path_str(&before),
        path_str(&after),
        "--diff-out",
        path_str(&diff),
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read_to_string(&diff).unwrap(), "2 2\n0 3 3 0 ");
}

#[test]
fn test_convert_txt_to_xml_and_back() {
    let dir = TempDir::new().unwrap();
    let (before, _) = write_fixtures(&dir);
    let xml = dir.path().join("before.xml");
    let txt = dir.path().join("again.txt");

    assert_eq!(run(&["convert", path_str(&before), path_str(&xml)]).status.code(), Some(0));
    assert_eq!(run(&["convert", path_str(&xml), path_str(&txt)]).status.code(), Some(0));
    assert_eq!(fs::read_to_string(&txt).unwrap(), "2 2\n1 2 3 4 ");
}

#[test]
fn test_convert_to_png_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let (before, _) = write_fixtures(&dir);
    let png = dir.path().join("out.png");

    let output = run(&["convert", path_str(&before), path_str(&png)]);
    assert_eq!(output.status.code(), Some(2));
    assert!(!png.exists());
}

#[test]
fn test_raw_frame_histogram() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("frame.raw");
    let samples: Vec<u8> = [0u16, 511, 1023, 511, 0, 0]
        .iter()
        .flat_map(|s| s.to_le_bytes())
        .collect();
    fs::write(&raw, samples).unwrap();

    let output = run(&[
        "histogram",
        path_str(&raw),
        "--raw-width",
        "3",
        "--raw-height",
        "2",
        "--json",
    ]);

    assert_eq!(output.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["pixels"], 6);
    assert_eq!(json["red"][0], 3);
    assert_eq!(json["green"][127], 2);
    assert_eq!(json["blue"][255], 1);
}

#[test]
fn test_missing_file_exits_two() {
    let output = run(&["info", "/definitely/not/here.txt"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unsupported_raw_type_exits_two() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("frame.raw");
    fs::write(&raw, [0u8; 8]).unwrap();

    let output = run(&[
        "info",
        path_str(&raw),
        "--raw-width",
        "2",
        "--raw-height",
        "2",
        "--raw-type",
        "3",
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("not supported"), "stderr: {}", stderr);
}
