use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Write a config file that keeps every path inside `root`.
fn write_config(root: &Path) -> std::path::PathBuf {
    let config = serde_json::json!({
        "gateway": {
            "api_key_file": root.join("moonshot.txt"),
        },
        "extraction": {
            "buyer_hint_file": root.join("buyer.txt"),
        },
        "pipeline": {
            "input_dir": root.join("invoices"),
            "output_path": root.join("invoices_data.csv"),
        },
    });
    let path = root.join("config.json");
    fs::write(&path, config.to_string()).unwrap();
    path
}

fn fapiao(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fapiao").unwrap();
    cmd.arg("--config").arg(config);
    cmd
}

#[test]
fn run_without_key_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    fs::create_dir(dir.path().join("invoices")).unwrap();
    fs::write(dir.path().join("invoices").join("a.pdf"), b"%PDF-1.4").unwrap();

    fapiao(&config)
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));

    assert!(!dir.path().join("invoices_data.csv").exists());
}

#[test]
fn run_with_empty_key_file_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    fs::write(dir.path().join("moonshot.txt"), "  \n").unwrap();

    fapiao(&config)
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is empty"));
}

#[test]
fn run_on_folder_without_pdfs_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    fs::write(dir.path().join("moonshot.txt"), "sk-test\n").unwrap();
    fs::create_dir(dir.path().join("invoices")).unwrap();
    fs::write(dir.path().join("invoices").join("notes.txt"), "hello").unwrap();

    fapiao(&config)
        .arg("run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no PDF files found"));

    assert!(!dir.path().join("invoices_data.csv").exists());
}

#[test]
fn run_on_missing_folder_fails() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    fs::write(dir.path().join("moonshot.txt"), "sk-test").unwrap();

    fapiao(&config)
        .args(["run", "--input"])
        .arg(dir.path().join("elsewhere"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn process_rejects_non_pdf() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let image = dir.path().join("scan.png");
    fs::write(&image, b"png").unwrap();

    fapiao(&config)
        .arg("process")
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn config_get_reads_given_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    fapiao(&config)
        .args(["config", "get", "gateway.model"])
        .assert()
        .success()
        .stdout(predicate::str::contains("moonshot-v1-32k"));
}

#[test]
fn config_set_then_get() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());

    fapiao(&config)
        .args(["config", "set", "extraction.max_attempts", "5"])
        .assert()
        .success();

    fapiao(&config)
        .args(["config", "get", "extraction.max_attempts"])
        .assert()
        .success()
        .stdout(predicate::str::diff("5\n"));
}

#[test]
fn config_path_reports_status() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("absent.json");

    fapiao(&config)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("not created"));
}
