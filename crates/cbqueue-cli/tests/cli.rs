//! End-to-end tests for the `cbqueue` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn cbqueue(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("cbqueue").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env("RUST_LOG", "warn");
    cmd
}

#[test]
fn version_prints_package_name() {
    let home = TempDir::new().unwrap();
    cbqueue(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cbqueue-cli"));
}

#[test]
fn default_run_reads_all_twenty_values() {
    let home = TempDir::new().unwrap();
    cbqueue(&home)
        .args(["run", "--format", "json", "--project"])
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"values_read\": 20"))
        .stdout(predicate::str::contains("\"missing\": []"));
}

#[test]
fn run_flags_override_defaults() {
    let home = TempDir::new().unwrap();
    cbqueue(&home)
        .args([
            "run",
            "--capacity",
            "1",
            "--producers",
            "3",
            "--consumers",
            "3",
            "--items",
            "50",
            "--reads",
            "50",
            "--project",
        ])
        .arg(home.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Values read:    150"));
}

#[test]
fn run_rejects_parity_mismatch() {
    let home = TempDir::new().unwrap();
    cbqueue(&home)
        .args(["run", "--consumers", "3", "--project"])
        .arg(home.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("writes 20 values but reads 15"));
}

#[test]
fn init_then_show_config() {
    let home = TempDir::new().unwrap();
    let project = home.path().join("project");

    cbqueue(&home)
        .arg("init")
        .arg(&project)
        .assert()
        .success();
    assert!(project.join("cbqueue.toml").exists());

    cbqueue(&home)
        .arg("init")
        .arg(&project)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));

    cbqueue(&home)
        .args(["config", "show", "--format", "toml", "--project"])
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("capacity = 10"));
}

#[test]
fn run_with_explicit_config_file() {
    let home = TempDir::new().unwrap();
    let path = home.path().join("small.toml");
    std::fs::write(
        &path,
        "[queue]\ncapacity = 2\n\n[demo]\nproducers = 1\nconsumers = 1\nitems_per_producer = 8\nreads_per_consumer = 8\n",
    )
    .unwrap();

    cbqueue(&home)
        .args(["run", "--format", "json", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"capacity\": 2"))
        .stdout(predicate::str::contains("\"values_read\": 8"));
}
