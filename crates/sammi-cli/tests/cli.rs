//! Binary-level tests that do not need a bundler run.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn sammi_next() -> Command {
    let mut cmd = Command::cargo_bin("sammi-next").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    for key in ["SAMMI_NEXT_OUT_DIR", "SAMMI_NEXT_OUT_JS", "SAMMI_NEXT_OUT_SEF"] {
        cmd.env_remove(key);
    }
    cmd
}

fn valid_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "src/script.js", "export default function main() {}");
    write(
        dir.path(),
        "sammi.config.json",
        r#"{
            "id": "demo",
            "name": "Demo Extension",
            "version": "1.0.0",
            "entry": "src/script.js"
        }"#,
    );
    dir
}

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

#[test]
fn help_lists_the_subcommands() {
    sammi_next()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("dev"))
        .stdout(predicate::str::contains("init"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("--outDir"));
}

#[test]
fn version_flag_prints_the_version() {
    sammi_next()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn check_accepts_a_valid_project() {
    let dir = valid_project();

    sammi_next()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .success()
        .stderr(predicate::str::contains("sammi.config.json is valid"))
        .stderr(predicate::str::contains("All checks passed!"));
}

#[test]
fn check_fails_without_a_config() {
    let dir = TempDir::new().unwrap();

    sammi_next()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("config file not found"));
}

#[test]
fn check_reports_a_missing_entry() {
    let dir = valid_project();
    fs::remove_file(dir.path().join("src/script.js")).unwrap();

    sammi_next()
        .current_dir(dir.path())
        .arg("check")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/entry"));
}

#[test]
fn build_fails_on_an_invalid_config() {
    let dir = valid_project();
    write(
        dir.path(),
        "sammi.config.json",
        r#"{ "id": "bad id", "name": "Demo", "version": "1.0.0", "entry": "src/script.js" }"#,
    );

    sammi_next()
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("/id"));

    assert!(!dir.path().join("dist").exists());
}

#[test]
fn unknown_mode_is_rejected() {
    sammi_next()
        .args(["--mode", "staging"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid mode: staging"));
}

#[test]
fn usage_errors_exit_with_one() {
    sammi_next()
        .arg("--no-such-flag")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--no-such-flag"));
}

#[test]
fn init_scaffolds_a_project() {
    let dir = TempDir::new().unwrap();

    sammi_next()
        .current_dir(dir.path())
        .args(["init", "my-ext", "--template", "sample-ts"])
        .assert()
        .success();

    let project = dir.path().join("my-ext");
    assert!(project.join("sammi.config.json").is_file());
    assert!(project.join("src/script.ts").is_file());
    assert!(project.join("package.json").is_file());

    sammi_next()
        .current_dir(&project)
        .arg("check")
        .assert()
        .success();
}

#[test]
fn init_refuses_a_non_empty_directory() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "my-ext/readme.txt", "hello");

    sammi_next()
        .current_dir(dir.path())
        .args(["init", "my-ext"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("force"));

    sammi_next()
        .current_dir(dir.path())
        .args(["init", "my-ext", "--force"])
        .assert()
        .success();
}
