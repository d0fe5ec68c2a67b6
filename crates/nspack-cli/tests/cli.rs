//! End-to-end tests for the nspack binary.

// Allow deprecated APIs (assert_cmd::cargo_bin is deprecated but still works)
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const ENV_KEYS: [&str; 5] = [
    "NSPACK_ANDROID",
    "NSPACK_IOS",
    "NSPACK_SKIP_CODE_GENERATION",
    "NSPACK_SNAPSHOT",
    "NSPACK_UGLIFY",
];

fn nspack(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("nspack").unwrap();
    cmd.current_dir(dir).env("NO_COLOR", "1").env_remove("RUST_LOG");
    for key in ENV_KEYS {
        cmd.env_remove(key);
    }
    cmd
}

fn scaffold(root: &Path, files: &[&str]) {
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }
}

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn config_prints_android_configuration() {
    let temp = TempDir::new().unwrap();
    let output = nspack(temp.path())
        .args(["config", "--android"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let config = stdout_json(&output);
    assert_eq!(config["target"]["platform"], "android");
    assert_eq!(config["entry"]["bundle"], "./main.aot.ts");
    assert_eq!(config["output"]["libraryTarget"], "commonjs2");
    assert_eq!(config["plugins"].as_array().unwrap().len(), 8);

    let context = config["context"].as_str().unwrap();
    assert!(context.ends_with("app"));
}

#[test]
fn config_ios_with_every_feature() {
    let temp = TempDir::new().unwrap();
    let output = nspack(temp.path())
        .args([
            "config",
            "--ios",
            "--skip-code-generation",
            "--snapshot",
            "--uglify",
            "--compact",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    // Compact output is a single line
    let text = String::from_utf8(output.stdout.clone()).unwrap();
    assert_eq!(text.trim_end().lines().count(), 1);

    let config = stdout_json(&output);
    assert_eq!(config["entry"]["bundle"], "./main.ts");
    let plugins = config["plugins"].as_array().unwrap();
    assert_eq!(plugins.len(), 11);
    assert_eq!(plugins[8]["name"], "NativeScriptSnapshotPlugin");
    assert_eq!(plugins[10]["name"], "UglifyJsPlugin");
    assert_eq!(plugins[10]["options"]["compress"], true);
}

#[test]
fn config_without_platform_fails() {
    let temp = TempDir::new().unwrap();
    nspack(temp.path())
        .arg("config")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("--android"));
}

#[test]
fn conflicting_platform_flags_are_rejected() {
    let temp = TempDir::new().unwrap();
    nspack(temp.path())
        .args(["config", "--android", "--ios"])
        .assert()
        .failure();
}

#[test]
fn platform_from_environment_variable() {
    let temp = TempDir::new().unwrap();
    let output = nspack(temp.path())
        .env("NSPACK_IOS", "true")
        .arg("config")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["target"]["platform"], "ios");
}

#[test]
fn conflicting_platforms_across_layers_fail() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("nspack.env.json"), r#"{"android": true}"#).unwrap();

    nspack(temp.path())
        .env("NSPACK_IOS", "true")
        .arg("config")
        .assert()
        .failure();
}

#[test]
fn project_env_file_is_discovered() {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("nspack.env.json"),
        r#"{"android": true, "uglify": true}"#,
    )
    .unwrap();

    let output = nspack(temp.path()).arg("config").output().unwrap();
    assert!(output.status.success());

    let config = stdout_json(&output);
    let plugins = config["plugins"].as_array().unwrap();
    let last = plugins.last().unwrap();
    assert_eq!(last["name"], "UglifyJsPlugin");
    assert_eq!(last["options"]["compress"], false);
}

#[test]
fn missing_env_file_is_reported() {
    let temp = TempDir::new().unwrap();
    nspack(temp.path())
        .args(["config", "--ios", "--env-file", "nope.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Env file not found"));
}

#[test]
fn config_writes_output_file() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("build").join("webpack.json");

    nspack(temp.path())
        .args(["config", "--ios", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let config: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(config["target"]["platform"], "ios");
}

#[test]
fn check_passes_for_complete_project() {
    let temp = TempDir::new().unwrap();
    scaffold(
        temp.path(),
        &[
            "app/main.aot.ts",
            "app/vendor.ts",
            "app/app.css",
            "tsconfig.aot.json",
        ],
    );

    nspack(temp.path())
        .args(["check", "--android"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Project is ready to bundle"));
}

#[test]
fn check_lists_missing_files() {
    let temp = TempDir::new().unwrap();
    scaffold(temp.path(), &["app/main.ts", "app/app.css"]);

    nspack(temp.path())
        .args(["check", "--ios", "--skip-code-generation", "--project"])
        .arg(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("vendor"))
        .stderr(predicate::str::contains("./vendor").not())
        .stderr(predicate::str::contains("tsconfig.json"));
}

#[test]
fn explicit_env_file_shadows_project_env_file() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("nspack.env.json"), r#"{"android": true}"#).unwrap();
    fs::write(temp.path().join("ci.env.json"), r#"{"ios": true}"#).unwrap();

    let output = nspack(temp.path())
        .args(["config", "--env-file", "ci.env.json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_json(&output)["target"]["platform"], "ios");

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Ignoring"), "stderr: {stderr}");
    assert!(stderr.contains("nspack.env.json"), "stderr: {stderr}");
}

#[test]
fn project_env_file_passed_explicitly_is_not_reported() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("nspack.env.json"), r#"{"ios": true}"#).unwrap();

    nspack(temp.path())
        .args(["config", "--env-file", "nspack.env.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Ignoring").not());
}
