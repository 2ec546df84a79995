//! End-to-end tests for the drillbook binary.

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

/// Binary run from an empty directory so no stray config is discovered.
fn drillbook(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_drillbook"));
    cmd.current_dir(dir.path())
        .env_remove("DRILLBOOK_CONFIG")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1");
    cmd
}

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_classify_terminal_output() {
    let dir = TempDir::new().unwrap();
    let output = drillbook(&dir)
        .args(["classify", "3", "5", "15", "7", "-9"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        stdout_of(&output),
        "3: Fizz\n5: Buzz\n15: FizzBuzz\n7: 7\n-9: Fizz\n"
    );
}

#[test]
fn test_classify_non_numeric_fails_per_value() {
    let dir = TempDir::new().unwrap();
    let output = drillbook(&dir)
        .args(["--format", "json", "classify", "15", "hello"])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let json: Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    let results = json["results"].as_array().unwrap();
    assert_eq!(results[0]["label"]["kind"], "rule");
    assert_eq!(results[0]["label"]["value"], "FizzBuzz");
    assert!(results[1]["error"].as_str().unwrap().contains("text"));
}

#[test]
fn test_speed_command() {
    let dir = TempDir::new().unwrap();
    let output = drillbook(&dir)
        .args(["--plain", "speed", "85"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).ends_with("points: 3\n"));

    let output = drillbook(&dir)
        .args(["speed", "85", "--limit", "100"])
        .output()
        .unwrap();
    assert!(stdout_of(&output).ends_with("within limit\n"));
}

#[test]
fn test_speed_rejects_text() {
    let dir = TempDir::new().unwrap();
    drillbook(&dir).args(["speed", "fast"]).assert().failure();
}

#[test]
fn test_count_and_tally() {
    let dir = TempDir::new().unwrap();
    let output = drillbook(&dir)
        .args(["--format", "json", "count", "--target", "1"])
        .args(["1", "2", "3", "4", "1", "1", "3", "1", "5"])
        .output()
        .unwrap();
    let json: Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(json["count"], 4);
    assert_eq!(json["total"], 9);

    let output = drillbook(&dir)
        .args(["count", "--tally", "a", "b", "a"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "     2  a\n     1  b\n");
}

#[test]
fn test_tag_command_uses_config() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".drillbook.toml"), "[pipeline]\ntag = \"td\"\n").unwrap();
    let output = drillbook(&dir)
        .args(["tag", "-1", "3", "0"])
        .output()
        .unwrap();
    assert_eq!(stdout_of(&output), "<td>3</td>\n<td>0</td>\n");
}

#[test]
fn test_sort_records_from_file_and_stdin() {
    let dir = TempDir::new().unwrap();
    let records = r#"[
        {"id": 3, "name": "Mosh"},
        {"id": 1, "name": "Arjun"},
        {"id": 2, "name": "Mosh"}
    ]"#;
    let path = dir.path().join("people.json");
    fs::write(&path, records).unwrap();

    let output = drillbook(&dir)
        .args(["--format", "json", "sort-records", "people.json", "--by", "name", "--descending"])
        .output()
        .unwrap();
    let json: Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    let ids: Vec<u64> = json["records"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_u64().unwrap())
        .collect();
    assert_eq!(ids, vec![3, 2, 1]);

    let output = drillbook(&dir)
        .args(["--format", "json", "sort-records", "-", "--by", "id"])
        .write_stdin(records)
        .output()
        .unwrap();
    let json: Value = serde_json::from_str(&stdout_of(&output)).unwrap();
    assert_eq!(json["records"][0]["name"], "Arjun");
}

#[test]
fn test_init_creates_config_once() {
    let dir = TempDir::new().unwrap();
    drillbook(&dir).arg("init").assert().success();
    assert!(dir.path().join(".drillbook.toml").exists());

    drillbook(&dir).arg("init").assert().failure();
    drillbook(&dir).args(["init", "--force"]).assert().success();
}

#[test]
fn test_broken_explicit_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("bad.toml"), "[speed]\nlimit = 0.0\n").unwrap();
    drillbook(&dir)
        .args(["--config", "bad.toml", "classify", "3"])
        .assert()
        .failure();
}

#[test]
fn test_broken_discovered_config_falls_back() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join(".drillbook.toml"), "not = [valid").unwrap();
    let output = drillbook(&dir).args(["classify", "15"]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(stdout_of(&output), "15: FizzBuzz\n");
}

#[test]
fn test_color_flag_overrides_no_color() {
    let dir = TempDir::new().unwrap();
    let output = drillbook(&dir)
        .args(["--color", "always", "classify", "15"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("\u{1b}["), "expected ANSI escapes in {stdout:?}");
    assert!(stdout.contains("FizzBuzz"));

    let output = drillbook(&dir)
        .args(["--color", "never", "classify", "15"])
        .output()
        .unwrap();
    assert_eq!(stdout_of(&output), "15: FizzBuzz\n");
}
