use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn pomotrack(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pomotrack").unwrap();
    cmd.env("HOME", home.path()).env_remove("POMOTRACK_LOG");
    cmd
}

#[test]
fn test_run_short_session_json() {
    let home = TempDir::new().unwrap();
    pomotrack(&home)
        .args(["run", "--duration", "3s", "--tick-ms", "5", "--output", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"completed\": true"))
        .stdout(predicate::str::contains("\"planned_seconds\": 3"))
        .stdout(predicate::str::contains("\"summary\""));
}

#[test]
fn test_run_pretty_prints_summary() {
    let home = TempDir::new().unwrap();
    pomotrack(&home)
        .args(["run", "-k", "short", "-d", "2s", "--tick-ms", "5", "-t", "Inbox zero"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Short Break session on \"Inbox zero\""))
        .stdout(predicate::str::contains("Analytics"));
}

#[test]
fn test_run_rejects_unknown_kind() {
    let home = TempDir::new().unwrap();
    pomotrack(&home)
        .args(["run", "--kind", "nap"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown timer kind 'nap'"));
}

#[test]
fn test_run_rejects_bad_duration() {
    let home = TempDir::new().unwrap();
    pomotrack(&home)
        .args(["run", "--duration", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid duration"));
}

#[test]
fn test_pref_set_then_get() {
    let home = TempDir::new().unwrap();
    pomotrack(&home)
        .args(["pref", "set", "timer.work_minutes", "50"])
        .assert()
        .success();

    pomotrack(&home)
        .args(["pref", "get", "timer.work_minutes", "--default", "25"])
        .assert()
        .success()
        .stdout("50\n");

    assert!(home.path().join(".pomotrack/preferences.yaml").exists());
}

#[test]
fn test_pref_get_default() {
    let home = TempDir::new().unwrap();
    pomotrack(&home)
        .args(["pref", "get", "missing", "--default", "fallback"])
        .assert()
        .success()
        .stdout("fallback\n");
}

#[test]
fn test_config_init_then_show() {
    let home = TempDir::new().unwrap();
    pomotrack(&home).args(["config", "init"]).assert().success();
    assert!(home.path().join(".pomotrack/config.yaml").exists());

    pomotrack(&home)
        .args(["config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"work_minutes\": 25"));
}

#[test]
fn test_malformed_config_is_reported() {
    let home = TempDir::new().unwrap();
    let dir = home.path().join(".pomotrack");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("config.yaml"), "timer: [not, a, map]\n").unwrap();

    pomotrack(&home)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config file"));
}

#[test]
fn test_completions_bash() {
    let home = TempDir::new().unwrap();
    pomotrack(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pomotrack"));
}

#[test]
fn test_completions_unknown_shell() {
    let home = TempDir::new().unwrap();
    pomotrack(&home)
        .args(["completions", "tcsh"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown shell"));
}
