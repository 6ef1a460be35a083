//! Tests for error handling and CLI flags.

use crate::support::*;

#[test]
fn test_help_lists_commands() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("split"));
    assert!(out.contains("diff"));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    let output = t.cmd().arg("unknown-command").output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "fabrix");
}

#[test]
fn test_verbose_flag_logs_to_stderr() {
    let t = Test::new();
    t.write("application.json", MINIMAL_DESCRIPTOR);

    let output = t.run(&["--verbose", "split", "application.json", "--out", "out"]);
    assert_success(&output);
    assert_stderr_contains(&output, "DEBUG");
}

#[test]
fn test_log_env_overrides_verbosity() {
    let t = Test::new();
    t.write("application.json", MINIMAL_DESCRIPTOR);

    let output = t
        .cmd()
        .env("FABRIX_LOG", "fabrix=info")
        .args(["split", "application.json", "--out", "out"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stderr_contains(&output, "descriptor split");
}

#[test]
fn test_malformed_project_config() {
    let t = Test::new();
    t.write(".fabrix.toml", "[paths\nbuilder = ");
    t.write("application.json", MINIMAL_DESCRIPTOR);

    let output = t.run(&["split", "application.json"]);
    assert_failure(&output);
    assert_stderr_contains(&output, ".fabrix.toml");
}

#[test]
fn test_invalid_config_value() {
    let t = Test::new();
    t.write(".fabrix.toml", "[paths]\nbuilder = \"\"\n");
    t.write("application.json", MINIMAL_DESCRIPTOR);

    let output = t.run(&["split", "application.json"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid value");
}

#[test]
fn test_completions_bash() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "fabrix");
}

#[test]
fn test_completions_invalid_shell() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "invalid"]).output().unwrap();
    assert_failure(&output);
}

#[test]
fn test_failures_go_to_stderr() {
    use predicates::prelude::*;

    let t = Test::new();
    t.cmd()
        .args(["split", "missing.json"])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not found: missing.json"));
}
