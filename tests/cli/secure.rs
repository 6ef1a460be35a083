//! Tests for `fabrix keygen`, `fabrix seal` and `fabrix open`.

use crate::support::*;

#[test]
fn test_keygen_creates_key_file() {
    let t = Test::new();

    let output = t.keygen();
    assert_success(&output);
    assert_stdout_contains(&output, "secret key generated");

    let key_path = t.home.path().join(".fabrix/secrets.key");
    let contents = std::fs::read_to_string(&key_path).unwrap();
    assert_eq!(contents.trim().len(), 64);
}

#[cfg(unix)]
#[test]
fn test_keygen_restricts_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::with_key();
    let key_path = t.home.path().join(".fabrix/secrets.key");
    let mode = std::fs::metadata(&key_path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_keygen_refuses_to_overwrite() {
    let t = Test::with_key();
    let key_path = t.home.path().join(".fabrix/secrets.key");
    let before = std::fs::read_to_string(&key_path).unwrap();

    let output = t.keygen();
    assert_failure(&output);
    assert_stderr_contains(&output, "refusing to overwrite");
    assert_stderr_contains(&output, "--force");
    assert_eq!(std::fs::read_to_string(&key_path).unwrap(), before);
}

#[test]
fn test_keygen_force_replaces_key() {
    let t = Test::with_key();
    let key_path = t.home.path().join(".fabrix/secrets.key");
    let before = std::fs::read_to_string(&key_path).unwrap();

    assert_success(&t.run(&["keygen", "--force"]));
    assert_ne!(std::fs::read_to_string(&key_path).unwrap(), before);
}

#[test]
fn test_keygen_honours_configured_key_file() {
    let t = Test::new();
    t.write(".fabrix.toml", "[secrets]\nkey_file = \"~/keys/project.key\"\n");

    assert_success(&t.keygen());
    assert!(t.home.path().join("keys/project.key").exists());
    assert!(!t.home.path().join(".fabrix/secrets.key").exists());
}

#[test]
fn test_seal_then_open() {
    let t = Test::with_key();

    let sealed = t.seal("postgres://user:pass@db:5432/app");
    assert_success(&sealed);
    let sealed = stdout(&sealed).trim().to_string();
    assert!(sealed.starts_with("secure://"));
    assert!(!sealed.contains("pass@db"));

    let opened = t.open(&sealed);
    assert_success(&opened);
    assert_eq!(stdout(&opened).trim_end(), "postgres://user:pass@db:5432/app");
}

#[test]
fn test_seal_hex_components() {
    let t = Test::with_key();

    let output = t.run(&["seal", "value", "--hex"]);
    assert_success(&output);
    let sealed = stdout(&output).trim().to_string();
    let body = sealed.strip_prefix("secure://").unwrap();
    let parts: Vec<&str> = body.split(':').collect();
    assert_eq!(parts.len(), 3);
    assert_eq!(parts[0].len(), 24);
    assert_eq!(parts[2].len(), 32);

    assert_success(&t.open(&sealed));
}

#[test]
fn test_seal_uses_key_from_environment() {
    let t = Test::new();

    let output = t
        .cmd()
        .env("FABRIX_SECRETS_KEY", HEX_SECRET_KEY)
        .args(["seal", "from-env"])
        .output()
        .unwrap();
    assert_success(&output);
    let sealed = stdout(&output).trim().to_string();

    let opened = t
        .cmd()
        .env("FABRIX_SECRETS_KEY", HEX_SECRET_KEY)
        .args(["open", &sealed])
        .output()
        .unwrap();
    assert_success(&opened);
    assert_stdout_contains(&opened, "from-env");
}

#[test]
fn test_seal_without_key_suggests_keygen() {
    let t = Test::new();

    let output = t.seal("value");
    assert_failure(&output);
    assert_stderr_contains(&output, "no secret key configured");
    assert_stderr_contains(&output, "fabrix keygen");
}

#[test]
fn test_open_with_wrong_key_fails() {
    let t = Test::with_key();
    let sealed = stdout(&t.seal("value")).trim().to_string();

    let output = t
        .cmd()
        .env("FABRIX_SECRETS_KEY", HEX_SECRET_KEY)
        .args(["open", &sealed])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "decryption failed");
    assert_stdout_excludes(&output, "value");
}

#[test]
fn test_open_plain_value_fails() {
    let t = Test::with_key();

    let output = t.open("plain-value");
    assert_failure(&output);
    assert_stderr_contains(&output, "missing secure:// prefix");
}

#[test]
fn test_open_malformed_value_fails() {
    let t = Test::with_key();

    let output = t.open("secure://only:two");
    assert_failure(&output);
    assert_stderr_contains(&output, "malformed sealed value");
}
