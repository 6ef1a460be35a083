//! Tests for `fabrix validate`.

use crate::support::*;

#[test]
fn test_validate_webapp_descriptor() {
    let t = Test::new();
    t.write("application.json", WEBAPP_DESCRIPTOR);

    let output = t.validate("application.json", "application");
    assert_success(&output);
    assert_stdout_contains(&output, "is a valid application");
}

#[test]
fn test_validate_defaults_to_application_schema() {
    let t = Test::new();
    t.write("application.json", MINIMAL_DESCRIPTOR);

    let output = t.run(&["validate", "application.json"]);
    assert_success(&output);
}

#[test]
fn test_validate_reports_violations_with_exit_code_one() {
    let t = Test::new();
    t.write(
        "application.json",
        r#"{"key": "Bad_Key", "displayName": "x", "type": "webapp", "port": 0}"#,
    );

    let output = t.validate("application.json", "application");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "failed");
    assert_stdout_contains(&output, "/key");
}

#[test]
fn test_validate_rejects_duplicate_variables() {
    let t = Test::new();
    t.write(
        "application.json",
        r#"{
  "key": "myapp",
  "displayName": "My App",
  "type": "webapp",
  "image": "myapp",
  "port": 8080,
  "configuration": [
    {"name": "PORT", "value": "1", "location": "variable"},
    {"name": "PORT", "value": "2", "location": "variable"}
  ]
}"#,
    );

    let output = t.validate("application.json", "application");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "duplicate configuration item 'PORT'");
}

#[test]
fn test_validate_merged_descriptor_with_deployment_key() {
    let t = Test::new();
    t.write("application.json", WEBAPP_DESCRIPTOR);
    assert_success(&t.split("application.json", "out"));
    assert_success(&t.merge("out", "merged.json"));
    assert!(t.read("merged.json").contains("\"deploymentKey\""));

    let output = t.validate("merged.json", "application");
    assert_success(&output);
    assert_stdout_contains(&output, "is a valid application");
}

#[test]
fn test_validate_rejects_malformed_deployment_key() {
    let t = Test::new();
    t.write(
        "application.json",
        &MINIMAL_DESCRIPTOR.replacen("{", "{\n  \"deploymentKey\": \"abc123\",", 1),
    );

    let output = t.validate("application.json", "application");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "deploymentKey");
}

#[test]
fn test_validate_rejects_kv_literal_in_variable() {
    let t = Test::new();
    t.write(
        "application.json",
        &MINIMAL_DESCRIPTOR.replace("\"production\"", "\"kv://production\""),
    );

    let output = t.validate("application.json", "application");
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "kv://");
}

#[test]
fn test_validate_datasource() {
    let t = Test::new();
    t.write("datasource.json", DATASOURCE);

    let output = t.validate("datasource.json", "external-datasource");
    assert_success(&output);
}

#[test]
fn test_validate_datasource_missing_system_key() {
    let t = Test::new();
    t.write("datasource.json", r#"{"key": "contacts", "entityKey": "contact"}"#);

    let output = t.validate("datasource.json", "external-datasource");
    assert_exit_code(&output, 1);
    assert_stdout_contains(&output, "systemKey");
}

#[test]
fn test_validate_external_manifest() {
    let t = Test::new();
    t.write("manifest.json", EXTERNAL_MANIFEST);

    let output = t.validate("manifest.json", "external-manifest");
    assert_success(&output);
    assert_stdout_contains(&output, "1 data source(s)");
}

#[test]
fn test_validate_manifest_without_application() {
    let t = Test::new();
    t.write("manifest.json", r#"{"dataSources": []}"#);

    let output = t.validate("manifest.json", "external-manifest");
    assert_failure(&output);
    assert_stderr_contains(&output, "missing required section 'application'");
}

#[test]
fn test_validate_invalid_json() {
    let t = Test::new();
    t.write("application.json", "{ not json");

    let output = t.validate("application.json", "application");
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid JSON");
}
