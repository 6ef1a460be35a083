//! Tests for `fabrix diff` and its exit codes.

use crate::support::*;
use serde_json::Value;

#[test]
fn test_identical_documents_exit_zero() {
    let t = Test::new();
    t.write("old.json", DATASOURCE);
    t.write("new.json", DATASOURCE);

    let output = t.diff("old.json", "new.json");
    assert_exit_code(&output, 0);
    assert_stdout_contains(&output, "identical");
}

#[test]
fn test_description_change_is_not_dataplane_relevant() {
    let t = Test::new();
    t.write("old.json", DATASOURCE);
    t.write("new.json", DATASOURCE_DESCRIPTION_CHANGED);

    let output = t.diff("old.json", "new.json");
    assert_exit_code(&output, 0);
    assert_stdout_contains(&output, "description");
    assert_stdout_contains(&output, "no dataplane-relevant changes");
}

#[test]
fn test_sync_change_exits_one() {
    let t = Test::new();
    t.write("old.json", DATASOURCE);
    t.write("new.json", DATASOURCE_SYNC_DISABLED);

    let output = t.diff("old.json", "new.json");
    assert_exit_code(&output, 1);
    assert_stdout_contains(&output, "Sync Configuration");
    assert_stdout_contains(&output, "sync.enabled");
    assert_stdout_contains(&output, "[overridable]");
    assert_stdout_excludes(&output, "full redeploy required");
}

#[test]
fn test_json_report() {
    let t = Test::new();
    t.write("old.json", DATASOURCE);
    t.write("new.json", DATASOURCE_SYNC_DISABLED);

    let output = t.run(&["diff", "old.json", "new.json", "--json"]);
    assert_exit_code(&output, 1);

    let report: Value = serde_json::from_str(&stdout(&output)).expect("report is JSON");
    assert_eq!(report["identical"], false);
    assert_eq!(report["requiresRedeploy"], false);
    assert_eq!(report["sections"][0]["title"], "Sync Configuration");

    let change = &report["dataplaneChanges"][0];
    assert_eq!(change["path"], "sync.enabled");
    assert_eq!(change["oldValue"], true);
    assert_eq!(change["newValue"], false);
    assert_eq!(change["impact"], "overridable");
}

#[test]
fn test_custom_rules_flag() {
    let t = Test::new();
    t.write("old.json", DATASOURCE);
    t.write("new.json", DATASOURCE_SYNC_DISABLED);
    t.write("rules.json", STRICT_RULES);

    let output = t.run(&[
        "diff", "old.json", "new.json", "--rules", "rules.json", "--json",
    ]);
    assert_exit_code(&output, 1);

    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["requiresRedeploy"], true);
    assert_eq!(report["dataplaneChanges"][0]["impact"], "trigger");
}

#[test]
fn test_rules_from_project_config() {
    let t = Test::new();
    t.write("old.json", DATASOURCE);
    t.write("new.json", DATASOURCE_SYNC_DISABLED);
    t.write("config/rules.json", STRICT_RULES);
    t.write(".fabrix.toml", "[rules]\npath = \"config/rules.json\"\n");

    let output = t.diff("old.json", "new.json");
    assert_exit_code(&output, 1);
    assert_stdout_contains(&output, "[trigger]");
    assert_stdout_contains(&output, "full redeploy required");
}

#[test]
fn test_application_port_change_is_trigger() {
    let t = Test::new();
    t.write("old.json", MINIMAL_DESCRIPTOR);
    t.write(
        "new.json",
        &MINIMAL_DESCRIPTOR.replace("\"port\": 8080", "\"port\": 9090"),
    );

    let output = t.run(&["diff", "old.json", "new.json", "--kind", "application"]);
    assert_exit_code(&output, 1);
    assert_stdout_contains(&output, "port");
    assert_stdout_contains(&output, "[trigger]");
}

#[test]
fn test_configuration_value_change_is_overridable() {
    let t = Test::new();
    t.write("old.json", MINIMAL_DESCRIPTOR);
    t.write(
        "new.json",
        &MINIMAL_DESCRIPTOR.replace("\"production\"", "\"staging\""),
    );

    let output = t.run(&["diff", "old.json", "new.json", "--json"]);
    assert_exit_code(&output, 1);

    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    let change = &report["dataplaneChanges"][0];
    assert_eq!(change["path"], "configuration[0].value");
    assert_eq!(change["impact"], "overridable");
}

#[test]
fn test_added_subtree_under_trigger_rule_requires_redeploy() {
    let t = Test::new();
    t.write(
        "old.json",
        r#"{"key": "hubspot", "displayName": "HubSpot", "type": "openapi"}"#,
    );
    t.write(
        "new.json",
        r#"{
  "key": "hubspot",
  "displayName": "HubSpot",
  "type": "openapi",
  "authentication": {"type": "oauth2"},
  "openapi": {"documentKey": "hubspot-v3"}
}"#,
    );

    let output = t.run(&[
        "diff",
        "old.json",
        "new.json",
        "--kind",
        "external-system",
        "--json",
    ]);
    assert_exit_code(&output, 1);

    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["requiresRedeploy"], true);

    let openapi = report["dataplaneChanges"]
        .as_array()
        .unwrap()
        .iter()
        .find(|c| c["path"] == "openapi")
        .expect("openapi subtree reported");
    assert_eq!(openapi["impact"], "trigger");
}

#[test]
fn test_appended_configuration_item_is_overridable() {
    let t = Test::new();
    t.write("old.json", MINIMAL_DESCRIPTOR);
    t.write(
        "new.json",
        &MINIMAL_DESCRIPTOR.replace(
            "\"location\": \"variable\"}]",
            "\"location\": \"variable\"}, {\"name\": \"REGION\", \"value\": \"eu\", \"location\": \"variable\"}]",
        ),
    );

    let output = t.run(&["diff", "old.json", "new.json", "--json"]);
    assert_exit_code(&output, 1);

    let report: Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["requiresRedeploy"], false);

    let change = &report["dataplaneChanges"][0];
    assert_eq!(change["path"], "configuration[1]");
    assert_eq!(change["impact"], "overridable");
}

#[test]
fn test_invalid_rules_file_fails() {
    let t = Test::new();
    t.write("old.json", DATASOURCE);
    t.write("new.json", DATASOURCE);
    t.write("rules.json", r#"{"application": {"triggerPaths": "key"}}"#);

    let output = t.run(&["diff", "old.json", "new.json", "--rules", "rules.json"]);
    assert_exit_code(&output, 1);
    assert_stderr_contains(&output, "invalid rule table");
}

#[test]
fn test_missing_document_fails() {
    let t = Test::new();
    t.write("old.json", DATASOURCE);

    let output = t.diff("old.json", "absent.json");
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");
}
