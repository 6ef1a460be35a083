//! Tests for `fabrix split` and `fabrix merge`.

use crate::support::*;
use serde_json::Value;

fn json(text: &str) -> Value {
    serde_json::from_str(text).expect("valid JSON")
}

#[test]
fn test_split_writes_artifacts() {
    let t = Test::new();
    t.write("application.json", WEBAPP_DESCRIPTOR);

    let output = t.split("application.json", "out");
    assert_success(&output);
    assert_stdout_contains(&output, "deployment key:");

    assert!(t.path("out/env.template").exists());
    assert!(t.path("out/variables.yaml").exists());
    assert!(t.path("out/rbac.yaml").exists());
    assert!(t.path("out/README.md").exists());

    let template = t.read("out/env.template");
    assert!(template.contains("DATABASE_URL=kv://databases-miso-0-urlKeyVault"));
    assert!(template.contains("PORT=3000"));
}

#[test]
fn test_split_defaults_to_builder_directory() {
    let t = Test::new();
    t.write("application.json", MINIMAL_DESCRIPTOR);

    let output = t.run(&["split", "application.json"]);
    assert_success(&output);
    assert!(t.path("builder/myapp/variables.yaml").exists());
    assert!(!t.path("builder/myapp/rbac.yaml").exists());
}

#[test]
fn test_split_honours_configured_builder_directory() {
    let t = Test::new();
    t.write(".fabrix.toml", "[paths]\nbuilder = \"apps\"\n");
    t.write("application.json", MINIMAL_DESCRIPTOR);

    let output = t.run(&["split", "application.json"]);
    assert_success(&output);
    assert!(t.path("apps/myapp/env.template").exists());
}

#[test]
fn test_split_deployment_key_matches_key_command() {
    let t = Test::new();
    t.write("application.json", WEBAPP_DESCRIPTOR);
    assert_success(&t.split("application.json", "out"));

    let output = t.run(&["key", "out/variables.yaml"]);
    assert_success(&output);
    let key = stdout(&output).trim().to_string();
    assert_eq!(key.len(), 64);

    let split_again = t.split("application.json", "out");
    assert_stdout_contains(&split_again, &key);
}

#[test]
fn test_split_then_merge_restores_descriptor() {
    let t = Test::new();
    t.write("application.json", WEBAPP_DESCRIPTOR);
    assert_success(&t.split("application.json", "out"));

    let output = t.merge("out", "merged.json");
    assert_success(&output);

    let original = json(WEBAPP_DESCRIPTOR);
    let mut merged = json(&t.read("merged.json"));
    let key = merged
        .as_object_mut()
        .unwrap()
        .remove("deploymentKey")
        .expect("merged descriptor carries a deployment key");
    assert_eq!(key.as_str().unwrap().len(), 64);

    assert_eq!(merged["key"], original["key"]);
    assert_eq!(merged["image"], original["image"]);
    assert_eq!(merged["port"], original["port"]);
    let names = |doc: &Value| -> Vec<(Value, Value, Value)> {
        doc["configuration"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| {
                (
                    item["name"].clone(),
                    item["value"].clone(),
                    item["location"].clone(),
                )
            })
            .collect()
    };
    assert_eq!(names(&merged), names(&original));
    assert_eq!(merged["configuration"][0]["required"], true);
    assert_eq!(merged["roles"], original["roles"]);
    assert_eq!(merged["permissions"], original["permissions"]);
    assert_eq!(merged["authentication"], original["authentication"]);
}

#[test]
fn test_merge_defaults_output_into_directory() {
    let t = Test::new();
    t.write("application.json", MINIMAL_DESCRIPTOR);
    assert_success(&t.split("application.json", "out"));

    let output = t.run(&["merge", "out"]);
    assert_success(&output);

    let merged = json(&t.read("out/application.json"));
    assert_eq!(merged["image"], "myapp:latest");
}

#[test]
fn test_merge_applies_edited_template() {
    let t = Test::new();
    t.write("application.json", MINIMAL_DESCRIPTOR);
    assert_success(&t.split("application.json", "out"));
    t.write(
        "out/env.template",
        "NODE_ENV=staging\nAPI_TOKEN=kv://api-token\n",
    );

    assert_success(&t.merge("out", "merged.json"));
    let merged = json(&t.read("merged.json"));
    let items = merged["configuration"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["value"], "staging");
    assert_eq!(items[1]["location"], "keyvault");
    assert_eq!(items[1]["required"], true);
}

#[test]
fn test_merge_with_portal_inputs() {
    let t = Test::new();
    t.write("application.json", MINIMAL_DESCRIPTOR);
    assert_success(&t.split("application.json", "out"));
    t.write(
        "portal.json",
        r#"{"NODE_ENV": {"field": "select", "label": "Environment", "options": ["production", "staging"]}}"#,
    );

    let output = t.run(&[
        "merge",
        "out",
        "--out",
        "merged.json",
        "--portal-inputs",
        "portal.json",
    ]);
    assert_success(&output);

    let merged = json(&t.read("merged.json"));
    assert_eq!(
        merged["configuration"][0]["portalInput"]["label"],
        "Environment"
    );
}

#[test]
fn test_merge_missing_variables_fails() {
    let t = Test::new();
    t.write("out/env.template", "PORT=3000\n");

    let output = t.merge("out", "merged.json");
    assert_failure(&output);
    assert_stderr_contains(&output, "not found");
    assert!(!t.path("merged.json").exists());
}
