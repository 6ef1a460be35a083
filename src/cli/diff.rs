//! Diff command - change-impact report between two descriptor versions.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::diff::{self, Change, ChangeKind};
use crate::core::report::ImpactReport;
use crate::core::rules::{DescriptorKind, RuleTable};
use crate::error::{self, FormatError, Result};

/// Compare two documents. Returns 1 when dataplane-relevant changes exist.
pub fn execute(
    old: &Path,
    new: &Path,
    kind: Option<DescriptorKind>,
    rules: Option<PathBuf>,
    json: bool,
) -> Result<i32> {
    let config = Config::load()?;
    let rules_path = rules.or(config.rules.path);
    let table = RuleTable::load_or_builtin(rules_path.as_deref())?;

    let old_doc = read_json(old)?;
    let new_doc = read_json(new)?;
    let kind = kind.unwrap_or_else(|| detect_kind(&new_doc));

    let classification = diff::classify(&old_doc, &new_doc, table.entry(kind));
    let report = ImpactReport::build(&classification, &table);

    if json {
        let rendered = serde_json::to_string_pretty(&report).map_err(|e| FormatError::Serialize {
            what: "report",
            message: e.to_string(),
        })?;
        println!("{}", rendered);
    } else {
        render(&report, kind);
    }

    Ok(report.exit_code())
}

fn read_json(path: &Path) -> Result<Value> {
    let contents = error::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| FormatError::json(path.display().to_string(), &e).into())
}

/// Data sources carry `systemKey`; external systems declare a protocol
/// section without a port. Everything else is an application.
fn detect_kind(document: &Value) -> DescriptorKind {
    let has = |field: &str| document.get(field).is_some();
    if has("systemKey") && has("entityKey") {
        DescriptorKind::ExternalDataSource
    } else if (has("openapi") || has("mcp")) && !has("port") {
        DescriptorKind::ExternalSystem
    } else {
        DescriptorKind::Application
    }
}

fn render(report: &ImpactReport, kind: DescriptorKind) {
    if report.is_identical() {
        output::success(&format!("{} documents are identical", kind));
        return;
    }

    for section in report.sections() {
        output::section(section.title);
        for change in &section.changes {
            print_change(change);
        }
    }

    let total: usize = report.sections().iter().map(|s| s.changes.len()).sum();
    println!();
    output::dimmed(&format!(
        "{} change(s), {} dataplane-relevant",
        total,
        report.dataplane_changes().len()
    ));
    if report.has_dataplane_changes() {
        output::section("Dataplane-relevant changes");
        for change in report.dataplane_changes() {
            output::list_item(change.path());
        }
        println!();
        if report.requires_redeploy() {
            output::warn("full redeploy required");
        } else {
            output::warn("changes can be applied without a redeploy");
        }
    } else {
        output::success("no dataplane-relevant changes");
    }
}

fn print_change(change: &Change) {
    let show = |v: Option<&Value>| v.map_or_else(|| "-".to_string(), Value::to_string);
    let (marker, detail) = match change.kind() {
        ChangeKind::Added => ('+', show(change.new_value())),
        ChangeKind::Removed => ('-', show(change.old_value())),
        ChangeKind::Modified => (
            '~',
            format!("{} → {}", show(change.old_value()), show(change.new_value())),
        ),
    };
    output::change(marker, change.path(), &detail, change.impact().as_str());
}
