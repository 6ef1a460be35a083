//! Change-impact report.
//!
//! Groups classified changes under functional areas and decides whether a
//! comparison found dataplane-relevant differences, which CI callers read
//! from the exit code.

use serde::Serialize;

use crate::core::diff::{Change, Classification};
use crate::core::rules::{Impact, RuleTable};

/// Functional areas by leading path segment, in report order.
pub const FUNCTIONAL_AREAS: [(&str, &str); 5] = [
    ("fieldMappings", "Field Mappings"),
    ("exposed", "Exposed Fields"),
    ("sync", "Sync Configuration"),
    ("openapi", "OpenAPI Configuration"),
    ("mcp", "MCP Configuration"),
];

/// Area for changes outside every functional area.
pub const GENERAL_AREA: &str = "Other";

/// Functional area title for a change.
pub fn functional_area(change: &Change) -> &'static str {
    let top = change.top_level();
    FUNCTIONAL_AREAS
        .iter()
        .find(|(prefix, _)| *prefix == top)
        .map_or(GENERAL_AREA, |(_, title)| *title)
}

/// Changes under one functional area.
#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub title: &'static str,
    pub changes: Vec<Change>,
}

/// A grouped, CI-ready view of a classification.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImpactReport {
    identical: bool,
    requires_redeploy: bool,
    sections: Vec<Section>,
    dataplane_changes: Vec<Change>,
}

impl ImpactReport {
    /// Build a report.
    ///
    /// A change is dataplane-relevant when it falls under a functional area,
    /// or when the combined application and data source rules classify it.
    pub fn build(classification: &Classification, rules: &RuleTable) -> Self {
        let scope = rules.dataplane_scope();

        let mut sections: Vec<Section> = FUNCTIONAL_AREAS
            .iter()
            .map(|(_, title)| *title)
            .chain(std::iter::once(GENERAL_AREA))
            .map(|title| Section {
                title,
                changes: Vec::new(),
            })
            .collect();
        let mut dataplane_changes = Vec::new();

        for change in classification.changes() {
            let area = functional_area(change);
            if let Some(section) = sections.iter_mut().find(|s| s.title == area) {
                section.changes.push(change.clone());
            }

            let in_area = area != GENERAL_AREA;
            if in_area || scope.impact_of(change.normalized_path()) != Impact::Unclassified {
                dataplane_changes.push(change.clone());
            }
        }
        sections.retain(|s| !s.changes.is_empty());

        Self {
            identical: classification.is_identical(),
            requires_redeploy: classification.requires_redeploy(),
            sections,
            dataplane_changes,
        }
    }

    pub fn is_identical(&self) -> bool {
        self.identical
    }

    pub fn requires_redeploy(&self) -> bool {
        self.requires_redeploy
    }

    /// Non-empty sections, in report order.
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, title: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.title == title)
    }

    pub fn dataplane_changes(&self) -> &[Change] {
        &self.dataplane_changes
    }

    pub fn has_dataplane_changes(&self) -> bool {
        !self.dataplane_changes.is_empty()
    }

    /// 0 when nothing dataplane-relevant changed, 1 otherwise.
    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_dataplane_changes())
    }
}
