//! Structural diff and change-impact classification.
//!
//! Walks two descriptor documents path by path and classifies every changed
//! path through a rule table entry. Key order and formatting never produce
//! changes; only values do.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::core::rules::{Impact, RuleEntry, WILDCARD};

/// How a path changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Modified,
}

/// A single changed path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Change {
    path: String,
    #[serde(skip)]
    normalized: String,
    old_value: Option<Value>,
    new_value: Option<Value>,
    impact: Impact,
}

impl Change {
    /// Path in dot notation with array indices, e.g. `configuration[0].value`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path with indices replaced by the wildcard, e.g. `configuration.items.value`.
    pub fn normalized_path(&self) -> &str {
        &self.normalized
    }

    pub fn old_value(&self) -> Option<&Value> {
        self.old_value.as_ref()
    }

    pub fn new_value(&self) -> Option<&Value> {
        self.new_value.as_ref()
    }

    pub fn impact(&self) -> Impact {
        self.impact
    }

    pub fn kind(&self) -> ChangeKind {
        match (&self.old_value, &self.new_value) {
            (None, Some(_)) => ChangeKind::Added,
            (Some(_), None) => ChangeKind::Removed,
            _ => ChangeKind::Modified,
        }
    }

    /// First path segment, without any index.
    pub fn top_level(&self) -> &str {
        self.normalized.split('.').next().unwrap_or_default()
    }
}

/// The classified difference between two documents.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    identical: bool,
    changes: Vec<Change>,
}

impl Classification {
    /// Whether the documents are structurally equal.
    pub fn is_identical(&self) -> bool {
        self.identical
    }

    /// All changes, in document order.
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    /// Only changes of the given impact.
    pub fn with_impact(&self, impact: Impact) -> Vec<&Change> {
        self.changes.iter().filter(|c| c.impact == impact).collect()
    }

    /// Whether any change forces a full redeploy.
    pub fn requires_redeploy(&self) -> bool {
        self.changes.iter().any(|c| c.impact == Impact::Trigger)
    }

    pub fn len(&self) -> usize {
        self.changes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Diff `old` against `new` and classify each change with `rules`.
pub fn classify(old: &Value, new: &Value, rules: &RuleEntry) -> Classification {
    let mut changes = Vec::new();
    walk(String::new(), Some(old), Some(new), rules, &mut changes);

    debug!(
        changes = changes.len(),
        trigger = changes.iter().filter(|c| c.impact == Impact::Trigger).count(),
        "documents classified"
    );

    Classification {
        identical: changes.is_empty(),
        changes,
    }
}

/// Replace array indices with the wildcard segment.
pub fn normalize_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut chars = path.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '[' {
            while chars.next_if(|c| *c != ']').is_some() {}
            chars.next();
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(WILDCARD);
        } else {
            out.push(ch);
        }
    }

    out
}

fn walk(
    path: String,
    old: Option<&Value>,
    new: Option<&Value>,
    rules: &RuleEntry,
    changes: &mut Vec<Change>,
) {
    match (old, new) {
        (Some(Value::Object(a)), Some(Value::Object(b))) => {
            let keys: BTreeSet<&String> = a.keys().chain(b.keys()).collect();
            for key in keys {
                let child = if path.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", path, key)
                };
                walk(child, a.get(key), b.get(key), rules, changes);
            }
        }
        (Some(Value::Array(a)), Some(Value::Array(b))) => {
            for i in 0..a.len().max(b.len()) {
                walk(format!("{}[{}]", path, i), a.get(i), b.get(i), rules, changes);
            }
        }
        (Some(a), Some(b)) if a == b => {}
        (None, None) => {}
        (old, new) => {
            let normalized = normalize_path(&path);
            let impact = rules.impact_of(&normalized);
            changes.push(Change {
                path,
                normalized,
                old_value: old.cloned(),
                new_value: new.cloned(),
                impact,
            });
        }
    }
}
