//! Deployment rule table.
//!
//! Declares, per descriptor kind, which field paths force a full redeploy
//! (`triggerPaths`) and which may be changed in place (`overridablePaths`).
//! Loaded once, never mutated, and passed explicitly to the classifier.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::core::schema::SchemaKind;
use crate::error::{self, Error, FormatError, Result, ValidationError};

const BUILTIN_RULES: &str = include_str!("deployment-rules.json");

/// Array index placeholder used in rule paths.
pub const WILDCARD: &str = "items";

/// Kind of descriptor a rule entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DescriptorKind {
    Application,
    ExternalSystem,
    ExternalDataSource,
}

impl DescriptorKind {
    pub const ALL: [DescriptorKind; 3] = [
        Self::Application,
        Self::ExternalSystem,
        Self::ExternalDataSource,
    ];

    /// Section name in the rule table document.
    pub fn section(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::ExternalSystem => "externalSystem",
            Self::ExternalDataSource => "externalDataSource",
        }
    }

    /// Schema documents of this kind are validated against.
    pub fn schema(self) -> SchemaKind {
        match self {
            Self::Application => SchemaKind::Application,
            Self::ExternalSystem => SchemaKind::ExternalSystem,
            Self::ExternalDataSource => SchemaKind::ExternalDataSource,
        }
    }
}

impl fmt::Display for DescriptorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

impl FromStr for DescriptorKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "application" => Ok(Self::Application),
            "externalSystem" | "external-system" => Ok(Self::ExternalSystem),
            "externalDataSource" | "external-datasource" => Ok(Self::ExternalDataSource),
            other => Err(Error::Argument(format!("unknown descriptor kind '{}'", other))),
        }
    }
}

/// Deployment impact of a changed path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    /// Any change requires a full redeploy.
    Trigger,
    /// May be changed without a redeploy.
    Overridable,
    /// Not covered by the rule table. Reported, never blocking.
    Unclassified,
}

impl Impact {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Trigger => "trigger",
            Self::Overridable => "overridable",
            Self::Unclassified => "unclassified",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Trigger and overridable paths of one descriptor kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleEntry {
    trigger_paths: Vec<String>,
    overridable_paths: Vec<String>,
}

impl RuleEntry {
    pub fn new<T, O>(trigger_paths: T, overridable_paths: O) -> Self
    where
        T: IntoIterator,
        T::Item: Into<String>,
        O: IntoIterator,
        O::Item: Into<String>,
    {
        Self {
            trigger_paths: trigger_paths.into_iter().map(Into::into).collect(),
            overridable_paths: overridable_paths.into_iter().map(Into::into).collect(),
        }
    }

    pub fn trigger_paths(&self) -> &[String] {
        &self.trigger_paths
    }

    pub fn overridable_paths(&self) -> &[String] {
        &self.overridable_paths
    }

    /// Classify a normalized path (array indices already replaced by `items`).
    ///
    /// A rule applies to a path when the rule is the path, an ancestor of it,
    /// or lies beneath it. The last case arises when a whole subtree is added,
    /// removed or replaced. Trigger rules are checked first.
    pub fn impact_of(&self, normalized: &str) -> Impact {
        let applies = |rule: &String| covers(rule, normalized) || covers(normalized, rule);
        if self.trigger_paths.iter().any(applies) {
            Impact::Trigger
        } else if self.overridable_paths.iter().any(applies) {
            Impact::Overridable
        } else {
            Impact::Unclassified
        }
    }

    /// Union of two entries, keeping first-seen order.
    pub fn union(&self, other: &RuleEntry) -> RuleEntry {
        let merge = |a: &[String], b: &[String]| {
            let mut out = a.to_vec();
            for path in b {
                if !out.contains(path) {
                    out.push(path.clone());
                }
            }
            out
        };
        RuleEntry {
            trigger_paths: merge(&self.trigger_paths, &other.trigger_paths),
            overridable_paths: merge(&self.overridable_paths, &other.overridable_paths),
        }
    }
}

/// Whether `prefix` equals `path` or is a segment-wise ancestor of it.
/// A `*` segment on either side matches any single segment. The empty path
/// is the document root and covers everything.
fn covers(prefix: &str, path: &str) -> bool {
    if prefix.is_empty() {
        return true;
    }
    let mut path_segments = path.split('.');
    for prefix_segment in prefix.split('.') {
        match path_segments.next() {
            Some(segment)
                if prefix_segment == "*" || segment == "*" || prefix_segment == segment => {}
            _ => return false,
        }
    }
    true
}

/// The full rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleTable {
    application: RuleEntry,
    external_system: RuleEntry,
    external_datasource: RuleEntry,
}

impl RuleTable {
    /// The built-in rule table.
    pub fn builtin() -> Result<Self> {
        Self::parse("built-in deployment rules", BUILTIN_RULES)
    }

    /// Load a rule table from a JSON file.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file is absent
    /// - `Format` if it is not JSON
    /// - `Validation` if its shape is wrong
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = error::read_to_string(path)?;
        Self::parse(&path.display().to_string(), &contents)
    }

    /// The table at `path` if given, otherwise the built-in one.
    pub fn load_or_builtin(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Self::builtin(),
        }
    }

    pub fn parse(source_name: &str, contents: &str) -> Result<Self> {
        let raw: Value =
            serde_json::from_str(contents).map_err(|e| FormatError::json(source_name, &e))?;
        let table = Self::from_value(&raw)?;
        debug!(source = source_name, "rule table loaded");
        Ok(table)
    }

    /// Build a table from a raw document.
    ///
    /// The document must have exactly the three sections `application`,
    /// `externalSystem` and `externalDataSource`, each holding non-empty
    /// `triggerPaths` and `overridablePaths` arrays of non-empty strings.
    pub fn from_value(raw: &Value) -> Result<Self> {
        let obj = raw
            .as_object()
            .ok_or_else(|| rule_error("document must be an object".to_string()))?;

        if let Some(extra) = obj
            .keys()
            .find(|k| !DescriptorKind::ALL.iter().any(|kind| kind.section() == k.as_str()))
        {
            return Err(rule_error(format!("unexpected section '{}'", extra)));
        }

        let entry = |kind: DescriptorKind| -> Result<RuleEntry> {
            let section = kind.section();
            let value = obj
                .get(section)
                .ok_or_else(|| rule_error(format!("missing section '{}'", section)))?;
            Ok(RuleEntry {
                trigger_paths: path_list(section, "triggerPaths", value)?,
                overridable_paths: path_list(section, "overridablePaths", value)?,
            })
        };

        Ok(Self {
            application: entry(DescriptorKind::Application)?,
            external_system: entry(DescriptorKind::ExternalSystem)?,
            external_datasource: entry(DescriptorKind::ExternalDataSource)?,
        })
    }

    pub fn entry(&self, kind: DescriptorKind) -> &RuleEntry {
        match kind {
            DescriptorKind::Application => &self.application,
            DescriptorKind::ExternalSystem => &self.external_system,
            DescriptorKind::ExternalDataSource => &self.external_datasource,
        }
    }

    /// Rule scope that decides whether a change concerns the dataplane.
    pub fn dataplane_scope(&self) -> RuleEntry {
        self.application.union(&self.external_datasource)
    }
}

fn rule_error(message: String) -> Error {
    ValidationError::RuleTable(message).into()
}

fn path_list(section: &str, field: &str, value: &Value) -> Result<Vec<String>> {
    let items = value
        .get(field)
        .and_then(Value::as_array)
        .ok_or_else(|| rule_error(format!("'{}.{}' must be an array", section, field)))?;

    if items.is_empty() {
        return Err(rule_error(format!("'{}.{}' must not be empty", section, field)));
    }

    items
        .iter()
        .map(|item| match item.as_str() {
            Some(path) if !path.trim().is_empty() => Ok(path.to_string()),
            _ => Err(rule_error(format!(
                "'{}.{}' must contain non-empty strings",
                section, field
            ))),
        })
        .collect()
}
