//! Schema validation.
//!
//! Validates descriptors and their fragments against the embedded, versioned
//! JSON Schemas. Data-shape violations come back as a [`ValidationReport`];
//! only an unreadable or uncompilable schema is raised as an error.

mod bundle;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, ValidationError};

/// The schemas a document can be validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SchemaKind {
    Application,
    ExternalSystem,
    ExternalDataSource,
    Infrastructure,
}

impl SchemaKind {
    pub const ALL: [SchemaKind; 4] = [
        Self::Application,
        Self::ExternalSystem,
        Self::ExternalDataSource,
        Self::Infrastructure,
    ];

    /// Identifier used in rule tables and error messages.
    pub fn id(self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::ExternalSystem => "externalSystem",
            Self::ExternalDataSource => "externalDataSource",
            Self::Infrastructure => "infrastructure",
        }
    }

    /// File name the schema is published under.
    pub fn file_name(self) -> &'static str {
        match self {
            Self::Application => "application.schema.json",
            Self::ExternalSystem => "external-system.schema.json",
            Self::ExternalDataSource => "external-datasource.schema.json",
            Self::Infrastructure => "infrastructure.schema.json",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.id() == id)
    }

    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.file_name() == name)
    }

    fn source(self) -> &'static str {
        match self {
            Self::Application => include_str!("schemas/application.schema.json"),
            Self::ExternalSystem => include_str!("schemas/external-system.schema.json"),
            Self::ExternalDataSource => include_str!("schemas/external-datasource.schema.json"),
            Self::Infrastructure => include_str!("schemas/infrastructure.schema.json"),
        }
    }

    /// Parse the raw schema document.
    fn load(self) -> Result<Value> {
        serde_json::from_str(self.source()).map_err(|e| {
            ValidationError::InvalidSchema {
                schema: self.id(),
                message: e.to_string(),
            }
            .into()
        })
    }
}

impl std::fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// A single schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// JSON pointer into the instance (`$` for the root).
    pub path: String,
    pub message: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Outcome of validating one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<SchemaViolation>,
}

/// A compiled validator for one schema kind.
pub struct SchemaValidator {
    kind: SchemaKind,
    validator: jsonschema::Validator,
}

impl SchemaValidator {
    /// Bundle and compile the schema for `kind`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidSchema` if the embedded schema cannot be
    /// parsed, references an unknown document, or fails to compile.
    pub fn new(kind: SchemaKind) -> Result<Self> {
        let schema = bundle::bundle(kind)?;
        let validator = jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .build(&schema)
            .map_err(|e| ValidationError::InvalidSchema {
                schema: kind.id(),
                message: e.to_string(),
            })?;

        debug!(schema = kind.id(), "compiled schema");
        Ok(Self { kind, validator })
    }

    pub fn kind(&self) -> SchemaKind {
        self.kind
    }

    /// Validate a document. Never fails for shape violations.
    pub fn validate(&self, instance: &Value) -> ValidationReport {
        let errors: Vec<SchemaViolation> = self
            .validator
            .iter_errors(instance)
            .map(|err| {
                let pointer = err.instance_path.to_string();
                SchemaViolation {
                    path: if pointer.is_empty() {
                        "$".to_string()
                    } else {
                        format!("${}", pointer)
                    },
                    message: err.to_string(),
                }
            })
            .collect();

        debug!(schema = self.kind.id(), errors = errors.len(), "validated document");
        ValidationReport {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Validate a document, raising the first violation.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::Schema` if the document does not conform.
    pub fn ensure_valid(&self, instance: &Value) -> Result<()> {
        let report = self.validate(instance);
        match report.errors.first() {
            None => Ok(()),
            Some(first) => Err(ValidationError::Schema {
                schema: self.kind.id(),
                count: report.errors.len(),
                path: first.path.clone(),
                message: first.message.clone(),
            }
            .into()),
        }
    }
}

/// Validate `instance` against the schema for `kind`.
///
/// # Errors
///
/// Only fails if the schema itself cannot be compiled.
pub fn validate(kind: SchemaKind, instance: &Value) -> Result<ValidationReport> {
    Ok(SchemaValidator::new(kind)?.validate(instance))
}
