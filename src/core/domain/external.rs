//! External system deployment manifest.
//!
//! Bundles an external system definition (under `application`) with the data
//! sources it exposes. Both parts are validated against their own schemas.

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::core::schema::{SchemaKind, SchemaValidator};
use crate::error::{self, FormatError, Result, ValidationError};

/// A validated external system manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalManifest {
    pub application: Value,
    pub data_sources: Vec<Value>,
}

impl ExternalManifest {
    /// Load and validate a manifest file.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file does not exist
    /// - `Format` if it is not valid JSON
    /// - `Validation` if `application` is missing or either part violates its schema
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = error::read_to_string(path)?;
        let source_name = path.display().to_string();
        let value: Value =
            serde_json::from_str(&contents).map_err(|e| FormatError::json(&source_name, &e))?;
        Self::from_value(value)
    }

    /// Validate a raw manifest document.
    pub fn from_value(mut value: Value) -> Result<Self> {
        let obj = value
            .as_object_mut()
            .ok_or(ValidationError::MissingSection("application"))?;

        let application = match obj.remove("application") {
            Some(app @ Value::Object(_)) => app,
            _ => return Err(ValidationError::MissingSection("application").into()),
        };
        SchemaValidator::new(SchemaKind::ExternalSystem)?.ensure_valid(&application)?;

        let data_sources = match obj.remove("dataSources") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items,
            Some(_) => return Err(ValidationError::MissingSection("dataSources").into()),
        };

        let validator = SchemaValidator::new(SchemaKind::ExternalDataSource)?;
        for source in &data_sources {
            validator.ensure_valid(source)?;
        }

        debug!(data_sources = data_sources.len(), "external manifest loaded");
        Ok(Self {
            application,
            data_sources,
        })
    }

    /// Key of the external system.
    pub fn key(&self) -> Option<&str> {
        self.application.get("key").and_then(Value::as_str)
    }

    /// Find a data source by key.
    pub fn data_source(&self, key: &str) -> Option<&Value> {
        self.data_sources
            .iter()
            .find(|ds| ds.get("key").and_then(Value::as_str) == Some(key))
    }
}
