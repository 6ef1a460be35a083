//! Validate command.

use std::path::Path;

use serde_json::Value;

use crate::cli::{output, SchemaArg};
use crate::core::domain::{Descriptor, ExternalManifest};
use crate::core::schema;
use crate::error::{self, FormatError, Result};

/// Validate a JSON document. Returns 1 when it is invalid.
pub fn execute(file: &Path, schema_arg: SchemaArg) -> Result<i32> {
    let source_name = file.display().to_string();
    let contents = error::read_to_string(file)?;
    let document: Value =
        serde_json::from_str(&contents).map_err(|e| FormatError::json(&source_name, &e))?;

    let Some(kind) = schema_arg.schema() else {
        let manifest = ExternalManifest::from_value(document)?;
        output::success(&format!(
            "{} is a valid external manifest ({} data source(s))",
            output::path(&source_name),
            manifest.data_sources.len()
        ));
        return Ok(0);
    };

    let mut checked = document.clone();
    if kind == schema::SchemaKind::Application {
        Descriptor::take_deployment_key(&mut checked)?;
    }

    let report = schema::validate(kind, &checked)?;
    if !report.valid {
        output::error(&format!(
            "{} failed {} validation",
            output::path(&source_name),
            kind
        ));
        for violation in &report.errors {
            output::list_item(&violation.to_string());
        }
        return Ok(1);
    }

    // Application descriptors carry invariants beyond the schema.
    if kind == schema::SchemaKind::Application {
        Descriptor::from_value(&source_name, document)?;
    }

    output::success(&format!("{} is a valid {}", output::path(&source_name), kind));
    Ok(0)
}
