//! Cross-document `$ref` resolution.
//!
//! The embedded schemas reference each other by file name
//! (`application.schema.json#/definitions/configurationItem`). Bundling copies
//! every referenced document under the root's `$defs` and rewrites references
//! into local JSON pointers, so the result compiles as a single document with
//! no retrieval. Draft markers (`$schema`, `$id`) are stripped along the way so
//! draft-07 and 2020-12 documents compile under one dialect.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use super::SchemaKind;
use crate::error::{Result, ValidationError};

/// Container under `$defs` holding embedded documents.
const BUNDLE_PREFIX: &str = "bundled.";

/// Bundle `root` and everything it references into one schema document.
pub(super) fn bundle(root: SchemaKind) -> Result<Value> {
    let mut embedded = Map::new();
    let mut seen = BTreeSet::new();
    seen.insert(root);

    let mut doc = strip_markers(root.load()?);
    rewrite_refs(&mut doc, root, None, &mut seen, &mut embedded)?;

    if !embedded.is_empty() {
        let obj = doc.as_object_mut().ok_or_else(|| invalid(root, "root is not an object"))?;
        let defs = obj
            .entry("$defs")
            .or_insert_with(|| Value::Object(Map::new()))
            .as_object_mut()
            .ok_or_else(|| invalid(root, "'$defs' is not an object"))?;
        defs.extend(embedded);
    }

    Ok(doc)
}

/// Rewrite every `$ref` in `node`.
///
/// `within` names the embedded document `node` belongs to, or `None` for the
/// root. Local references inside an embedded document are re-anchored under
/// its `$defs` slot.
fn rewrite_refs(
    node: &mut Value,
    root: SchemaKind,
    within: Option<SchemaKind>,
    seen: &mut BTreeSet<SchemaKind>,
    embedded: &mut Map<String, Value>,
) -> Result<()> {
    match node {
        Value::Object(obj) => {
            if let Some(Value::String(reference)) = obj.get_mut("$ref") {
                *reference = resolve_ref(reference, root, within, seen, embedded)?;
            }
            for (key, child) in obj.iter_mut() {
                if key != "$ref" {
                    rewrite_refs(child, root, within, seen, embedded)?;
                }
            }
        }
        Value::Array(items) => {
            for child in items {
                rewrite_refs(child, root, within, seen, embedded)?;
            }
        }
        _ => {}
    }
    Ok(())
}

fn resolve_ref(
    reference: &str,
    root: SchemaKind,
    within: Option<SchemaKind>,
    seen: &mut BTreeSet<SchemaKind>,
    embedded: &mut Map<String, Value>,
) -> Result<String> {
    let (file, fragment) = match reference.split_once('#') {
        Some((file, fragment)) => (file, fragment),
        None => (reference, ""),
    };

    let target = if file.is_empty() {
        match within {
            None => return Ok(reference.to_string()),
            Some(kind) => kind,
        }
    } else {
        let file = file.rsplit('/').next().unwrap_or(file);
        SchemaKind::from_file_name(file).ok_or_else(|| {
            invalid(
                root,
                &format!("unresolvable reference '{}'", reference),
            )
        })?
    };

    if target == root {
        return Ok(format!("#{}", fragment));
    }

    if seen.insert(target) {
        let mut doc = strip_markers(target.load()?);
        rewrite_refs(&mut doc, root, Some(target), seen, embedded)?;
        embedded.insert(slot(target), doc);
    }

    Ok(format!("#/$defs/{}{}", slot(target), fragment))
}

fn slot(kind: SchemaKind) -> String {
    format!("{}{}", BUNDLE_PREFIX, kind.id())
}

fn strip_markers(mut doc: Value) -> Value {
    if let Some(obj) = doc.as_object_mut() {
        obj.remove("$schema");
        obj.remove("$id");
    }
    doc
}

fn invalid(kind: SchemaKind, message: &str) -> crate::error::Error {
    ValidationError::InvalidSchema {
        schema: kind.id(),
        message: message.to_string(),
    }
    .into()
}
