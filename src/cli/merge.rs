//! Merge command.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::core::codec;
use crate::core::constants::DESCRIPTOR_FILE;
use crate::error::Result;

/// Merge an artifact directory into a descriptor file.
pub fn execute(dir: &Path, out: Option<PathBuf>, portal_inputs: Option<PathBuf>) -> Result<i32> {
    let portal_inputs = match portal_inputs {
        Some(path) => codec::load_portal_inputs(&path)?,
        None => BTreeMap::new(),
    };

    let descriptor = codec::merge_dir(dir, &portal_inputs)?;
    let out = out.unwrap_or_else(|| dir.join(DESCRIPTOR_FILE));
    std::fs::write(&out, descriptor.to_json_pretty()?)?;

    output::success(&format!(
        "merged {} into {}",
        output::path(&descriptor.key),
        output::path(&out.display().to_string())
    ));
    output::kv("configuration:", descriptor.configuration.len());
    if let Some(key) = &descriptor.deployment_key {
        output::kv("deployment key:", key);
    }
    Ok(0)
}
