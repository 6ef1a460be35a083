//! Split command.

use std::path::{Path, PathBuf};

use crate::cli::output;
use crate::core::codec;
use crate::core::config::Config;
use crate::core::domain::Descriptor;
use crate::error::Result;

/// Split a descriptor into artifacts and print the deployment key.
pub fn execute(descriptor_path: &Path, out: Option<PathBuf>) -> Result<i32> {
    let config = Config::load()?;
    let descriptor = Descriptor::load(descriptor_path)?;
    let dir = out.unwrap_or_else(|| config.artifact_dir(&descriptor.key));

    let artifacts = codec::split(&descriptor)?;
    let written = artifacts.write_to(&dir)?;

    output::success(&format!(
        "split {} into {}",
        output::path(&descriptor.key),
        output::path(&dir.display().to_string())
    ));
    for path in &written {
        output::list_item(&path.display().to_string());
    }
    output::kv("deployment key:", artifacts.deployment_key());
    Ok(0)
}
