//! Key command - deployment key derivation and checking.

use std::path::PathBuf;

use crate::cli::output;
use crate::core::deployment_key;
use crate::error::{Error, Result};

/// Print the deployment key of `file`, or check `candidate`.
pub fn execute(file: Option<PathBuf>, candidate: Option<String>) -> Result<i32> {
    if let Some(candidate) = candidate {
        if deployment_key::is_valid_key(&candidate) {
            output::success("valid deployment key");
            return Ok(0);
        }
        output::error(&format!(
            "not a deployment key: expected {} hex characters",
            deployment_key::KEY_LEN
        ));
        return Ok(1);
    }

    let file = file.ok_or_else(|| Error::Argument("a file or --check is required".to_string()))?;
    println!("{}", deployment_key::derive_key_from_file(&file)?);
    Ok(0)
}
