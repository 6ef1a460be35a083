//! Deployment key derivation.
//!
//! A deployment key is the lowercase hex SHA-256 of the exact bytes of the
//! canonical variables artifact. It travels next to the descriptor as an
//! integrity and idempotency token.

use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{self, Error, Result};

/// Length of a deployment key in hex characters.
pub const KEY_LEN: usize = 64;

/// Derive the deployment key of `bytes`.
pub fn derive_key(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Derive the deployment key of a file's content.
///
/// # Errors
///
/// Returns `Argument` for an empty path and `NotFound` if the file is absent.
pub fn derive_key_from_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(Error::Argument("artifact path cannot be empty".to_string()));
    }

    let bytes = error::read(path)?;
    let key = derive_key(&bytes);
    debug!(path = %path.display(), bytes = bytes.len(), "derived deployment key");
    Ok(key)
}

/// Whether `candidate` is a well-formed deployment key (64 hex chars, any case).
pub fn is_valid_key(candidate: &str) -> bool {
    candidate.len() == KEY_LEN && candidate.bytes().all(|b| b.is_ascii_hexdigit())
}
