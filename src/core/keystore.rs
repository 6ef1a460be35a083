//! Secret key storage.
//!
//! Resolves the vault key from, in order: the `FABRIX_SECRETS_KEY`
//! environment variable, the `[secrets] key_file` configured in
//! `.fabrix.toml`, and `~/.fabrix/secrets.key`.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::config::Config;
use crate::core::constants;
use crate::core::vault::SecretKey;
use crate::error::{self, ConfigError, CryptoError, Error, Result};

/// Key storage manager for vault keys.
pub struct KeyStore;

impl KeyStore {
    /// Default key file (`~/.fabrix/secrets.key`).
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            Error::Argument("unable to determine home directory".to_string())
        })?;
        Ok(home.join(constants::KEY_FILE))
    }

    /// Key file path for a configuration.
    pub fn key_path(config: &Config) -> Result<PathBuf> {
        match config.secrets.key_file.as_deref() {
            Some(configured) => expand_home(configured),
            None => Self::default_path(),
        }
    }

    /// Resolve the vault key, if one is available.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::InvalidKey` if a key is found but malformed.
    pub fn try_resolve(config: &Config) -> Result<Option<SecretKey>> {
        if let Ok(raw) = std::env::var(constants::SECRETS_KEY_ENV) {
            if !raw.trim().is_empty() {
                debug!(source = constants::SECRETS_KEY_ENV, "secret key from environment");
                return SecretKey::parse(&raw).map(Some);
            }
        }

        let path = Self::key_path(config)?;
        match Self::load(&path) {
            Ok(key) => Ok(Some(key)),
            Err(Error::NotFound { .. }) => {
                debug!(path = %path.display(), "no secret key file");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Resolve the vault key.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::NoKey` when no source provides a key.
    pub fn resolve(config: &Config) -> Result<SecretKey> {
        Self::try_resolve(config)?.ok_or_else(|| CryptoError::NoKey.into())
    }

    /// Load a key from a file.
    pub fn load(path: &Path) -> Result<SecretKey> {
        let contents = zeroize::Zeroizing::new(error::read_to_string(path)?);

        #[cfg(unix)]
        {
            if let Err(e) = crate::core::validation::validate_file_permissions(path, 0o600) {
                warn!("{}", e);
            }
        }

        debug!(path = %path.display(), "secret key loaded");
        SecretKey::parse(&contents)
    }

    /// Generate a fresh key and store it at `path` with 0600 permissions.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::AlreadyExists` if a key file exists and `force`
    /// is not set.
    pub fn generate(path: &Path, force: bool) -> Result<SecretKey> {
        if path.exists() && !force {
            return Err(ConfigError::AlreadyExists(path.to_path_buf()).into());
        }

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let key = SecretKey::generate();
        let encoded = key.to_hex();
        write_private(path, format!("{}\n", encoded.as_str()).as_bytes())?;

        debug!(path = %path.display(), "secret key generated");
        Ok(key)
    }
}

fn expand_home(raw: &str) -> Result<PathBuf> {
    match raw.strip_prefix("~/") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| {
                Error::Argument("unable to determine home directory".to_string())
            })?;
            Ok(home.join(rest))
        }
        None => Ok(PathBuf::from(raw)),
    }
}

#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .mode(0o600)
        .open(path)?;
    file.write_all(contents)?;
    file.flush()?;

    fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    Ok(())
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> Result<()> {
    fs::write(path, contents)?;
    Ok(())
}
