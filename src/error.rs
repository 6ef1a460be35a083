//! Error types for fabrix.
//!
//! Every failure the core can raise falls into one of five kinds:
//! a missing source file, unparseable content, content that parses but breaks
//! an invariant, an encryption failure, or a bad caller-supplied argument.
//! Config and I/O errors wrap the ambient layers around the core.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    /// A required source file or artifact is absent.
    #[error("not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// A caller-supplied parameter violates a documented precondition.
    #[error("invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Content could not be parsed as the expected structured format.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("invalid JSON in {source_name}: {message}")]
    Json {
        source_name: String,
        message: String,
    },

    #[error("invalid YAML in {source_name}: {message}")]
    Yaml {
        source_name: String,
        message: String,
    },

    #[error("failed to serialize {what}: {message}")]
    Serialize { what: &'static str, message: String },
}

impl FormatError {
    pub fn json(source_name: impl Into<String>, err: &serde_json::Error) -> Self {
        Self::Json {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }

    pub fn yaml(source_name: impl Into<String>, err: &serde_yaml_ng::Error) -> Self {
        Self::Yaml {
            source_name: source_name.into(),
            message: err.to_string(),
        }
    }
}

/// Content parsed but violates a schema or structural invariant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("schema '{schema}' rejected document: {count} error(s), first at {path}: {message}")]
    Schema {
        schema: &'static str,
        count: usize,
        path: String,
        message: String,
    },

    #[error("invalid schema '{schema}': {message}")]
    InvalidSchema {
        schema: &'static str,
        message: String,
    },

    #[error("missing required section '{0}'")]
    MissingSection(&'static str),

    #[error("invalid key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("duplicate configuration item '{0}'")]
    DuplicateItem(String),

    #[error("variable '{0}' has a kv:// value; use location 'keyvault' instead")]
    ReservedValue(String),

    #[error("invalid portalInput for '{variable}': {reason}")]
    PortalInput { variable: String, reason: String },

    #[error("invalid rule table: {0}")]
    RuleTable(String),

    #[error("invalid permissions on {path}: expected {expected}, found {actual}")]
    InvalidPermissions {
        path: String,
        expected: String,
        actual: String,
    },
}

/// Encryption or decryption failed. Never carries partial plaintext.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid secret key: {0}")]
    InvalidKey(String),

    #[error("value is not sealed (missing secure:// prefix)")]
    MissingPrefix,

    #[error("malformed sealed value: {0}")]
    Malformed(String),

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed: authentication tag mismatch")]
    DecryptionFailed,

    #[error("no secret key configured")]
    NoKey,
}

/// `.fabrix.toml` errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to parse .fabrix.toml: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("refusing to overwrite existing {}", .0.display())]
    AlreadyExists(PathBuf),
}

impl Error {
    /// Build a `NotFound` for a path.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Read a file, mapping a missing file to [`Error::NotFound`].
pub(crate) fn read_to_string(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::not_found(path)
        } else {
            Error::Io(e)
        }
    })
}

/// Read a file as bytes, mapping a missing file to [`Error::NotFound`].
pub(crate) fn read(path: &std::path::Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::not_found(path)
        } else {
            Error::Io(e)
        }
    })
}
