//! Constants used throughout fabrix.
//!
//! Centralizes file names, value prefixes and environment variable names.

/// Project configuration file name.
pub const CONFIG_FILE: &str = ".fabrix.toml";

/// Environment template artifact.
pub const ENV_TEMPLATE_FILE: &str = "env.template";

/// Variables document artifact.
pub const VARIABLES_FILE: &str = "variables.yaml";

/// RBAC document artifact (optional).
pub const RBAC_FILE: &str = "rbac.yaml";

/// Generated documentation artifact.
pub const README_FILE: &str = "README.md";

/// Default name of a merged descriptor.
pub const DESCRIPTOR_FILE: &str = "application.json";

/// Prefix marking a key-vault reference in the environment template.
pub const KV_PREFIX: &str = "kv://";

/// Prefix of a sealed (encrypted) value.
pub const SECURE_PREFIX: &str = "secure://";

/// Environment variable holding the secret key.
pub const SECRETS_KEY_ENV: &str = "FABRIX_SECRETS_KEY";

/// Environment variable controlling log filtering.
pub const LOG_ENV: &str = "FABRIX_LOG";

/// Secret key location relative to HOME (~/.fabrix/secrets.key).
pub const KEY_FILE: &str = ".fabrix/secrets.key";

/// Image tag applied when a reference carries none.
pub const DEFAULT_IMAGE_TAG: &str = "latest";
