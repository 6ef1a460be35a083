//! Descriptor type.
//!
//! The canonical, schema-validated deployment descriptor of an application.
//! Construction always goes through the schema validator first, so code
//! holding a `Descriptor` never has to check for missing keys.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{ConfigurationItem, ImageReference, Permission, RbacDocument, Role};
use crate::core::deployment_key;
use crate::core::schema::{SchemaKind, SchemaValidator};
use crate::core::validation;
use crate::error::{self, FormatError, Result, ValidationError};

/// Merge-time field that sits outside the application schema.
const DEPLOYMENT_KEY_FIELD: &str = "deploymentKey";

/// Kind of deployable unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppType {
    Webapp,
    External,
}

impl AppType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Webapp => "webapp",
            Self::External => "external",
        }
    }
}

/// A database the application needs provisioned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Database {
    pub name: String,
}

/// Health check settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthCheck {
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval: Option<u64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Authentication settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Authentication {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(rename = "enableSSO", default, skip_serializing_if = "Option::is_none")]
    pub enable_sso: Option<bool>,
    #[serde(rename = "requiredRoles", default, skip_serializing_if = "Vec::is_empty")]
    pub required_roles: Vec<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Local build settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub env_output_path: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Canonical deployment descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub key: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub app_type: AppType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default)]
    pub requires_database: bool,
    #[serde(default)]
    pub requires_redis: bool,
    #[serde(default)]
    pub requires_storage: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub databases: Vec<Database>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildConfig>,
    #[serde(default)]
    pub configuration: Vec<ConfigurationItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaling: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub front_door_routing: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployment_key: Option<String>,
}

impl Descriptor {
    /// Load and validate a descriptor from a JSON file.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the file does not exist
    /// - `Format` if it is not valid JSON or does not fit the typed model
    /// - `Validation` if it violates the application schema or invariants
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading descriptor");

        let contents = error::read_to_string(path)?;
        Self::parse(&path.display().to_string(), &contents)
    }

    /// Parse and validate a descriptor from JSON text.
    pub fn parse(source_name: &str, contents: &str) -> Result<Self> {
        let value: Value =
            serde_json::from_str(contents).map_err(|e| FormatError::json(source_name, &e))?;
        Self::from_value(source_name, value)
    }

    /// Validate a raw document and build the typed descriptor.
    ///
    /// A `deploymentKey` stamped by merge is checked on its own and kept;
    /// the rest of the document must satisfy the application schema.
    pub fn from_value(source_name: &str, mut value: Value) -> Result<Self> {
        let deployment_key = Self::take_deployment_key(&mut value)?;
        SchemaValidator::new(SchemaKind::Application)?.ensure_valid(&value)?;

        let mut descriptor: Self =
            serde_json::from_value(value).map_err(|e| FormatError::json(source_name, &e))?;
        descriptor.check_invariants()?;
        descriptor.deployment_key = deployment_key;

        debug!(
            key = %descriptor.key,
            items = descriptor.configuration.len(),
            "descriptor loaded"
        );
        Ok(descriptor)
    }

    /// Detach the `deploymentKey` field from a raw document.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::InvalidKey` if the field is present but is
    /// not 64 hex characters.
    pub fn take_deployment_key(value: &mut Value) -> Result<Option<String>> {
        let Some(raw) = value
            .as_object_mut()
            .and_then(|doc| doc.remove(DEPLOYMENT_KEY_FIELD))
        else {
            return Ok(None);
        };

        match raw.as_str() {
            Some(key) if deployment_key::is_valid_key(key) => Ok(Some(key.to_string())),
            _ => Err(ValidationError::InvalidKey {
                key: DEPLOYMENT_KEY_FIELD.to_string(),
                reason: "must be 64 hexadecimal characters".to_string(),
            }
            .into()),
        }
    }

    /// Invariants beyond the schema: safe key, unique variable names.
    pub fn check_invariants(&self) -> Result<()> {
        validation::validate_app_key(&self.key)?;
        validation::validate_configuration(&self.configuration)
    }

    /// The parsed image reference, if the descriptor names an image.
    pub fn image_reference(&self) -> Option<ImageReference> {
        self.image.as_deref().map(ImageReference::parse)
    }

    /// Roles and permissions carried by this descriptor.
    pub fn rbac(&self) -> RbacDocument {
        RbacDocument::new(self.roles.clone(), self.permissions.clone())
    }

    /// Pretty JSON with a trailing newline.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut out = serde_json::to_string_pretty(self).map_err(|e| FormatError::Serialize {
            what: "descriptor",
            message: e.to_string(),
        })?;
        out.push('\n');
        Ok(out)
    }
}
