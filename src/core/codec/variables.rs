//! Variables document artifact.
//!
//! The structured, human-edited half of a decomposed descriptor. Its exact
//! bytes are what the deployment key is derived from, so serialization must
//! be deterministic: fixed field order, sorted maps, absent optionals
//! omitted rather than written as null.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::domain::{
    is_required, AppType, Authentication, BuildConfig, Database, Descriptor, HealthCheck,
    ImageReference, Permission, Role,
};
use crate::error::{FormatError, Result, ValidationError};

/// `variables.yaml`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variables {
    pub app: AppSection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default)]
    pub requires: Requires,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<HealthCheck>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<Authentication>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build: Option<BuildConfig>,
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
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
    /// Explicit `required` flags that differ from the name heuristic.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub required: BTreeMap<String, bool>,
    /// Raw portal metadata per variable; validated on merge.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub portal_inputs: BTreeMap<String, Value>,
}

/// `app:` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSection {
    pub key: String,
    pub display_name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub app_type: AppType,
}

/// `image:` section. `registry` is written as null when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSection {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub registry: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_mode: Option<String>,
}

/// `requires:` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Requires {
    #[serde(default)]
    pub database: bool,
    #[serde(default)]
    pub redis: bool,
    #[serde(default)]
    pub storage: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub databases: Vec<Database>,
}

impl ImageSection {
    fn from_descriptor(descriptor: &Descriptor) -> Option<Self> {
        let image = descriptor.image_reference();
        if image.is_none() && descriptor.registry_mode.is_none() {
            return None;
        }
        let image = image.unwrap_or_else(|| ImageReference::from_parts(None, None, None));

        Some(Self {
            name: image.name,
            registry: image.registry,
            tag: Some(image.tag),
            registry_mode: descriptor.registry_mode.clone(),
        })
    }

    /// Reassembled `registry/name:tag`, if a name is present.
    pub fn reference(&self) -> Option<String> {
        self.name.as_deref()?;
        let image = ImageReference::from_parts(
            self.registry.as_deref(),
            self.name.as_deref(),
            self.tag.as_deref(),
        );
        Some(image.to_string())
    }
}

impl Variables {
    /// Extract the variables document from a descriptor.
    pub fn from_descriptor(descriptor: &Descriptor) -> Result<Self> {
        let mut portal_inputs = BTreeMap::new();
        let mut required = BTreeMap::new();
        for item in &descriptor.configuration {
            if item.required != is_required(&item.name, item.location) {
                required.insert(item.name.clone(), item.required);
            }
            if let Some(portal) = &item.portal_input {
                let raw = serde_json::to_value(portal).map_err(|e| FormatError::Serialize {
                    what: "portalInput",
                    message: e.to_string(),
                })?;
                portal_inputs.insert(item.name.clone(), raw);
            }
        }

        Ok(Self {
            app: AppSection {
                key: descriptor.key.clone(),
                display_name: descriptor.display_name.clone(),
                description: descriptor.description.clone(),
                app_type: descriptor.app_type,
            },
            image: ImageSection::from_descriptor(descriptor),
            port: descriptor.port,
            requires: Requires {
                database: descriptor.requires_database,
                redis: descriptor.requires_redis,
                storage: descriptor.requires_storage,
                databases: descriptor.databases.clone(),
            },
            health_check: descriptor.health_check.clone(),
            authentication: descriptor.authentication.clone(),
            build: descriptor.build.clone(),
            repository: descriptor.repository.clone(),
            startup_command: descriptor.startup_command.clone(),
            runtime_version: descriptor.runtime_version.clone(),
            scaling: descriptor.scaling.clone(),
            front_door_routing: descriptor.front_door_routing.clone(),
            roles: Vec::new(),
            permissions: Vec::new(),
            required,
            portal_inputs,
        })
    }

    /// Parse a variables document.
    ///
    /// # Errors
    ///
    /// - `Format` if the text is not YAML or does not fit the document layout
    /// - `Validation` if the `app` section is missing
    pub fn parse(source_name: &str, contents: &str) -> Result<Self> {
        let raw: Value =
            serde_yaml_ng::from_str(contents).map_err(|e| FormatError::yaml(source_name, &e))?;

        if !raw.get("app").is_some_and(Value::is_object) {
            return Err(ValidationError::MissingSection("app").into());
        }

        serde_json::from_value(raw).map_err(|e| {
            FormatError::Yaml {
                source_name: source_name.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Serialize to YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml_ng::to_string(self).map_err(|e| {
            FormatError::Serialize {
                what: "variables",
                message: e.to_string(),
            }
            .into()
        })
    }
}
