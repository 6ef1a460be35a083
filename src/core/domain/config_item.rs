//! Configuration item type.
//!
//! One environment variable binding of a descriptor, with optional portal UI
//! metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Result, ValidationError};

/// Where a configuration value lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Location {
    /// Inline literal value.
    #[default]
    Variable,
    /// Reference to a key vault secret.
    Keyvault,
}

/// A single environment variable binding.
///
/// When `required` is absent from the source document it is derived with
/// [`is_required`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawConfigurationItem")]
pub struct ConfigurationItem {
    pub name: String,
    pub value: String,
    pub location: Location,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portal_input: Option<PortalInput>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawConfigurationItem {
    name: String,
    value: String,
    #[serde(default)]
    location: Location,
    #[serde(default)]
    required: Option<bool>,
    #[serde(default)]
    portal_input: Option<PortalInput>,
}

impl From<RawConfigurationItem> for ConfigurationItem {
    fn from(raw: RawConfigurationItem) -> Self {
        let required = raw
            .required
            .unwrap_or_else(|| is_required(&raw.name, raw.location));
        Self {
            name: raw.name,
            value: raw.value,
            location: raw.location,
            required,
            portal_input: raw.portal_input,
        }
    }
}

impl ConfigurationItem {
    /// Build an item, deriving `required` from the name and location.
    pub fn new(name: impl Into<String>, value: impl Into<String>, location: Location) -> Self {
        let name = name.into();
        let required = is_required(&name, location);
        Self {
            name,
            value: value.into(),
            location,
            required,
            portal_input: None,
        }
    }

    /// Whether the value is a key vault reference.
    pub fn is_keyvault(&self) -> bool {
        self.location == Location::Keyvault
    }
}

/// Substrings that mark a variable name as sensitive.
const SENSITIVE_MARKERS: &[&str] = &["password", "secret", "token", "key"];

/// Decide whether a variable is required.
///
/// Key vault references are always required; otherwise a name containing any
/// sensitive marker (case-insensitive) is.
pub fn is_required(name: &str, location: Location) -> bool {
    if location == Location::Keyvault {
        return true;
    }
    let lower = name.to_ascii_lowercase();
    SENSITIVE_MARKERS.iter().any(|m| lower.contains(m))
}

/// Input widget rendered by the portal for a variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PortalField {
    Password,
    Text,
    Textarea,
    Select,
}

impl PortalField {
    fn parse(raw: &str) -> Option<Self> {
        match raw {
            "password" => Some(Self::Password),
            "text" => Some(Self::Text),
            "textarea" => Some(Self::Textarea),
            "select" => Some(Self::Select),
            _ => None,
        }
    }
}

/// Portal UI metadata attached to a configuration item.
///
/// Deserialization goes through [`PortalInput::from_value`], so a malformed
/// shape never produces a value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Value")]
pub struct PortalInput {
    pub field: PortalField,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub masked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<Map<String, Value>>,
}

impl PortalInput {
    /// Validate raw metadata for `variable` and build a `PortalInput`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::PortalInput` when:
    /// - the metadata is not an object
    /// - `field` or `label` is missing, or `field` is not a known widget
    /// - `options` is missing or empty for `select`, or present otherwise
    /// - `masked` is not a boolean, or `validation` is not an object
    pub fn from_value(variable: &str, raw: &Value) -> Result<Self> {
        let fail = |reason: &str| -> crate::error::Error {
            ValidationError::PortalInput {
                variable: variable.to_string(),
                reason: reason.to_string(),
            }
            .into()
        };

        let obj = raw.as_object().ok_or_else(|| fail("must be an object"))?;

        let field = match obj.get("field") {
            None => return Err(fail("missing required 'field'")),
            Some(Value::String(s)) => PortalField::parse(s).ok_or_else(|| {
                fail("'field' must be one of password, text, textarea, select")
            })?,
            Some(_) => return Err(fail("'field' must be a string")),
        };

        let label = match obj.get("label") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::String(_)) => return Err(fail("'label' must not be empty")),
            Some(_) => return Err(fail("'label' must be a string")),
            None => return Err(fail("missing required 'label'")),
        };

        let placeholder = match obj.get("placeholder") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(_) => return Err(fail("'placeholder' must be a string")),
        };

        let masked = match obj.get("masked") {
            None => None,
            Some(Value::Bool(b)) => Some(*b),
            Some(_) => return Err(fail("'masked' must be a boolean")),
        };

        let options = match (field, obj.get("options")) {
            (PortalField::Select, Some(Value::Array(items))) => {
                if items.is_empty() {
                    return Err(fail("'options' must not be empty for select"));
                }
                let options = items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .ok_or_else(|| fail("'options' must contain only strings"))?;
                Some(options)
            }
            (PortalField::Select, Some(_)) => return Err(fail("'options' must be an array")),
            (PortalField::Select, None) => return Err(fail("'options' is required for select")),
            (_, Some(_)) => return Err(fail("'options' is only allowed for select")),
            (_, None) => None,
        };

        let validation = match obj.get("validation") {
            None => None,
            Some(Value::Object(map)) => Some(map.clone()),
            Some(_) => return Err(fail("'validation' must be an object")),
        };

        Ok(Self {
            field,
            label,
            placeholder,
            masked,
            options,
            validation,
        })
    }
}

impl TryFrom<Value> for PortalInput {
    type Error = crate::error::Error;

    fn try_from(raw: Value) -> Result<Self> {
        Self::from_value("portalInput", &raw)
    }
}
