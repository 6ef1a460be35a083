//! Descriptor codec.
//!
//! Splits a canonical descriptor into editable artifacts and merges them
//! back. Splitting is deterministic so the deployment key derived from
//! `variables.yaml` is meaningful. Callers must serialize writes to a given
//! artifact directory.

pub mod env;
pub mod readme;
pub mod variables;

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::core::constants::{ENV_TEMPLATE_FILE, RBAC_FILE, README_FILE, VARIABLES_FILE};
use crate::core::deployment_key;
use crate::core::domain::{Descriptor, PortalInput, RbacDocument};
use crate::error::{self, Error, FormatError, Result, ValidationError};

pub use variables::Variables;

/// The decomposed artifacts of one descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    pub env_template: String,
    pub variables: String,
    /// Absent when the descriptor carries no roles or permissions.
    pub rbac: Option<String>,
    pub readme: String,
}

impl ArtifactSet {
    /// Deployment key over the exact bytes of `variables.yaml`.
    pub fn deployment_key(&self) -> String {
        deployment_key::derive_key(self.variables.as_bytes())
    }

    /// Write the artifacts into `dir`, creating it if needed.
    ///
    /// A stale `rbac.yaml` is removed when the set carries none.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(4);
        for (name, contents) in [
            (ENV_TEMPLATE_FILE, &self.env_template),
            (VARIABLES_FILE, &self.variables),
            (README_FILE, &self.readme),
        ] {
            let path = dir.join(name);
            fs::write(&path, contents)?;
            written.push(path);
        }

        let rbac_path = dir.join(RBAC_FILE);
        match &self.rbac {
            Some(rbac) => {
                fs::write(&rbac_path, rbac)?;
                written.push(rbac_path);
            }
            None if rbac_path.exists() => {
                debug!(path = %rbac_path.display(), "removing stale rbac artifact");
                fs::remove_file(&rbac_path)?;
            }
            None => {}
        }

        debug!(dir = %dir.display(), files = written.len(), "artifacts written");
        Ok(written)
    }

    /// Read an artifact set from `dir`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `variables.yaml` or `env.template` is missing.
    /// `rbac.yaml` and `README.md` are optional.
    pub fn read_from(dir: &Path) -> Result<Self> {
        let variables = error::read_to_string(&dir.join(VARIABLES_FILE))?;
        let env_template = error::read_to_string(&dir.join(ENV_TEMPLATE_FILE))?;
        let rbac = read_optional(&dir.join(RBAC_FILE))?;
        let readme = read_optional(&dir.join(README_FILE))?.unwrap_or_default();

        Ok(Self {
            env_template,
            variables,
            rbac,
            readme,
        })
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match error::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(Error::NotFound { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

/// Split a descriptor into artifacts.
pub fn split(descriptor: &Descriptor) -> Result<ArtifactSet> {
    let variables = Variables::from_descriptor(descriptor)?.to_yaml()?;

    let rbac = descriptor.rbac();
    let rbac = if rbac.is_empty() {
        None
    } else {
        Some(
            serde_yaml_ng::to_string(&rbac).map_err(|e| FormatError::Serialize {
                what: "rbac",
                message: e.to_string(),
            })?,
        )
    };

    let artifacts = ArtifactSet {
        env_template: env::render_template(&descriptor.configuration),
        variables,
        rbac,
        readme: readme::render(descriptor),
    };

    info!(
        key = %descriptor.key,
        items = descriptor.configuration.len(),
        rbac = artifacts.rbac.is_some(),
        "descriptor split"
    );
    Ok(artifacts)
}

/// Merge artifacts back into a validated descriptor.
///
/// `portal_inputs` is externally supplied UI metadata keyed by variable name;
/// it overrides entries from `variables.yaml`. Every entry is validated and a
/// malformed one fails the merge. Roles and permissions in `variables.yaml`
/// take priority over `rbac.yaml`, array by array. The result carries the
/// deployment key of the variables artifact.
///
/// # Errors
///
/// - `Format` if an artifact cannot be parsed
/// - `Validation` for invalid portal metadata or a descriptor that fails the
///   application schema
pub fn merge(artifacts: &ArtifactSet, portal_inputs: &BTreeMap<String, Value>) -> Result<Descriptor> {
    let vars = Variables::parse(VARIABLES_FILE, &artifacts.variables)?;
    let mut configuration = env::parse_template(&artifacts.env_template);
    for item in configuration.iter_mut() {
        if let Some(required) = vars.required.get(&item.name) {
            item.required = *required;
        }
    }

    let mut metadata = vars.portal_inputs.clone();
    metadata.extend(portal_inputs.iter().map(|(k, v)| (k.clone(), v.clone())));
    for (variable, raw) in &metadata {
        let portal = PortalInput::from_value(variable, raw)?;
        match configuration.iter_mut().find(|item| &item.name == variable) {
            Some(item) => item.portal_input = Some(portal),
            None => warn!(variable = %variable, "portalInput for unknown variable ignored"),
        }
    }

    let artifact_rbac = artifacts
        .rbac
        .as_deref()
        .map(|contents| {
            serde_yaml_ng::from_str::<RbacDocument>(contents)
                .map_err(|e| FormatError::yaml(RBAC_FILE, &e))
        })
        .transpose()?;
    let rbac = RbacDocument::resolve(
        RbacDocument::new(vars.roles.clone(), vars.permissions.clone()),
        artifact_rbac,
    );

    let image = vars.image.as_ref();
    let descriptor = Descriptor {
        key: vars.app.key,
        display_name: vars.app.display_name,
        description: vars.app.description,
        app_type: vars.app.app_type,
        image: image.and_then(|i| i.reference()),
        registry_mode: image.and_then(|i| i.registry_mode.clone()),
        port: vars.port,
        requires_database: vars.requires.database,
        requires_redis: vars.requires.redis,
        requires_storage: vars.requires.storage,
        databases: vars.requires.databases,
        health_check: vars.health_check,
        authentication: vars.authentication,
        build: vars.build,
        configuration,
        roles: rbac.roles,
        permissions: rbac.permissions,
        repository: vars.repository,
        startup_command: vars.startup_command,
        runtime_version: vars.runtime_version,
        scaling: vars.scaling,
        front_door_routing: vars.front_door_routing,
        deployment_key: Some(artifacts.deployment_key()),
    };

    let raw = serde_json::to_value(&descriptor).map_err(|e| FormatError::Serialize {
        what: "descriptor",
        message: e.to_string(),
    })?;
    let merged = Descriptor::from_value("merged descriptor", raw)?;

    info!(
        key = %merged.key,
        items = merged.configuration.len(),
        "artifacts merged"
    );
    Ok(merged)
}

/// Read an artifact directory and merge it.
pub fn merge_dir(dir: &Path, portal_inputs: &BTreeMap<String, Value>) -> Result<Descriptor> {
    debug!(dir = %dir.display(), "merging artifact directory");
    merge(&ArtifactSet::read_from(dir)?, portal_inputs)
}

/// Load externally supplied portal metadata: a JSON object keyed by variable.
///
/// # Errors
///
/// - `NotFound` if the file is absent
/// - `Format` if it is not JSON
/// - `Validation` if it is not an object of objects
pub fn load_portal_inputs(path: &Path) -> Result<BTreeMap<String, Value>> {
    let source_name = path.display().to_string();
    let contents = error::read_to_string(path)?;
    let raw: Value =
        serde_json::from_str(&contents).map_err(|e| FormatError::json(&source_name, &e))?;

    match raw {
        Value::Object(map) => Ok(map.into_iter().collect()),
        _ => Err(ValidationError::PortalInput {
            variable: source_name,
            reason: "must be an object keyed by variable name".to_string(),
        }
        .into()),
    }
}
