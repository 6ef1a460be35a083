//! RBAC document type.
//!
//! Roles and permissions, either carried by a descriptor or authored as a
//! separate artifact.

use serde::{Deserialize, Serialize};

/// A role exposed by an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub groups: Option<Vec<String>>,
}

/// A permission granted to a set of role values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    pub name: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub description: String,
}

/// Roles and permissions of an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RbacDocument {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<Role>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
}

impl RbacDocument {
    pub fn new(roles: Vec<Role>, permissions: Vec<Permission>) -> Self {
        Self { roles, permissions }
    }

    /// Whether there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.permissions.is_empty()
    }

    /// Resolve descriptor-owned RBAC against an authored artifact.
    ///
    /// Each array is decided on its own: the descriptor's array wins when it is
    /// non-empty, otherwise the artifact's array fills the gap. An absent
    /// artifact is treated as empty.
    pub fn resolve(owned: RbacDocument, artifact: Option<RbacDocument>) -> RbacDocument {
        let artifact = artifact.unwrap_or_default();

        let roles = if owned.roles.is_empty() {
            artifact.roles
        } else {
            owned.roles
        };
        let permissions = if owned.permissions.is_empty() {
            artifact.permissions
        } else {
            owned.permissions
        };

        RbacDocument { roles, permissions }
    }
}
