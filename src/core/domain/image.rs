//! Image reference type.
//!
//! Derived from a single `registry/name:tag` string. Never stored on its own.

use serde::{Deserialize, Serialize};

use crate::core::constants::DEFAULT_IMAGE_TAG;

/// A parsed container image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageReference {
    pub registry: Option<String>,
    pub name: Option<String>,
    pub tag: String,
}

impl ImageReference {
    /// Parse a `registry/name:tag` string.
    ///
    /// The tag is whatever follows the last `:` after the last `/`, and
    /// defaults to `latest`. The leading path segment is a registry host only
    /// when it contains a `.`.
    pub fn parse(reference: &str) -> Self {
        let reference = reference.trim();
        let last_slash = reference.rfind('/').map_or(0, |i| i + 1);

        let (path, tag) = match reference[last_slash..].rfind(':') {
            Some(i) => {
                let split = last_slash + i;
                (&reference[..split], &reference[split + 1..])
            }
            None => (reference, ""),
        };
        let tag = if tag.is_empty() { DEFAULT_IMAGE_TAG } else { tag };

        let (registry, name) = match path.split_once('/') {
            Some((head, rest)) if head.contains('.') => (Some(head), rest),
            _ => (None, path),
        };

        Self {
            registry: registry.map(str::to_string),
            name: (!name.is_empty()).then(|| name.to_string()),
            tag: tag.to_string(),
        }
    }

    /// Build from separately stored parts.
    pub fn from_parts(registry: Option<&str>, name: Option<&str>, tag: Option<&str>) -> Self {
        Self {
            registry: registry.filter(|r| !r.is_empty()).map(str::to_string),
            name: name.filter(|n| !n.is_empty()).map(str::to_string),
            tag: tag
                .filter(|t| !t.is_empty())
                .unwrap_or(DEFAULT_IMAGE_TAG)
                .to_string(),
        }
    }
}

impl std::fmt::Display for ImageReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(registry) = &self.registry {
            write!(f, "{}/", registry)?;
        }
        write!(f, "{}:{}", self.name.as_deref().unwrap_or_default(), self.tag)
    }
}
