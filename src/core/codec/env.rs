//! Environment template artifact.
//!
//! One `NAME=value` line per configuration item. Key vault references carry
//! the `kv://` prefix. Values are opaque: `${VAR}` interpolation passes
//! through untouched in both directions.

use tracing::debug;

use crate::core::constants::KV_PREFIX;
use crate::core::domain::{ConfigurationItem, Location};

/// Render configuration items as an environment template.
///
/// Items with an empty name or value are left out; order is preserved.
pub fn render_template(items: &[ConfigurationItem]) -> String {
    let mut output = String::new();
    let mut skipped = 0usize;

    for item in items {
        if item.name.is_empty() || item.value.is_empty() {
            skipped += 1;
            continue;
        }

        let prefix = match item.location {
            Location::Keyvault => KV_PREFIX,
            Location::Variable => "",
        };
        output.push_str(&format!("{}={}{}\n", item.name, prefix, item.value));
    }

    if skipped > 0 {
        debug!(skipped, "empty configuration items left out of template");
    }
    output
}

/// Parse an environment template back into configuration items.
///
/// Blank lines, `#` comments, lines without `=` and lines with an empty key
/// or value are skipped. `required` is derived from name and location.
pub fn parse_template(contents: &str) -> Vec<ConfigurationItem> {
    let mut items = Vec::new();

    for line in contents.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((name, value)) = line.split_once('=') else {
            continue;
        };
        let (name, value) = (name.trim(), value.trim());
        if name.is_empty() || value.is_empty() {
            continue;
        }

        let item = match value.strip_prefix(KV_PREFIX) {
            Some(reference) => ConfigurationItem::new(name, reference, Location::Keyvault),
            None => ConfigurationItem::new(name, value, Location::Variable),
        };
        items.push(item);
    }

    items
}
