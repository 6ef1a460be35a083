//! Generated README artifact.

use std::fmt::Write;

use crate::core::domain::Descriptor;

/// Render the README for a descriptor. Output depends only on the input.
pub fn render(descriptor: &Descriptor) -> String {
    let mut out = String::new();
    let image = descriptor
        .image_reference()
        .map(|image| format!("`{}`", image))
        .unwrap_or_else(|| "-".to_string());
    let port = descriptor
        .port
        .map(|p| p.to_string())
        .unwrap_or_else(|| "-".to_string());

    let _ = writeln!(out, "# {}", descriptor.display_name);
    out.push('\n');
    if !descriptor.description.is_empty() {
        let _ = writeln!(out, "{}", descriptor.description);
        out.push('\n');
    }

    out.push_str("## Application\n\n");
    out.push_str("| Property | Value |\n|---|---|\n");
    let _ = writeln!(out, "| Key | `{}` |", descriptor.key);
    let _ = writeln!(out, "| Type | {} |", descriptor.app_type.as_str());
    let _ = writeln!(out, "| Port | {} |", port);
    let _ = writeln!(out, "| Image | {} |", image);

    if !descriptor.configuration.is_empty() {
        out.push_str("\n## Configuration\n\n");
        out.push_str("| Variable | Location | Required |\n|---|---|---|\n");
        for item in &descriptor.configuration {
            let location = if item.is_keyvault() { "keyvault" } else { "variable" };
            let required = if item.required { "yes" } else { "no" };
            let _ = writeln!(out, "| `{}` | {} | {} |", item.name, location, required);
        }
    }

    if !descriptor.roles.is_empty() {
        out.push_str("\n## Roles\n\n");
        for role in &descriptor.roles {
            let _ = writeln!(out, "- `{}`: {}", role.value, role.name);
        }
    }

    out
}
