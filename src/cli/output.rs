//! Shared CLI output helpers for consistent terminal output.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, checkmarks
//! - Red: errors, redeploy triggers
//! - Yellow: warnings, overridable changes
//! - Cyan: paths, keys, hints
//! - Bold: headers, important values
//! - Dimmed: secondary info

use std::fmt::Display;

use console::{style, StyledObject};

const RULE_WIDTH: usize = 56;

/// Check if color output is disabled via NO_COLOR env var.
fn colors_enabled() -> bool {
    std::env::var("NO_COLOR").is_err()
}

fn paint<D>(value: D, f: impl FnOnce(StyledObject<D>) -> StyledObject<D>) -> String
where
    D: Display,
{
    if colors_enabled() {
        f(style(value)).to_string()
    } else {
        value.to_string()
    }
}

/// Print a success message with checkmark (green).
///
/// Example: `✓ artifacts written`
pub fn success(msg: &str) {
    println!("{} {}", paint("✓", |s| s.green()), msg);
}

/// Print an error message to stderr (red).
///
/// Example: `✗ not found: application.json`
pub fn error(msg: &str) {
    eprintln!("{} {}", paint("✗", |s| s.red()), msg);
}

/// Print a warning message (yellow).
pub fn warn(msg: &str) {
    println!("{} {}", paint("⚠", |s| s.yellow()), msg);
}

/// Print a hint message to stderr (cyan).
///
/// Example: `→ run: fabrix keygen`
pub fn hint(msg: &str) {
    eprintln!("{} {}", paint("→", |s| s.cyan()), paint(msg, |s| s.cyan()));
}

/// Print a bold section header.
pub fn header(title: &str) {
    println!("{}", paint(title, |s| s.bold()));
}

/// Print a key-value pair (label dimmed, value bold).
///
/// Example: `  deployment key:  3f5a...`
pub fn kv(label: &str, value: impl Display) {
    println!(
        "  {}  {}",
        paint(label, |s| s.dim()),
        paint(value.to_string(), |s| s.bold())
    );
}

/// Print a list item with bullet.
pub fn list_item(item: &str) {
    println!("  • {}", item);
}

/// Print a horizontal rule separator.
pub fn rule() {
    println!("{}", paint("─".repeat(RULE_WIDTH), |s| s.dim()));
}

/// Format a path string in cyan.
pub fn path(p: &str) -> String {
    paint(p, |s| s.cyan())
}

/// Format a command string in green.
pub fn cmd(c: &str) -> String {
    paint(c, |s| s.green())
}

/// Print a dimmed/secondary message.
pub fn dimmed(msg: &str) {
    println!("{}", paint(msg, |s| s.dim()));
}

/// Print a section header with a separator line.
///
/// Example:
/// ```text
/// Sync Configuration
/// ────────────────────────────────────────────────────────
/// ```
pub fn section(title: &str) {
    println!();
    header(title);
    rule();
}

/// Print one classified change: `~ sync.enabled  true → false  [overridable]`.
pub fn change(marker: char, path: &str, detail: &str, impact: &str) {
    let tag = format!("[{}]", impact);
    let tag = match impact {
        "trigger" => paint(tag, |s| s.red()),
        "overridable" => paint(tag, |s| s.yellow()),
        _ => paint(tag, |s| s.dim()),
    };
    println!("  {} {}  {}  {}", marker, paint(path, |s| s.cyan()), detail, tag);
}
