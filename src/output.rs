//! CLI output formatting.
//!
//! # Output Format
//!
//! ## Switch
//!
//! ```text
//! Switching pano.pto to TIFF
//! Changed 3 filenames
//! Done!
//! ```
//!
//! or, when every source already points at the target layout:
//!
//! ```text
//! Switching pano.pto to TIFF
//! No changes made to file.
//! Done!
//! ```
//!
//! ## Layouts
//!
//! ```text
//! Layouts
//! 001 JPEG
//!     Source: jpeg/*.jpg
//! 002 TIFF (default)
//!     Source: tiff16/*.tif
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout.

use crate::layout::{LayoutRegistry, LayoutSpec};
use crate::rewrite::{RewriteOutcome, RewriteResult};
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

// ============================================================================
// Switch
// ============================================================================

pub fn format_switch_header(project: &Path, target: &LayoutSpec) -> Vec<String> {
    vec![format!("Switching {} to {}", project.display(), target.name)]
}

pub fn format_rewrite_result(result: &RewriteResult) -> Vec<String> {
    let summary = match result.outcome() {
        RewriteOutcome::Unchanged => "No changes made to file.".to_string(),
        RewriteOutcome::Committed if result.changes == 1 => "Changed 1 filename".to_string(),
        RewriteOutcome::Committed => format!("Changed {} filenames", result.changes),
    };
    vec![summary, "Done!".to_string()]
}

pub fn print_switch_header(project: &Path, target: &LayoutSpec) {
    for line in format_switch_header(project, target) {
        println!("{}", line);
    }
}

pub fn print_rewrite_result(result: &RewriteResult) {
    for line in format_rewrite_result(result) {
        println!("{}", line);
    }
}

// ============================================================================
// Layouts
// ============================================================================

/// List registered layouts, marking the default one.
pub fn format_layouts(registry: &LayoutRegistry, default_layout: &str) -> Vec<String> {
    let default_name = default_layout.to_ascii_uppercase();
    let mut lines = vec!["Layouts".to_string()];
    for (i, spec) in registry.iter().enumerate() {
        let marker = if spec.name == default_name {
            " (default)"
        } else {
            ""
        };
        lines.push(format!("{} {}{}", format_index(i + 1), spec.name, marker));
        lines.push(format!("{}Source: {}", indent(1), spec.pattern()));
    }
    lines
}

pub fn print_layouts(registry: &LayoutRegistry, default_layout: &str) {
    for line in format_layouts(registry, default_layout) {
        println!("{}", line);
    }
}
