//! Filesystem lookups that run before a rewrite.
//!
//! - [`find_project_file`]: when no project is named on the command line, the
//!   working directory must hold exactly one `.pto` file.
//! - [`find_tool_dir`]: Hugin must be installed; its directory is given as a
//!   glob-style pattern such as `C:\Program Files*\Hugin`.
//!
//! Both are plain lookups with no state.

use regex::Regex;
use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Extension of Hugin project files.
pub const PROJECT_EXTENSION: &str = "pto";

#[derive(Error, Debug)]
pub enum DiscoverError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Found {count} PTO files, don't know what to do!")]
    ProjectCount { count: usize },
    #[error("Hugin directory not found: {0}")]
    ToolNotFound(String),
    #[error("Invalid directory pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Default location pattern for Hugin.
pub fn default_hugin_pattern() -> &'static str {
    if cfg!(windows) {
        r"C:\Program Files*\Hugin"
    } else {
        "/usr/share/hugin"
    }
}

/// Find the single `.pto` file directly inside `dir`.
///
/// Hidden files are ignored. A project in `.` is returned as its bare file
/// name. Fails with [`DiscoverError::ProjectCount`] when there are none or
/// several.
pub fn find_project_file(dir: &Path) -> Result<PathBuf, DiscoverError> {
    let mut projects = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = if dir == Path::new(".") {
            PathBuf::from(entry.file_name())
        } else {
            entry.path()
        };
        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let is_project = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case(PROJECT_EXTENSION));
        if !hidden && is_project && path.is_file() {
            projects.push(path);
        }
    }
    match projects.len() {
        1 => Ok(projects.remove(0)),
        count => Err(DiscoverError::ProjectCount { count }),
    }
}

/// Expand a glob-style directory pattern and return the first existing match.
///
/// `*` and `?` may appear in any path component. Matches are tried in sorted
/// order; names starting with `.` only match components that do too.
pub fn find_tool_dir(pattern: &str) -> Result<PathBuf, DiscoverError> {
    let mut candidates = vec![PathBuf::new()];
    for component in Path::new(pattern).components() {
        let part = component.as_os_str();
        let part_str = part.to_string_lossy();
        if matches!(component, Component::Normal(_)) && has_wildcard(&part_str) {
            let matcher = wildcard_regex(&part_str)?;
            let mut next = Vec::new();
            for base in &candidates {
                let dir = if base.as_os_str().is_empty() {
                    Path::new(".")
                } else {
                    base.as_path()
                };
                let Ok(entries) = fs::read_dir(dir) else {
                    continue;
                };
                for entry in entries.flatten() {
                    let name = entry.file_name();
                    let name_str = name.to_string_lossy();
                    if name_str.starts_with('.') && !part_str.starts_with('.') {
                        continue;
                    }
                    if matcher.is_match(&name_str) {
                        next.push(base.join(&name));
                    }
                }
            }
            next.sort();
            candidates = next;
        } else {
            for candidate in &mut candidates {
                candidate.push(part);
            }
        }
    }
    candidates
        .into_iter()
        .find(|c| !c.as_os_str().is_empty() && c.is_dir())
        .ok_or_else(|| DiscoverError::ToolNotFound(pattern.to_string()))
}

fn has_wildcard(part: &str) -> bool {
    part.contains(['*', '?'])
}

/// Anchored regex for one wildcard path component.
fn wildcard_regex(part: &str) -> Result<Regex, regex::Error> {
    let mut re = String::from(if cfg!(windows) { "(?i)^" } else { "^" });
    let mut literal = String::new();
    for c in part.chars() {
        match c {
            '*' | '?' => {
                re.push_str(&regex::escape(&literal));
                literal.clear();
                re.push_str(if c == '*' { ".*" } else { "." });
            }
            _ => literal.push(c),
        }
    }
    re.push_str(&regex::escape(&literal));
    re.push('$');
    Regex::new(&re)
}
