//! Shared test utilities for the switch-source test suite.
//!
//! Provides project-file fixtures in isolated temp directories, the stock
//! layouts, and assertions about scratch files left on disk.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (tmp, path) = setup_fixture_project();
//! let result = rewrite(&path, &tiff()).unwrap();
//! assert_eq!(result.changes, 3);
//! assert_no_scratch_files(tmp.path());
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::layout::{LayoutRegistry, LayoutSpec};

/// File name used for every project written by these helpers.
pub const PROJECT_NAME: &str = "project.pto";

// =========================================================================
// Fixture setup
// =========================================================================

/// Write `contents` to `project.pto` in a fresh temp directory.
pub fn setup_project(contents: &[u8]) -> (TempDir, PathBuf) {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join(PROJECT_NAME);
    std::fs::write(&path, contents).unwrap();
    (tmp, path)
}

/// Copy `fixtures/jpeg.pto` (10 lines, 3 JPEG sources) to a temp directory.
pub fn setup_fixture_project() -> (TempDir, PathBuf) {
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/jpeg.pto");
    let contents = std::fs::read(&fixture)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", fixture.display()));
    setup_project(&contents)
}

// =========================================================================
// Layouts
// =========================================================================

pub fn tiff() -> LayoutSpec {
    LayoutRegistry::builtin().get("TIFF").unwrap().clone()
}

pub fn jpeg() -> LayoutSpec {
    LayoutRegistry::builtin().get("JPEG").unwrap().clone()
}

// =========================================================================
// Filesystem inspection
// =========================================================================

/// Sorted file names in a directory.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

/// Panic if any `switch_source-*` scratch file is left in `dir`.
pub fn assert_no_scratch_files(dir: &Path) {
    let leftovers: Vec<String> = dir_entries(dir)
        .into_iter()
        .filter(|name| name.starts_with("switch_source-"))
        .collect();
    assert!(leftovers.is_empty(), "scratch files left behind: {leftovers:?}");
}

/// Split bytes into lines, keeping each terminator.
pub fn split_lines(bytes: &[u8]) -> Vec<&[u8]> {
    bytes.split_inclusive(|&b| b == b'\n').collect()
}
