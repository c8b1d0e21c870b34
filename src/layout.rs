//! Storage layouts for source images.
//!
//! A layout names a convention for where a project's source images live and
//! which extension they carry. The two stock layouts mirror a typical
//! panorama workflow: camera JPEGs next to 16-bit TIFFs exported from a RAW
//! developer.
//!
//! ```text
//! TIFF  →  tiff16/<basename>.tif
//! JPEG  →  jpeg/<basename>.jpg
//! ```
//!
//! Layouts are immutable records. The stock table is a `const`; extra layouts
//! come from `switch-source.toml` (see [`crate::config`]) and are collected
//! into an owned [`LayoutRegistry`], so there is no mutable global table.
//! Names are matched case-insensitively and stored upper-cased.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use thiserror::Error;

/// Stock layouts as `(name, directory, extension)`.
pub const BUILTIN_LAYOUTS: &[(&str, &str, &str)] =
    &[("TIFF", "tiff16", "tif"), ("JPEG", "jpeg", "jpg")];

/// Directory and extension must stay inside the `\w+` segments the source
/// filename pattern can match, or a switched project could not be switched back.
static WORD_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\w+$").expect("word segment pattern must compile"));

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Unknown layout {name:?} (known: {})", .known.join(", "))]
    Unknown { name: String, known: Vec<String> },
    #[error("Malformed layout {name:?}: {reason}")]
    Malformed { name: String, reason: String },
    #[error("Layout {0:?} is defined more than once")]
    Duplicate(String),
}

/// One storage layout: `<directory>/<basename>.<extension>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutSpec {
    /// Identifier, upper-cased (e.g. `"TIFF"`).
    pub name: String,
    /// Relative directory the images live in (e.g. `"tiff16"`).
    pub directory: String,
    /// File extension without the leading dot (e.g. `"tif"`).
    pub extension: String,
}

impl LayoutSpec {
    pub fn new(name: &str, directory: &str, extension: &str) -> Self {
        Self {
            name: name.to_ascii_uppercase(),
            directory: directory.to_string(),
            extension: extension.to_string(),
        }
    }

    /// Reject layouts whose `n"dir/base.ext"` value the source filename
    /// pattern could not match again.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let malformed = |reason: &str| LayoutError::Malformed {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        if self.name.trim().is_empty() {
            return Err(malformed("name must not be empty"));
        }
        if self.directory.is_empty() {
            return Err(malformed("directory must not be empty"));
        }
        if self.extension.is_empty() {
            return Err(malformed("extension must not be empty"));
        }
        if self.extension.starts_with('.') {
            return Err(malformed("extension must not start with a dot"));
        }
        if !WORD_SEGMENT.is_match(&self.directory) {
            return Err(malformed(
                "directory must be a single segment of letters, digits and underscores",
            ));
        }
        if !WORD_SEGMENT.is_match(&self.extension) {
            return Err(malformed(
                "extension must be letters, digits and underscores only",
            ));
        }
        Ok(())
    }

    /// The `directory/*.extension` shape, for display.
    pub fn pattern(&self) -> String {
        format!("{}/*.{}", self.directory, self.extension)
    }
}

/// Name → layout lookup table.
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    layouts: BTreeMap<String, LayoutSpec>,
}

impl LayoutRegistry {
    /// Registry holding only [`BUILTIN_LAYOUTS`].
    pub fn builtin() -> Self {
        let specs = BUILTIN_LAYOUTS
            .iter()
            .map(|(name, dir, ext)| LayoutSpec::new(name, dir, ext));
        Self {
            layouts: specs.map(|spec| (spec.name.clone(), spec)).collect(),
        }
    }

    /// Build a registry, validating every entry.
    ///
    /// Names differing only by case count as duplicates.
    pub fn from_specs(specs: impl IntoIterator<Item = LayoutSpec>) -> Result<Self, LayoutError> {
        let mut layouts = BTreeMap::new();
        for spec in specs {
            spec.validate()?;
            if layouts.contains_key(&spec.name) {
                return Err(LayoutError::Duplicate(spec.name));
            }
            layouts.insert(spec.name.clone(), spec);
        }
        Ok(Self { layouts })
    }

    /// Look up a layout by name, ignoring case.
    pub fn get(&self, name: &str) -> Result<&LayoutSpec, LayoutError> {
        self.layouts
            .get(&name.to_ascii_uppercase())
            .ok_or_else(|| LayoutError::Unknown {
                name: name.to_string(),
                known: self.names().map(str::to_string).collect(),
            })
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.layouts.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutSpec> {
        self.layouts.values()
    }

    pub fn len(&self) -> usize {
        self.layouts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layouts.is_empty()
    }
}
