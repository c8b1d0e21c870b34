//! # switch-source
//!
//! Switches the source images of a Hugin panorama project (`.pto`) between
//! storage layouts, e.g. from camera JPEGs to 16-bit TIFFs developed from RAW:
//!
//! ```text
//! i w4000 h3000 ... n"jpeg/IMG_0001.jpg"   →   i w4000 h3000 ... n"tiff16/IMG_0001.tif"
//! ```
//!
//! Stitch a quick preview from the JPEGs, then switch the same project to the
//! TIFFs for the final render without redoing control points or optimization.
//!
//! # Pipeline
//!
//! ```text
//! 1. Config     switch-source.toml  →  LayoutRegistry
//! 2. Discover   Hugin directory exists, project file located
//! 3. Rewrite    project.pto  →  project.pto   (replaced only if changed)
//! ```
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`rewrite`] | Line-by-line source path substitution and the replace-in-place commit |
//! | [`layout`] | `LayoutSpec` records and the name → layout registry |
//! | [`config`] | `switch-source.toml` loading, merging onto stock defaults, validation |
//! | [`discover`] | Single-project lookup and Hugin directory glob lookup |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Only `i ` Lines Are Touched
//!
//! The project grammar is not parsed. Lines starting with `i ` declare image
//! sources; everything else, including the `p` line whose `n"..."` holds the
//! output format, is copied through byte-for-byte.
//!
//! ## Replace Only On Change
//!
//! The rewritten project is written to a scratch file beside the original and
//! atomically renamed over it only if a line changed. A project already on the
//! target layout keeps its identity and modification time.

pub mod config;
pub mod discover;
pub mod layout;
pub mod output;
pub mod rewrite;

#[cfg(test)]
pub(crate) mod test_helpers;
