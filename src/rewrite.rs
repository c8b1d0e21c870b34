//! Source-image path rewriting for Hugin project files.
//!
//! A `.pto` project lists its source images on lines starting with `i `:
//!
//! ```text
//! i w4000 h3000 f0 v50 ... n"jpeg/IMG_0001.jpg"
//! ```
//!
//! [`rewrite`] streams a project file and swaps the quoted `n"dir/base.ext"`
//! value on every such line for the target layout, keeping the basename. All
//! other lines are copied through byte-for-byte, line terminators included,
//! and lines that are not image declarations are never searched at all.
//!
//! ## Commit discipline
//!
//! Output goes to a scratch file next to the input, named
//! `switch_source-<pid>-<random>.pto`. Only when at least one line changed is
//! the scratch file renamed over the original, in a single atomic rename;
//! otherwise it is deleted and the original is left alone. The scratch file
//! is removed on every error path too.
//!
//! Two invocations against the same project are not locked against each
//! other. Their scratch names never collide, but the last rename wins, so
//! callers must not run them concurrently.

use crate::layout::{LayoutError, LayoutSpec};
use regex::bytes::{Captures, Regex};
use std::borrow::Cow;
use std::fs::{self, File, Permissions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, trace};

/// Marker opening an image-source declaration line.
const SOURCE_MARKER: &[u8] = b"i ";

/// Prefix of the scratch file written next to the project.
const SCRATCH_PREFIX: &str = "switch_source-";

/// `n"<dir>/<basename>.<ext>"`, `/` or `\` separator, basename captured.
static SOURCE_FILENAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"n"\w+[/\\](\w+)\.\w+""#).expect("source filename pattern must compile")
});

#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("Cannot read project file {path}: {source}")]
    InputNotFound { path: PathBuf, source: io::Error },
    #[error(transparent)]
    LayoutUnknown(#[from] LayoutError),
    #[error("Cannot write temporary file in {path}: {source}")]
    TemporaryWrite { path: PathBuf, source: io::Error },
    #[error("Cannot replace {path} with the rewritten project: {source}")]
    Commit { path: PathBuf, source: io::Error },
}

/// How a rewrite finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// Nothing matched; the original file was not touched.
    Unchanged,
    /// The original file was replaced by the rewritten one.
    Committed,
}

/// Summary of a finished rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteResult {
    /// The project file, unchanged or replaced in place.
    pub path: PathBuf,
    /// Lines read from the project.
    pub lines: usize,
    /// Lines whose content differs from the original.
    pub changes: usize,
}

impl RewriteResult {
    pub fn outcome(&self) -> RewriteOutcome {
        if self.changes == 0 {
            RewriteOutcome::Unchanged
        } else {
            RewriteOutcome::Committed
        }
    }
}

/// Whether a raw line declares an image source.
pub fn is_source_declaration(line: &[u8]) -> bool {
    line.starts_with(SOURCE_MARKER)
}

/// Rewrite the quoted source filenames of one line to `target`.
///
/// Returns the line unchanged (borrowed) when it is not a source declaration
/// or holds no matching filename. The directory and extension of `target`
/// are inserted literally.
pub fn rewrite_line<'a>(line: &'a [u8], target: &LayoutSpec) -> Cow<'a, [u8]> {
    if !is_source_declaration(line) {
        return Cow::Borrowed(line);
    }
    SOURCE_FILENAME.replace_all(line, |caps: &Captures| {
        let basename = &caps[1];
        let mut out = Vec::with_capacity(
            target.directory.len() + basename.len() + target.extension.len() + 5,
        );
        out.extend_from_slice(b"n\"");
        out.extend_from_slice(target.directory.as_bytes());
        out.push(b'/');
        out.extend_from_slice(basename);
        out.push(b'.');
        out.extend_from_slice(target.extension.as_bytes());
        out.push(b'"');
        out
    })
}

/// Switch every source image in the project at `input` to `target`.
///
/// The file is replaced only if at least one line changed; a zero-change run
/// is a normal [`RewriteOutcome::Unchanged`] result, not an error. The
/// replacement keeps the original's permissions.
pub fn rewrite(input: &Path, target: &LayoutSpec) -> Result<RewriteResult, RewriteError> {
    target.validate()?;

    let read_error = |source: io::Error| RewriteError::InputNotFound {
        path: input.to_path_buf(),
        source,
    };
    let source = File::open(input).map_err(read_error)?;
    let metadata = source.metadata().map_err(read_error)?;
    if !metadata.is_file() {
        return Err(read_error(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        )));
    }

    let dir = scratch_dir(input);
    let write_error = |source: io::Error| RewriteError::TemporaryWrite {
        path: dir.to_path_buf(),
        source,
    };
    let mut scratch = create_scratch(dir)?;
    debug!(
        scratch = %scratch.path().display(),
        target = %target.pattern(),
        "rewriting project"
    );

    let mut reader = BufReader::new(source);
    let mut writer = BufWriter::new(scratch.as_file_mut());
    let mut line = Vec::new();
    let mut lines = 0;
    let mut changes = 0;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line).map_err(read_error)? == 0 {
            break;
        }
        lines += 1;
        let rewritten = rewrite_line(&line, target);
        if rewritten.as_ref() != line.as_slice() {
            changes += 1;
            trace!(line = lines, "source filename rewritten");
        }
        writer.write_all(&rewritten).map_err(write_error)?;
    }
    writer.flush().map_err(write_error)?;
    drop(writer);
    drop(reader);

    let result = RewriteResult {
        path: input.to_path_buf(),
        lines,
        changes,
    };

    if changes == 0 {
        debug!("no source filenames changed, discarding scratch file");
        scratch.close().map_err(write_error)?;
        return Ok(result);
    }

    scratch.as_file().sync_all().map_err(write_error)?;
    commit(scratch, input, metadata.permissions())?;
    debug!(changes, path = %input.display(), "committed rewritten project");

    Ok(result)
}

/// Create the uniquely named scratch file in `dir`.
fn create_scratch(dir: &Path) -> Result<NamedTempFile, RewriteError> {
    tempfile::Builder::new()
        .prefix(&format!("{SCRATCH_PREFIX}{}-", std::process::id()))
        .suffix(".pto")
        .tempfile_in(dir)
        .map_err(|source| RewriteError::TemporaryWrite {
            path: dir.to_path_buf(),
            source,
        })
}

/// Rename `scratch` over `target` in one step, with `target`'s permissions.
///
/// On failure the scratch file is dropped, which deletes it.
fn commit(
    scratch: NamedTempFile,
    target: &Path,
    permissions: Permissions,
) -> Result<(), RewriteError> {
    let commit_error = |source: io::Error| RewriteError::Commit {
        path: target.to_path_buf(),
        source,
    };
    fs::set_permissions(scratch.path(), permissions).map_err(commit_error)?;
    scratch
        .persist(target)
        .map_err(|err| commit_error(err.error))?;
    Ok(())
}

/// Directory for the scratch file: the input's own directory.
fn scratch_dir(input: &Path) -> &Path {
    match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
