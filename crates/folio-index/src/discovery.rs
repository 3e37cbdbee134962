//! File discovery for indexing.
//!
//! Walks a directory (or takes a single file) and returns the regular files
//! worth handing to an extractor, skipping hidden entries, excluded paths,
//! the index directory itself and files over the size limit.

use std::{
    ffi::OsStr,
    fs, io,
    path::{Path, PathBuf},
    time::SystemTime,
};

use folio_config::ExcludePatterns;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::IndexError;

/// A file discovered for indexing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Absolute, canonical path.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Modification time.
    pub mtime: SystemTime,
}

/// A file left out of discovery and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Path as walked.
    pub path: PathBuf,
    /// Reason it was skipped.
    pub reason: String,
}

/// Files found under a root.
#[derive(Debug, Clone, Default)]
pub struct Discovery {
    /// Files to extract, in walk order.
    pub files: Vec<DiscoveredFile>,
    /// Files seen but left out.
    pub skipped: Vec<SkippedFile>,
}

/// Limits applied while walking.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryOptions {
    /// Files larger than this are skipped.
    pub max_file_size: u64,
    /// Globs matched against paths relative to the root.
    pub exclude: ExcludePatterns,
    /// Directory never descended into, normally the index itself.
    pub skip_dir: Option<PathBuf>,
}

/// Discovers files under `root`, which may also be a single file.
pub fn discover_files(root: &Path, options: &DiscoveryOptions) -> Result<Discovery, IndexError> {
    let root = fs::canonicalize(root).map_err(|e| {
        IndexError::Io(io::Error::new(
            e.kind(),
            format!("cannot read {}: {e}", root.display()),
        ))
    })?;
    let skip_dir = options
        .skip_dir
        .as_ref()
        .and_then(|dir| fs::canonicalize(dir).ok());

    let mut discovery = Discovery::default();

    let walker = WalkDir::new(&root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| keep_entry(e, skip_dir.as_deref()));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(error = %e, "skipping unreadable entry");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let relative = path.strip_prefix(&root).unwrap_or(path);
        if entry.depth() > 0 && options.exclude.is_excluded(relative) {
            debug!(path = %path.display(), "excluded");
            continue;
        }

        let metadata = match entry.metadata() {
            Ok(m) => m,
            Err(e) => {
                discovery.skipped.push(SkippedFile {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if metadata.len() > options.max_file_size {
            discovery.skipped.push(SkippedFile {
                path: path.to_path_buf(),
                reason: format!(
                    "file is {} bytes, over the {} byte limit",
                    metadata.len(),
                    options.max_file_size
                ),
            });
            continue;
        }

        discovery.files.push(DiscoveredFile {
            path: path.to_path_buf(),
            size: metadata.len(),
            mtime: metadata.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }

    Ok(discovery)
}

/// Whether the walk should visit an entry.
fn keep_entry(entry: &DirEntry, skip_dir: Option<&Path>) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    if is_hidden(entry.file_name()) {
        return false;
    }
    !skip_dir.is_some_and(|dir| entry.path() == dir)
}

/// Checks if a filename represents a hidden file (starts with '.').
fn is_hidden(name: &OsStr) -> bool {
    name.to_str().is_some_and(|s| s.starts_with('.'))
}
