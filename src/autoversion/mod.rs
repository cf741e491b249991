//! Version tokens derived from filesystem state.
//!
//! An autoversioned component has no declared version. Its effective version
//! is recomputed from the component directory on every read, so any edit under
//! the root changes the token and retires every URL issued for the old one.
//!
//! - [`mtime`]: newest modification time, at second or microsecond precision
//! - [`hash`]: blake3 digest over file paths and contents

pub mod hash;
pub mod mtime;

use jwalk::WalkDir;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub use hash::ContentHashVersion;
pub use mtime::MtimeVersion;

/// Version-control metadata directories never walked.
pub const VCS_NAMES: [&str; 4] = [".svn", ".git", ".bzr", ".hg"];

/// Transient file extensions never considered.
pub const IGNORE_EXTENSIONS: [&str; 4] = ["swp", "tmp", "pyc", "pyo"];

/// Strategy that computes a component version from its root directory.
pub trait VersionStrategy: Send + Sync + fmt::Debug {
    /// Short name used in configuration and listings.
    fn name(&self) -> &'static str;

    /// Compute the current version token for the directory at `root`.
    fn version(&self, root: &Path) -> io::Result<String>;
}

/// A visited filesystem entry.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    pub path: PathBuf,
    pub is_dir: bool,
    pub metadata: fs::Metadata,
}

/// Walk `root` recursively, yielding the root itself, every directory and
/// every file except VCS metadata and transient files.
///
/// Entries that vanish mid-walk are skipped. A missing root is an error.
pub fn walk(root: &Path) -> io::Result<Vec<WalkEntry>> {
    // Surface a missing or unreadable root instead of an empty walk
    fs::metadata(root)?;

    let entries = WalkDir::new(root)
        .skip_hidden(false)
        .sort(true)
        .process_read_dir(|_depth, _path, _state, children| {
            children.retain(|child| match child {
                Ok(entry) => !is_ignored(&entry.file_name, entry.file_type.is_dir()),
                Err(_) => false,
            });
        })
        .into_iter()
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let metadata = entry.metadata().ok()?;
            Some(WalkEntry {
                path: entry.path(),
                is_dir: entry.file_type.is_dir(),
                metadata,
            })
        })
        .collect();

    Ok(entries)
}

fn is_ignored(name: &std::ffi::OsStr, is_dir: bool) -> bool {
    let name = name.to_string_lossy();
    if is_dir {
        return VCS_NAMES.contains(&name.as_ref());
    }
    Path::new(name.as_ref())
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| IGNORE_EXTENSIONS.contains(&ext))
}

/// Parse a strategy name from configuration.
pub fn strategy_from_name(name: &str) -> Option<Arc<dyn VersionStrategy>> {
    match name {
        "second" | "mtime" => Some(Arc::new(MtimeVersion::seconds())),
        "microsecond" => Some(Arc::new(MtimeVersion::microseconds())),
        "hash" | "content" => Some(Arc::new(ContentHashVersion)),
        _ => None,
    }
}
