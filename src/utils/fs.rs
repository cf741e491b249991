//! Filesystem helpers shared by resource resolution and publishing.

use std::path::{Component, Path, PathBuf};

/// Join `relative` onto `root` and return the canonical path of an existing
/// file, or `None` if it is missing or escapes `root`.
///
/// Canonicalization resolves symlinks and `..` segments, so the containment
/// check cannot be bypassed with encoded or indirect traversal.
pub fn safe_join(root: &Path, relative: &str) -> Option<PathBuf> {
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() || Path::new(relative).is_absolute() {
        return None;
    }

    let canonical = root.join(relative).canonicalize().ok()?;
    let root_canonical = root.canonicalize().ok()?;

    if !canonical.starts_with(&root_canonical) || !canonical.is_file() {
        return None;
    }
    Some(canonical)
}

/// Lexically normalize a path: drop `.` segments and fold `..` into parents.
///
/// Used for display and map keys, never for access control.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Lexically normalize a `/`-separated relative path: drop empty and `.`
/// segments and fold `..` into its parent. `None` if it climbs above the
/// start.
pub fn normalize_relative(path: &str) -> Option<String> {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            segment => segments.push(segment),
        }
    }
    Some(segments.join("/"))
}

/// Extension of a file path including the leading dot (`dist/app.min.js` -> `.js`).
pub fn dotted_extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}
