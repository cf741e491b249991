//! Configuration utility functions.

use bowerstatic::utils::fs::normalize_path;
use std::path::{Path, PathBuf};

/// Expand `~` and resolve a relative path against `root`.
pub fn expand_path(path: &Path, root: &Path) -> PathBuf {
    let expanded = match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    };
    let full = if expanded.is_relative() {
        root.join(expanded)
    } else {
        expanded
    };
    normalize_path(&full)
}

/// Find config file by searching upward from current directory
///
/// Starts from cwd and walks up parent directories until finding `config_name`.
/// Returns the absolute path to the config file if found.
pub fn find_config_file(config_name: &Path) -> Option<PathBuf> {
    if config_name.is_absolute() {
        return config_name.exists().then(|| config_name.to_path_buf());
    }

    let cwd = std::env::current_dir().ok()?;
    let mut current = cwd.as_path();
    loop {
        let candidate = current.join(config_name);
        if candidate.exists() {
            return Some(candidate);
        }
        current = current.parent()?;
    }
}
