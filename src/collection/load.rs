//! Loading an installed components directory.

use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

use super::Collection;
use crate::component::{Component, INSTALLED_DESCRIPTOR, WORKING_DESCRIPTOR, load_component};
use crate::error::{Error, Result};
use crate::include::toposort::topological_sort;
use crate::log;

impl Collection {
    /// Register every component directory directly under `dir`.
    ///
    /// Each subdirectory must carry `.bower.json` or, failing that,
    /// `bower.json`. Components are registered in dependency order, so the
    /// directory listing order does not matter.
    pub(crate) fn load_directory(&self, dir: &Path) -> Result<()> {
        let entries = fs::read_dir(dir).map_err(|e| Error::Io(dir.to_path_buf(), e))?;

        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| Error::Io(dir.to_path_buf(), e))?;
            if entry.path().is_dir() {
                subdirs.push(entry.path());
            }
        }
        subdirs.sort();

        let mut components = Vec::with_capacity(subdirs.len());
        for subdir in &subdirs {
            let descriptor = if subdir.join(INSTALLED_DESCRIPTOR).is_file() {
                INSTALLED_DESCRIPTOR
            } else if subdir.join(WORKING_DESCRIPTOR).is_file() {
                WORKING_DESCRIPTOR
            } else {
                return Err(Error::load(subdir, "no component descriptor"));
            };
            components.push(load_component(subdir, descriptor, None)?);
        }

        let count = components.len();
        for component in dependency_order(components)? {
            self.add(component)?;
        }

        log!("collection"; "{}: loaded {} components from {}", self.name, count, dir.display());
        Ok(())
    }
}

/// Order components so each follows the components it depends on.
/// Dependencies outside the set are left for registration to report.
fn dependency_order(components: Vec<Component>) -> Result<Vec<Component>> {
    let index: FxHashMap<&str, usize> = components
        .iter()
        .enumerate()
        .map(|(i, c)| (c.name(), i))
        .collect();

    let order = topological_sort(
        0..components.len(),
        |&i| i,
        |&i| {
            components[i]
                .dependencies()
                .iter()
                .filter_map(|name| index.get(name.as_str()).copied())
                .collect()
        },
    )
    .map_err(|cycle| {
        let names: Vec<_> = cycle.iter().map(|&i| components[i].name()).collect();
        Error::Cycle(names.join(" -> "))
    })?;

    let mut slots: Vec<Option<Component>> = components.into_iter().map(Some).collect();
    Ok(order.into_iter().filter_map(|i| slots[i].take()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bower;
    use crate::testing::write_component;
    use tempfile::TempDir;

    #[test]
    fn test_dependency_order_ignores_listing() {
        let dir = TempDir::new().unwrap();
        // "aaa" sorts first but depends on "zzz"
        write_component(
            &dir.path().join("aaa"),
            ".bower.json",
            r#"{"name": "aaa", "version": "1.0", "main": "a.js", "dependencies": {"zzz": "*"}}"#,
            &[("a.js", "")],
        );
        write_component(
            &dir.path().join("zzz"),
            ".bower.json",
            r#"{"name": "zzz", "version": "1.0", "main": "z.js"}"#,
            &[("z.js", "")],
        );

        let bower = Bower::new();
        let components = bower.components("components", dir.path()).unwrap();
        let aaa = components.resource("aaa").unwrap();
        assert_eq!(aaa[0].dependencies()[0].spec(), "zzz/z.js");
    }

    #[test]
    fn test_working_descriptor_fallback() {
        let dir = TempDir::new().unwrap();
        write_component(
            &dir.path().join("dev"),
            "bower.json",
            r#"{"name": "dev", "version": "0.1", "main": "dev.js"}"#,
            &[("dev.js", "")],
        );

        let bower = Bower::new();
        let components = bower.components("components", dir.path()).unwrap();
        assert_eq!(
            components.get_component("dev").unwrap().effective_version().unwrap(),
            "0.1"
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let dir = TempDir::new().unwrap();
        write_component(
            &dir.path().join("a"),
            ".bower.json",
            r#"{"name": "a", "version": "1", "dependencies": {"b": "*"}}"#,
            &[],
        );
        write_component(
            &dir.path().join("b"),
            ".bower.json",
            r#"{"name": "b", "version": "1", "dependencies": {"a": "*"}}"#,
            &[],
        );

        let err = Bower::new().components("components", dir.path()).unwrap_err();
        assert!(matches!(err, Error::Cycle(_)));
    }

    #[test]
    fn test_missing_dependency_in_directory() {
        let dir = TempDir::new().unwrap();
        write_component(
            &dir.path().join("lonely"),
            ".bower.json",
            r#"{"name": "lonely", "version": "1", "dependencies": {"absent": "*"}}"#,
            &[],
        );

        let err = Bower::new().components("components", dir.path()).unwrap_err();
        assert_eq!(err.to_string(), "component 'absent' missing");
    }

    #[test]
    fn test_missing_version_uses_release() {
        let dir = TempDir::new().unwrap();
        write_component(
            &dir.path().join("missing-version-in-dot-bower-json"),
            ".bower.json",
            r#"{"name": "missing-version-in-dot-bower-json", "main": "example.js", "_release": "1.0"}"#,
            &[("example.js", "")],
        );

        let components = Bower::new().components("components", dir.path()).unwrap();
        let component = components
            .get_component("missing-version-in-dot-bower-json")
            .unwrap();
        assert_eq!(component.effective_version().unwrap(), "1.0");
    }

    #[test]
    fn test_nonexistent_directory() {
        let err = Bower::new()
            .components("components", Path::new("/nonexistent/bower_components"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(..)));
    }
}
