//! Component descriptor (`bower.json` / `.bower.json`) loading.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use super::{Component, Version};
use crate::error::{Error, Result};

/// Descriptor written by the package installer into each installed component.
pub const INSTALLED_DESCRIPTOR: &str = ".bower.json";

/// Descriptor of a component in a working copy.
pub const WORKING_DESCRIPTOR: &str = "bower.json";

/// Fields consumed from a descriptor. Everything else is ignored.
#[derive(Debug, Deserialize)]
struct Manifest {
    name: String,
    version: Option<String>,
    /// Installers record the resolved release here when `version` is absent.
    #[serde(rename = "_release")]
    release: Option<String>,
    main: Option<MainField>,
    /// Name -> version range. Only the keys are used.
    #[serde(default)]
    dependencies: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MainField {
    One(String),
    Many(Vec<String>),
}

impl MainField {
    fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(path) => vec![path],
            Self::Many(paths) => paths,
        }
    }
}

/// Load a component from `dir/descriptor`.
///
/// `version` overrides whatever the descriptor declares. Without an override
/// the descriptor's `version`, then `_release`, is used.
pub fn load_component(dir: &Path, descriptor: &str, version: Option<Version>) -> Result<Component> {
    let path = dir.join(descriptor);
    let content = fs::read_to_string(&path)
        .map_err(|e| Error::load(&path, format!("cannot read descriptor: {e}")))?;
    let manifest: Manifest = serde_json::from_str(&content)
        .map_err(|e| Error::load(&path, format!("invalid descriptor: {e}")))?;

    let version = version
        .or_else(|| manifest.version.map(Version::Fixed))
        .or_else(|| manifest.release.map(Version::Fixed))
        .ok_or_else(|| Error::load(&path, "no version in descriptor and none supplied"))?;

    let main = manifest.main.map(MainField::into_vec).unwrap_or_default();
    let dependencies: Vec<String> = manifest.dependencies.keys().cloned().collect();

    Ok(Component::new(manifest.name, dir, version)
        .with_main(main)
        .with_dependencies(dependencies))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autoversion::MtimeVersion;
    use tempfile::TempDir;

    fn write_descriptor(dir: &Path, name: &str, json: &str) {
        fs::write(dir.join(name), json).unwrap();
    }

    #[test]
    fn test_load_single_main() {
        let dir = TempDir::new().unwrap();
        write_descriptor(
            dir.path(),
            INSTALLED_DESCRIPTOR,
            r#"{"name": "jquery", "version": "2.1.1", "main": "dist/jquery.js"}"#,
        );

        let component = load_component(dir.path(), INSTALLED_DESCRIPTOR, None).unwrap();
        assert_eq!(component.name(), "jquery");
        assert_eq!(component.effective_version().unwrap(), "2.1.1");
        assert_eq!(component.main(), ["dist/jquery.js"]);
        assert!(component.dependencies().is_empty());
    }

    #[test]
    fn test_load_multi_main_and_ordered_dependencies() {
        let dir = TempDir::new().unwrap();
        write_descriptor(
            dir.path(),
            INSTALLED_DESCRIPTOR,
            r#"{
                "name": "widgets",
                "version": "1.0",
                "main": ["dist/widgets.js", "dist/widgets.css"],
                "dependencies": {"zepto": "~1.0", "jquery": ">=2.0", "moment": "*"}
            }"#,
        );

        let component = load_component(dir.path(), INSTALLED_DESCRIPTOR, None).unwrap();
        assert_eq!(component.main(), ["dist/widgets.js", "dist/widgets.css"]);
        assert_eq!(component.dependencies(), ["zepto", "jquery", "moment"]);
    }

    #[test]
    fn test_missing_main_is_empty() {
        let dir = TempDir::new().unwrap();
        write_descriptor(
            dir.path(),
            INSTALLED_DESCRIPTOR,
            r#"{"name": "missing_main", "version": "2.1.1"}"#,
        );

        let component = load_component(dir.path(), INSTALLED_DESCRIPTOR, None).unwrap();
        assert!(component.main().is_empty());
    }

    #[test]
    fn test_release_field_fallback() {
        let dir = TempDir::new().unwrap();
        write_descriptor(
            dir.path(),
            INSTALLED_DESCRIPTOR,
            r#"{"name": "example", "_release": "1.0", "main": "example.js"}"#,
        );

        let component = load_component(dir.path(), INSTALLED_DESCRIPTOR, None).unwrap();
        assert_eq!(component.effective_version().unwrap(), "1.0");
    }

    #[test]
    fn test_explicit_version_overrides() {
        let dir = TempDir::new().unwrap();
        write_descriptor(
            dir.path(),
            WORKING_DESCRIPTOR,
            r#"{"name": "local", "version": "0.1", "main": "local.js"}"#,
        );

        let component =
            load_component(dir.path(), WORKING_DESCRIPTOR, Some(Version::from("2.0"))).unwrap();
        assert_eq!(component.effective_version().unwrap(), "2.0");

        let auto = load_component(
            dir.path(),
            WORKING_DESCRIPTOR,
            Some(Version::auto(MtimeVersion::seconds())),
        )
        .unwrap();
        assert!(auto.version().is_auto());
    }

    #[test]
    fn test_no_version_is_load_error() {
        let dir = TempDir::new().unwrap();
        write_descriptor(dir.path(), WORKING_DESCRIPTOR, r#"{"name": "local"}"#);

        let err = load_component(dir.path(), WORKING_DESCRIPTOR, None).unwrap_err();
        assert!(matches!(err, Error::Load { .. }));
    }

    #[test]
    fn test_missing_or_broken_descriptor() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_component(dir.path(), WORKING_DESCRIPTOR, None),
            Err(Error::Load { .. })
        ));

        write_descriptor(dir.path(), WORKING_DESCRIPTOR, "{ not json");
        assert!(matches!(
            load_component(dir.path(), WORKING_DESCRIPTOR, None),
            Err(Error::Load { .. })
        ));

        write_descriptor(dir.path(), WORKING_DESCRIPTOR, r#"{"version": "1.0"}"#);
        assert!(matches!(
            load_component(dir.path(), WORKING_DESCRIPTOR, None),
            Err(Error::Load { .. })
        ));
    }
}
