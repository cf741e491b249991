//! Components: named, versioned bundles of files on disk.
//!
//! A [`Component`] is a value object until a collection registers it. At
//! registration it is bound to a publisher signature and collection name,
//! which together with its effective version form the URL prefix of every
//! file it publishes.

mod manifest;

pub use manifest::{INSTALLED_DESCRIPTOR, WORKING_DESCRIPTOR, load_component};

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::autoversion::VersionStrategy;
use crate::error::{Error, Result};

/// Declared version or autoversion strategy.
#[derive(Clone)]
pub enum Version {
    /// Fixed version string from a manifest or the caller.
    Fixed(String),
    /// Version recomputed from filesystem state on every read.
    Auto(Arc<dyn VersionStrategy>),
}

impl Version {
    pub fn auto(strategy: impl VersionStrategy + 'static) -> Self {
        Self::Auto(Arc::new(strategy))
    }

    pub const fn is_auto(&self) -> bool {
        matches!(self, Self::Auto(_))
    }

    fn resolve(&self, root: &Path) -> Result<String> {
        match self {
            Self::Fixed(v) => Ok(v.clone()),
            Self::Auto(strategy) => strategy
                .version(root)
                .map_err(|e| Error::Io(root.to_path_buf(), e)),
        }
    }
}

impl fmt::Debug for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(v) => write!(f, "Fixed({v})"),
            Self::Auto(strategy) => write!(f, "Auto({})", strategy.name()),
        }
    }
}

impl From<&str> for Version {
    fn from(v: &str) -> Self {
        Self::Fixed(v.to_string())
    }
}

impl From<String> for Version {
    fn from(v: String) -> Self {
        Self::Fixed(v)
    }
}

/// A named bundle of files with entry points and dependencies.
#[derive(Debug, Clone)]
pub struct Component {
    name: String,
    root: PathBuf,
    version: Version,
    /// Entry files relative to `root`, in declaration order.
    main: Vec<String>,
    /// Dependency component names, in declaration order.
    dependencies: Vec<String>,
    signature: Arc<str>,
    collection: String,
}

impl Component {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, version: impl Into<Version>) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            version: version.into(),
            main: Vec::new(),
            dependencies: Vec::new(),
            signature: Arc::from(""),
            collection: String::new(),
        }
    }

    pub fn with_main<I, S>(mut self, main: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.main = main.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Bind to the collection that registers this component.
    pub(crate) fn bind(&mut self, signature: Arc<str>, collection: &str) {
        self.signature = signature;
        self.collection = collection.to_string();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn main(&self) -> &[String] {
        &self.main
    }

    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Name of the owning collection (empty until registered).
    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Current effective version. Autoversioned components walk their root
    /// on every call.
    pub fn effective_version(&self) -> Result<String> {
        self.version.resolve(&self.root)
    }

    /// URL prefix for this component: `/{signature}/{collection}/{name}/{version}/`.
    pub fn url(&self) -> Result<String> {
        Ok(format!(
            "/{}/{}/{}/{}/",
            self.signature,
            self.collection,
            self.name,
            self.effective_version()?
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::autoversion::ContentHashVersion;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_fixed_version() {
        let component = Component::new("jquery", "/tmp/jquery", "2.1.1");
        assert_eq!(component.effective_version().unwrap(), "2.1.1");
        assert!(!component.version().is_auto());
    }

    #[test]
    fn test_url_after_bind() {
        let mut component = Component::new("jquery", "/tmp/jquery", "2.1.1")
            .with_main(["dist/jquery.js"]);
        component.bind(Arc::from("bowerstatic"), "components");

        assert_eq!(component.collection(), "components");
        assert_eq!(
            component.url().unwrap(),
            "/bowerstatic/components/jquery/2.1.1/"
        );
    }

    #[test]
    fn test_auto_version_tracks_content() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("app.js"), "1").unwrap();
        let component = Component::new("app", dir.path(), Version::auto(ContentHashVersion));

        let before = component.effective_version().unwrap();
        fs::write(dir.path().join("app.js"), "2").unwrap();
        assert_ne!(component.effective_version().unwrap(), before);
    }

    #[test]
    fn test_auto_version_missing_root() {
        let dir = TempDir::new().unwrap();
        let component = Component::new(
            "gone",
            dir.path().join("gone"),
            Version::auto(ContentHashVersion),
        );
        assert!(matches!(component.effective_version(), Err(Error::Io(..))));
    }

    #[test]
    fn test_version_debug() {
        assert_eq!(format!("{:?}", Version::from("1.0")), "Fixed(1.0)");
        assert_eq!(
            format!("{:?}", Version::auto(ContentHashVersion)),
            "Auto(hash)"
        );
    }
}
