//! Individually addressable files of a component.

use parking_lot::RwLock;
use rustc_hash::FxHashSet;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use crate::component::Component;
use crate::error::{Error, Result};
use crate::utils::fs::dotted_extension;

/// Resolved resources for one path specifier, shared by reference.
pub type Resources = Arc<[Arc<Resource>]>;

/// A file of a component plus the resources it must be preceded by.
///
/// Identity is reference identity: a collection hands out the same `Arc` for
/// the same path specifier, so two inclusions of one file compare equal via
/// [`Resource::same`]. A memoized instance is never replaced; dependencies
/// declared later are appended to it, so edges held by other resources stay
/// valid.
pub struct Resource {
    component: Arc<Component>,
    file_path: String,
    ext: String,
    /// Declared through `Collection::resource_with`, ordered first.
    declared: RwLock<Vec<Arc<Resource>>>,
    /// Main resources of the component's dependencies.
    inherited: Vec<Arc<Resource>>,
}

impl Resource {
    pub(crate) fn new(
        component: Arc<Component>,
        file_path: &str,
        inherited: Vec<Arc<Resource>>,
    ) -> Self {
        Self {
            ext: dotted_extension(file_path),
            file_path: file_path.to_string(),
            component,
            declared: RwLock::new(Vec::new()),
            inherited,
        }
    }

    pub fn component(&self) -> &Arc<Component> {
        &self.component
    }

    /// Name of the collection that owns this resource.
    pub fn collection(&self) -> &str {
        self.component.collection()
    }

    /// File path relative to the component root.
    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    /// Extension with leading dot, or empty.
    pub fn ext(&self) -> &str {
        &self.ext
    }

    /// Declared dependencies followed by the component's dependency mains.
    pub fn dependencies(&self) -> Vec<Arc<Resource>> {
        let declared = self.declared.read();
        let mut all = Vec::with_capacity(declared.len() + self.inherited.len());
        all.extend(declared.iter().cloned());
        all.extend(self.inherited.iter().cloned());
        all
    }

    /// `component/file` form of the path specifier.
    pub fn spec(&self) -> String {
        format!("{}/{}", self.component.name(), self.file_path)
    }

    /// Absolute path on disk.
    pub fn path(&self) -> PathBuf {
        self.component.root().join(&self.file_path)
    }

    /// Versioned URL using the component's current effective version.
    pub fn url(&self) -> Result<String> {
        Ok(format!("{}{}", self.component.url()?, self.file_path))
    }

    /// Raw file content, for inline renders.
    pub fn content(&self) -> Result<String> {
        let path = self.path();
        fs::read_to_string(&path).map_err(|e| Error::Io(path, e))
    }

    /// Reference identity.
    pub fn same(a: &Arc<Resource>, b: &Arc<Resource>) -> bool {
        Arc::ptr_eq(a, b)
    }

    /// Identity key usable in hash maps.
    pub(crate) fn identity(resource: &Arc<Resource>) -> usize {
        Arc::as_ptr(resource) as usize
    }

    /// Fail with `Cycle` if depending on `dependency` would close a loop.
    pub(crate) fn check_declare(self: &Arc<Self>, dependency: &Arc<Resource>) -> Result<()> {
        if Self::same(self, dependency) || dependency.reaches(self) {
            return Err(Error::Cycle(format!(
                "{} -> {} -> {}",
                self.spec(),
                dependency.spec(),
                self.spec()
            )));
        }
        Ok(())
    }

    /// Append declared dependencies, skipping ones already declared.
    pub(crate) fn declare(&self, dependencies: &[Arc<Resource>]) {
        let mut declared = self.declared.write();
        for dependency in dependencies {
            if !declared.iter().any(|d| Self::same(d, dependency)) {
                declared.push(Arc::clone(dependency));
            }
        }
    }

    /// Whether `target` is in the transitive dependencies of `self`.
    fn reaches(&self, target: &Arc<Resource>) -> bool {
        let mut stack = self.dependencies();
        let mut seen = FxHashSet::default();
        while let Some(next) = stack.pop() {
            if Self::same(&next, target) {
                return true;
            }
            if seen.insert(Self::identity(&next)) {
                stack.extend(next.dependencies());
            }
        }
        false
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("collection", &self.collection())
            .field("spec", &self.spec())
            .field("dependencies", &self.dependencies().len())
            .finish()
    }
}
