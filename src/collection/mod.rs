//! Collections: namespaces of components and their resources.
//!
//! # Architecture
//!
//! ```text
//! local ──fallback──> components
//!   │                    │
//!   ├─ components        ├─ components   name -> Arc<Component>
//!   └─ resources         └─ resources    path specifier -> Resources (memo)
//! ```
//!
//! - [`resolve`]: path specifier resolution and resource memoization
//! - [`load`]: loading installed component directories
//! - [`resource`]: the [`Resource`] type
//!
//! A collection owns its components and the resources built from them.
//! Lookups for a component it does not own are delegated to the fallback,
//! which memoizes them itself. Resources therefore always belong to the
//! collection of their component, and a local collection that registers a
//! name shadows the fallback's component of the same name.

mod load;
mod resolve;
mod resource;

pub use resolve::Target;
pub use resource::{Resource, Resources};

use dashmap::DashMap;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::component::{Component, Version, WORKING_DESCRIPTOR, load_component};
use crate::debug;
use crate::error::{Error, Result};
use crate::include::{Includer, Inclusions};
use crate::render::Renderer;
use crate::utils::fs::{dotted_extension, normalize_relative, safe_join};

/// A namespace of components, optionally falling back to another collection.
#[derive(Debug)]
pub struct Collection {
    name: String,
    signature: Arc<str>,
    renderer: Arc<Renderer>,
    fallback: Option<Arc<Collection>>,
    components: RwLock<FxHashMap<String, Arc<Component>>>,
    /// Canonical path specifier -> resolved resources. Insert-if-absent;
    /// entries are never replaced.
    resources: DashMap<String, Resources>,
}

impl Collection {
    pub(crate) fn new(
        name: impl Into<String>,
        signature: Arc<str>,
        renderer: Arc<Renderer>,
        fallback: Option<Arc<Collection>>,
    ) -> Self {
        Self {
            name: name.into(),
            signature,
            renderer,
            fallback,
            components: RwLock::new(FxHashMap::default()),
            resources: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fallback(&self) -> Option<&Arc<Collection>> {
        self.fallback.as_ref()
    }

    pub fn renderer(&self) -> &Arc<Renderer> {
        &self.renderer
    }

    /// Register a component and build its main resources.
    ///
    /// Fails if the name is already registered here or a declared dependency
    /// cannot be found in this collection or its fallbacks. A failed
    /// registration leaves the collection unchanged.
    pub fn add(&self, mut component: Component) -> Result<Arc<Component>> {
        let name = component.name().to_string();
        if self.components.read().contains_key(&name) {
            return Err(self.duplicate(&name));
        }

        for dependency in component.dependencies() {
            if self.get_component(dependency).is_none() {
                return Err(Error::MissingDependency(dependency.clone()));
            }
        }

        component.bind(Arc::clone(&self.signature), &self.name);
        let component = Arc::new(component);
        let dependency_mains = self.dependency_mains(&component)?;

        let mains: Vec<Arc<Resource>> = component
            .main()
            .iter()
            .filter_map(|main| normalize_relative(main))
            .filter(|main| self.renderer.has(&dotted_extension(main)))
            .map(|main| {
                Arc::new(Resource::new(
                    Arc::clone(&component),
                    &main,
                    dependency_mains.clone(),
                ))
            })
            .collect();

        {
            let mut components = self.components.write();
            if components.contains_key(&name) {
                return Err(self.duplicate(&name));
            }
            components.insert(name.clone(), Arc::clone(&component));
        }

        for main in &mains {
            self.resources
                .insert(main.spec(), Arc::from(vec![Arc::clone(main)]));
        }
        self.resources.insert(name.clone(), Arc::from(mains));

        debug!("collection"; "{}: added {} ({:?})", self.name, name, component.version());
        Ok(component)
    }

    /// Load a working-copy component (`bower.json`) from `dir` and register it.
    ///
    /// `version` overrides the descriptor; pass an autoversion strategy to
    /// derive the version from the directory contents.
    pub fn load_component(
        &self,
        dir: impl AsRef<Path>,
        version: Option<Version>,
    ) -> Result<Arc<Component>> {
        let component = load_component(dir.as_ref(), WORKING_DESCRIPTOR, version)?;
        self.add(component)
    }

    /// Component registered in this collection only.
    pub fn local_component(&self, name: &str) -> Option<Arc<Component>> {
        self.components.read().get(name).cloned()
    }

    /// Component by name, following the fallback chain.
    pub fn get_component(&self, name: &str) -> Option<Arc<Component>> {
        self.local_component(name).or_else(|| {
            self.fallback
                .as_ref()
                .and_then(|fallback| fallback.get_component(name))
        })
    }

    /// Components registered in this collection, sorted by name.
    pub fn components(&self) -> Vec<Arc<Component>> {
        let mut components: Vec<_> = self.components.read().values().cloned().collect();
        components.sort_by(|a, b| a.name().cmp(b.name()));
        components
    }

    /// Absolute file path for a published address, or `None`.
    ///
    /// Only succeeds when the component is owned by this collection, `version`
    /// equals its current effective version, and `file_path` names an
    /// existing file inside the component root.
    pub fn get_filename(&self, component: &str, version: &str, file_path: &str) -> Option<PathBuf> {
        let component = self.local_component(component)?;
        let current = component.effective_version().ok()?;
        if current != version {
            return None;
        }
        safe_join(component.root(), file_path)
    }

    /// Includer that records into a request-scoped slot.
    ///
    /// The [`Inclusions`] accumulator is created on the first successful
    /// `include()` and shared by every includer handed the same slot.
    pub fn includer<'a>(&'a self, slot: &'a mut Option<Inclusions>) -> Includer<'a> {
        Includer::new(self, slot)
    }

    /// Whether `name` is this collection or one it falls back to.
    pub(crate) fn in_chain(&self, name: &str) -> bool {
        self.name == name
            || self
                .fallback
                .as_ref()
                .is_some_and(|fallback| fallback.in_chain(name))
    }

    fn duplicate(&self, name: &str) -> Error {
        Error::DuplicateName {
            scope: self.name.clone(),
            name: name.to_string(),
        }
    }
}
