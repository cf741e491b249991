//! The application-owned registry of collections.

use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::collection::Collection;
use crate::error::{Error, Result};
use crate::render::{Render, Renderer};

/// First URL segment of every published file unless configured otherwise.
pub const DEFAULT_SIGNATURE: &str = "bowerstatic";

/// Registry of named collections sharing one publisher signature and one
/// renderer registry.
///
/// Built once at startup and shared (`Arc<Bower>`) by the publisher, the
/// injector and request handlers.
#[derive(Debug)]
pub struct Bower {
    signature: Arc<str>,
    renderer: Arc<Renderer>,
    collections: RwLock<FxHashMap<String, Arc<Collection>>>,
}

impl Default for Bower {
    fn default() -> Self {
        Self::with_signature(DEFAULT_SIGNATURE)
    }
}

impl Bower {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signature(signature: &str) -> Self {
        Self {
            signature: Arc::from(signature.trim_matches('/')),
            renderer: Arc::new(Renderer::new()),
            collections: RwLock::new(FxHashMap::default()),
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn renderer(&self) -> &Arc<Renderer> {
        &self.renderer
    }

    /// Register the default render for an extension in every collection.
    pub fn register_renderer(&self, ext: &str, render: impl Into<Render>) {
        self.renderer.register(ext, render);
    }

    /// Create collection `name` from an installed components directory.
    pub fn components(&self, name: &str, dir: impl AsRef<Path>) -> Result<Arc<Collection>> {
        let collection = Collection::new(name, Arc::clone(&self.signature), Arc::clone(&self.renderer), None);
        collection.load_directory(dir.as_ref())?;
        self.insert(collection)
    }

    /// Create an empty collection `name` that falls back to `fallback`.
    pub fn local_components(&self, name: &str, fallback: &Arc<Collection>) -> Result<Arc<Collection>> {
        let collection = Collection::new(
            name,
            Arc::clone(&self.signature),
            Arc::clone(&self.renderer),
            Some(Arc::clone(fallback)),
        );
        self.insert(collection)
    }

    /// Create an empty collection `name` without a fallback.
    pub fn new_collection(&self, name: &str) -> Result<Arc<Collection>> {
        let collection = Collection::new(name, Arc::clone(&self.signature), Arc::clone(&self.renderer), None);
        self.insert(collection)
    }

    pub fn collection(&self, name: &str) -> Option<Arc<Collection>> {
        self.collections.read().get(name).cloned()
    }

    /// Registered collections, sorted by name.
    pub fn collections(&self) -> Vec<Arc<Collection>> {
        let mut collections: Vec<_> = self.collections.read().values().cloned().collect();
        collections.sort_by(|a, b| a.name().cmp(b.name()));
        collections
    }

    /// Absolute path of a published file, or `None` for any mismatch.
    pub fn get_filename(
        &self,
        collection: &str,
        component: &str,
        version: &str,
        file_path: &str,
    ) -> Option<PathBuf> {
        self.collection(collection)?
            .get_filename(component, version, file_path)
    }

    /// Collection by name, as an error when missing.
    pub fn require(&self, name: &str) -> Result<Arc<Collection>> {
        self.collection(name)
            .ok_or_else(|| Error::UnknownCollection(name.to_string()))
    }

    fn insert(&self, collection: Collection) -> Result<Arc<Collection>> {
        let mut collections = self.collections.write();
        if collections.contains_key(collection.name()) {
            return Err(Error::DuplicateName {
                scope: "bower".to_string(),
                name: collection.name().to_string(),
            });
        }
        let collection = Arc::new(collection);
        collections.insert(collection.name().to_string(), Arc::clone(&collection));
        Ok(collection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture;

    #[test]
    fn test_collection_registry() {
        let fx = fixture();
        assert!(fx.bower.collection("components").is_some());
        assert!(fx.bower.collection("other").is_none());
        assert!(matches!(
            fx.bower.require("other").unwrap_err(),
            Error::UnknownCollection(_)
        ));

        let err = fx.bower.new_collection("components").unwrap_err();
        assert!(matches!(err, Error::DuplicateName { ref scope, .. } if scope == "bower"));
    }

    #[test]
    fn test_collections_sorted() {
        let fx = fixture();
        fx.bower.local_components("alpha", &fx.components).unwrap();
        let names: Vec<_> = fx.bower.collections().iter().map(|c| c.name().to_string()).collect();
        assert_eq!(names, ["alpha", "components"]);
    }

    #[test]
    fn test_get_filename() {
        let fx = fixture();
        assert!(fx.bower.get_filename("components", "jquery", "2.1.1", "dist/jquery.js").is_some());
        assert!(fx.bower.get_filename("other", "jquery", "2.1.1", "dist/jquery.js").is_none());
    }

    #[test]
    fn test_custom_signature() {
        let bower = Bower::with_signature("/static/");
        assert_eq!(bower.signature(), "static");
        let local = bower.new_collection("app").unwrap();
        let component = crate::component::Component::new("x", "/nonexistent", "1.0");
        let component = local.add(component).unwrap();
        assert_eq!(component.url().unwrap(), "/static/app/x/1.0/");
    }

    #[test]
    fn test_register_renderer_applies_to_collections() {
        let fx = fixture();
        fx.bower.register_renderer(".foo", "<foo>{url}</foo>");
        assert!(fx.components.renderer().has(".foo"));
    }
}
