//! Path specifier resolution.
//!
//! A path specifier is either `component` (its main resources) or
//! `component/relative/file` (exactly that file). Resolution is memoized per
//! collection. Missing files are not memoized: a file that appears later
//! resolves on the next request.

use std::sync::Arc;

use super::{Collection, Resource, Resources};
use crate::component::Component;
use crate::error::{Error, Result};
use crate::utils::fs::{normalize_relative, safe_join};

/// What to resolve: a path specifier or already-resolved resources.
#[derive(Debug, Clone)]
pub enum Target {
    Path(String),
    Resource(Arc<Resource>),
    Resources(Resources),
}

impl Target {
    /// Human-readable form for error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Path(spec) => spec.clone(),
            Self::Resource(resource) => resource.spec(),
            Self::Resources(resources) => resources
                .iter()
                .map(|r| r.spec())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<&str> for Target {
    fn from(spec: &str) -> Self {
        Self::Path(spec.to_string())
    }
}

impl From<String> for Target {
    fn from(spec: String) -> Self {
        Self::Path(spec)
    }
}

impl From<&String> for Target {
    fn from(spec: &String) -> Self {
        Self::Path(spec.clone())
    }
}

impl From<Arc<Resource>> for Target {
    fn from(resource: Arc<Resource>) -> Self {
        Self::Resource(resource)
    }
}

impl From<&Arc<Resource>> for Target {
    fn from(resource: &Arc<Resource>) -> Self {
        Self::Resource(Arc::clone(resource))
    }
}

impl From<Resources> for Target {
    fn from(resources: Resources) -> Self {
        Self::Resources(resources)
    }
}

impl From<&Resources> for Target {
    fn from(resources: &Resources) -> Self {
        Self::Resources(Arc::clone(resources))
    }
}

/// Split `component/file` into its parts. A bare or slash-terminated name has
/// no file part.
fn split_spec(spec: &str) -> (&str, Option<&str>) {
    let spec = spec.trim_matches('/');
    match spec.split_once('/') {
        Some((name, file)) if !file.is_empty() => (name, Some(file)),
        Some((name, _)) => (name, None),
        None => (spec, None),
    }
}

/// Canonical form of a specifier: the file part lexically normalized, so
/// every spelling of one file shares a memo entry. A file part that climbs
/// out of the component root is a missing file.
fn canonical_spec(spec: &str) -> Result<String> {
    let (name, file) = split_spec(spec);
    let Some(file) = file else {
        return Ok(name.to_string());
    };
    match normalize_relative(file) {
        Some(normalized) if normalized.is_empty() => Ok(name.to_string()),
        Some(normalized) => Ok(format!("{name}/{normalized}")),
        None => Err(Error::MissingFile {
            component: name.to_string(),
            file: file.to_string(),
        }),
    }
}

impl Collection {
    /// Resolve a path specifier to its resources.
    ///
    /// Unknown components fail with `UnresolvedInclusion`, missing files with
    /// `MissingFile`. A component without renderable main files resolves to
    /// an empty set.
    pub fn resource(&self, spec: &str) -> Result<Resources> {
        if let Some(hit) = self.resources.get(spec) {
            return Ok(Arc::clone(hit.value()));
        }

        let canonical = canonical_spec(spec)?;
        if canonical != spec {
            return self.resource(&canonical);
        }

        let (name, file) = split_spec(spec);
        let Some(component) = self.local_component(name) else {
            return match &self.fallback {
                Some(fallback) => fallback.resource(spec),
                None => Err(Error::UnresolvedInclusion(spec.to_string())),
            };
        };

        match file {
            // Main resources are memoized under the bare name at registration
            None => Ok(self
                .resources
                .get(name)
                .map(|hit| Arc::clone(hit.value()))
                .unwrap_or_else(|| Arc::from(Vec::new()))),
            Some(file) => {
                let resource = self.build(&component, file)?;
                Ok(self.memoize(spec, Arc::from(vec![resource])))
            }
        }
    }

    /// Declare a resource with explicit dependencies.
    ///
    /// The dependencies are appended to the memoized resource itself, so
    /// every reference to it, including edges from dependents built earlier,
    /// sees them. For a bare component name they are added to each of its
    /// main resources. A declaration that would close a dependency loop
    /// fails with `Cycle` and changes nothing.
    pub fn resource_with<I, T>(&self, spec: &str, dependencies: I) -> Result<Resources>
    where
        I: IntoIterator<Item = T>,
        T: Into<Target>,
    {
        let mut explicit = Vec::new();
        for dependency in dependencies {
            explicit.extend(self.resolve(dependency.into())?.iter().cloned());
        }
        if explicit.is_empty() {
            return self.resource(spec);
        }

        let (name, _) = split_spec(spec);
        if self.local_component(name).is_none() {
            return match &self.fallback {
                Some(fallback) => fallback.resource_with(spec, [Target::Resources(Arc::from(explicit))]),
                None => Err(Error::UnresolvedInclusion(spec.to_string())),
            };
        }

        let resources = self.resource(spec)?;
        for resource in resources.iter() {
            for dependency in &explicit {
                resource.check_declare(dependency)?;
            }
        }
        for resource in resources.iter() {
            resource.declare(&explicit);
        }
        Ok(resources)
    }

    /// Resolve any target. Resource objects must belong to this collection or
    /// one of its fallbacks.
    pub fn resolve(&self, target: Target) -> Result<Resources> {
        match target {
            Target::Path(spec) => self.resource(&spec),
            Target::Resource(resource) => {
                self.check_owner(&resource)?;
                Ok(Arc::from(vec![resource]))
            }
            Target::Resources(resources) => {
                for resource in resources.iter() {
                    self.check_owner(resource)?;
                }
                Ok(resources)
            }
        }
    }

    /// Main resources of every dependency of `component`, in declaration order.
    pub(super) fn dependency_mains(&self, component: &Component) -> Result<Vec<Arc<Resource>>> {
        let mut mains = Vec::new();
        for dependency in component.dependencies() {
            let resources = self.resource(dependency).map_err(|e| match e {
                Error::UnresolvedInclusion(_) => Error::MissingDependency(dependency.clone()),
                other => other,
            })?;
            mains.extend(resources.iter().cloned());
        }
        Ok(mains)
    }

    /// Construct a resource for `file` of a local component. The file must
    /// exist now; nothing is recorded on failure.
    fn build(&self, component: &Arc<Component>, file: &str) -> Result<Arc<Resource>> {
        if safe_join(component.root(), file).is_none() {
            return Err(Error::MissingFile {
                component: component.name().to_string(),
                file: file.to_string(),
            });
        }

        let inherited = self.dependency_mains(component)?;
        Ok(Arc::new(Resource::new(Arc::clone(component), file, inherited)))
    }

    /// Insert if absent and return whatever is stored, so concurrent first
    /// accesses agree on one instance.
    fn memoize(&self, spec: &str, resources: Resources) -> Resources {
        let entry = self.resources.entry(spec.to_string()).or_insert(resources);
        Arc::clone(entry.value())
    }

    fn check_owner(&self, resource: &Resource) -> Result<()> {
        if self.in_chain(resource.collection()) {
            Ok(())
        } else {
            Err(Error::ForeignResource {
                collection: self.name.clone(),
                resource: resource.spec(),
            })
        }
    }
}
