//! `[[collection]]` section configuration.
//!
//! ```toml
//! [[collection]]
//! name = "components"
//! path = "bower_components"      # installed components directory
//!
//! [[collection]]
//! name = "local"
//! fallback = "components"        # resolve unknown names in `components`
//!
//! [[collection.component]]
//! path = "app"                   # directory with a bower.json
//! autoversion = "hash"           # or: version = "1.0.0"
//! ```

use bowerstatic::autoversion::strategy_from_name;
use bowerstatic::Version;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::config::{ConfigDiagnostics, FieldPath, util::expand_path};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub name: String,

    /// Installed components directory (`.bower.json` per component).
    #[serde(default)]
    pub path: Option<PathBuf>,

    /// Collection to consult for names this one does not register.
    #[serde(default)]
    pub fallback: Option<String>,

    /// Working-copy components registered individually.
    #[serde(default, rename = "component")]
    pub components: Vec<ComponentConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentConfig {
    pub path: PathBuf,

    /// Explicit version, overriding the descriptor.
    #[serde(default)]
    pub version: Option<String>,

    /// Autoversion strategy: `second`, `microsecond` or `hash`.
    #[serde(default)]
    pub autoversion: Option<String>,
}

impl ComponentConfig {
    /// Version override for loading. `None` uses the descriptor.
    pub fn version(&self) -> Option<Version> {
        if let Some(name) = &self.autoversion {
            return strategy_from_name(name).map(Version::Auto);
        }
        self.version.clone().map(Version::Fixed)
    }
}

impl CollectionConfig {
    pub fn normalize(&mut self, root: &Path) {
        if let Some(path) = self.path.take() {
            self.path = Some(expand_path(&path, root));
        }
        for component in &mut self.components {
            component.path = expand_path(&component.path, root);
        }
    }

    /// Validate one collection. `declared` holds the names of collections
    /// declared before this one.
    pub fn validate(&self, declared: &FxHashSet<String>, diag: &mut ConfigDiagnostics) {
        if self.name.is_empty() || self.name.contains('/') {
            diag.error(
                FieldPath::new("collection.name"),
                format!("invalid collection name `{}`", self.name),
            );
        }
        if declared.contains(&self.name) {
            diag.error(
                FieldPath::new("collection.name"),
                format!("duplicate collection `{}`", self.name),
            );
        }

        match (&self.path, &self.fallback) {
            (Some(_), Some(_)) => diag.error_with_hint(
                FieldPath::new("collection.fallback"),
                format!("collection `{}` has both `path` and `fallback`", self.name),
                "a directory collection cannot fall back; declare a separate local collection",
            ),
            (Some(path), None) if !path.is_dir() => diag.error(
                FieldPath::new("collection.path"),
                format!("`{}` is not a directory", path.display()),
            ),
            (None, Some(fallback)) if !declared.contains(fallback) => diag.error_with_hint(
                FieldPath::new("collection.fallback"),
                format!("unknown collection `{fallback}`"),
                "declare the fallback collection before this one",
            ),
            _ => {}
        }

        for component in &self.components {
            component.validate(diag);
        }
    }
}

impl ComponentConfig {
    fn validate(&self, diag: &mut ConfigDiagnostics) {
        if self.version.is_some() && self.autoversion.is_some() {
            diag.error(
                FieldPath::new("collection.component.autoversion"),
                format!("`{}` sets both `version` and `autoversion`", self.path.display()),
            );
        }
        if let Some(name) = &self.autoversion
            && strategy_from_name(name).is_none()
        {
            diag.error_with_hint(
                FieldPath::new("collection.component.autoversion"),
                format!("unknown autoversion strategy `{name}`"),
                "use \"second\", \"microsecond\" or \"hash\"",
            );
        }
        if !self.path.is_dir() {
            diag.error(
                FieldPath::new("collection.component.path"),
                format!("`{}` is not a directory", self.path.display()),
            );
        }
    }
}
