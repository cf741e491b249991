//! Configuration management for `bowerstatic.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── collection # [[collection]] and [[collection.component]]
//! │   ├── publisher  # [publisher]
//! │   └── serve      # [serve]
//! ├── types/         # ConfigError, diagnostics, field paths
//! └── mod.rs         # BowerConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section            | Purpose                                          |
//! |--------------------|--------------------------------------------------|
//! | `[publisher]`      | URL signature                                    |
//! | `[[collection]]`   | Component directories, local collections         |
//! | `[renderers]`      | Extension -> template or ready-made render name  |
//! | `[serve]`          | Server address, page root, page includes         |

pub mod section;
pub mod types;
mod util;

pub use section::{CollectionConfig, PublisherConfig, ServeConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use anyhow::{Context, Result};
use bowerstatic::{Bower, Render, log};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::cli::{Cli, Commands};
use util::find_config_file;

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing bowerstatic.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BowerConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Directory of the config file; relative paths resolve against it
    #[serde(skip)]
    pub root: PathBuf,

    #[serde(default)]
    pub publisher: PublisherConfig,

    /// Collections in declaration order. A fallback must be declared first.
    #[serde(default)]
    pub collection: Vec<CollectionConfig>,

    /// Extension -> template (`<x src="{url}">`) or ready-made render name.
    #[serde(default)]
    pub renderers: BTreeMap<String, String>,

    #[serde(default)]
    pub serve: ServeConfig,
}

impl BowerConfig {
    /// Load configuration for the invoked command.
    ///
    /// Searches upward from cwd for the config file; its directory becomes
    /// the root for relative paths.
    pub fn load(cli: &Cli) -> Result<Self> {
        let config_path = find_config_file(&cli.config).ok_or_else(|| {
            ConfigError::Validation(format!("config file `{}` not found", cli.config.display()))
        })?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.finalize(cli);
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Resolve paths and apply command-line overrides.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        self.normalize_paths(&root);
        self.root = root;

        if let Commands::Serve { interface, port } = &cli.command {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
    }

    fn normalize_paths(&mut self, root: &Path) {
        for collection in &mut self.collection {
            collection.normalize(root);
        }
        self.serve.normalize(root);
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate the whole configuration, reporting every error at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.publisher.validate(&mut diag);

        let mut declared = FxHashSet::default();
        for collection in &self.collection {
            collection.validate(&declared, &mut diag);
            declared.insert(collection.name.clone());
        }

        for (ext, template) in &self.renderers {
            if Render::builtin(template).is_none()
                && !template.contains("{url}")
                && !template.contains("{content}")
            {
                diag.error_with_hint(
                    FieldPath::new("renderers"),
                    format!("renderer for `{ext}` uses neither {{url}} nor {{content}}"),
                    "use a template like \"<script src=\\\"{url}\\\"></script>\" or a name like \"inline-script\"",
                );
            }
        }

        let names: Vec<&str> = self.collection.iter().map(|c| c.name.as_str()).collect();
        self.serve.validate(&names, &mut diag);

        diag.print_warnings();
        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    // ========================================================================
    // registry construction
    // ========================================================================

    /// Build the collection registry described by this configuration.
    pub fn build_bower(&self) -> Result<Arc<Bower>> {
        let bower = Bower::with_signature(&self.publisher.signature);

        for (ext, template) in &self.renderers {
            let render = Render::builtin(template).unwrap_or_else(|| Render::template(template));
            bower.register_renderer(ext, render);
        }

        for config in &self.collection {
            let collection = match (&config.path, &config.fallback) {
                (Some(path), _) => bower.components(&config.name, path),
                (None, Some(fallback)) => bower
                    .require(fallback)
                    .and_then(|fallback| bower.local_components(&config.name, &fallback)),
                (None, None) => bower.new_collection(&config.name),
            }
            .with_context(|| format!("failed to build collection `{}`", config.name))?;

            for component in &config.components {
                collection
                    .load_component(&component.path, component.version())
                    .with_context(|| {
                        format!(
                            "failed to load component `{}` into `{}`",
                            component.path.display(),
                            config.name
                        )
                    })?;
            }
        }

        Ok(Arc::new(bower))
    }

    /// Collection used for page includes and `resolve`.
    pub fn default_collection(&self) -> Option<&str> {
        self.serve
            .collection
            .as_deref()
            .or_else(|| self.collection.last().map(|c| c.name.as_str()))
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config content.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> BowerConfig {
    let (parsed, ignored) = BowerConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
