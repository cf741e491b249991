//! Error types for component loading, resolution and rendering.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while configuring collections or handling inclusions.
///
/// Configuration-time variants (`Load`, `DuplicateName`, `MissingDependency`)
/// surface while collections are being built. Request-time variants
/// (`MissingFile`, `UnresolvedInclusion`, `Render`, `Cycle`) surface from
/// `include()` and `render()`. Serving never returns these; it answers 404.
#[derive(Debug, Error)]
pub enum Error {
    #[error("cannot load component from `{path}`: {reason}")]
    Load { path: PathBuf, reason: String },

    #[error("duplicate name `{name}` in `{scope}`")]
    DuplicateName { scope: String, name: String },

    #[error("component '{0}' missing")]
    MissingDependency(String),

    #[error("file `{file}` of component `{component}` does not exist")]
    MissingFile { component: String, file: String },

    #[error("cannot find component for path (need restart?): {0}")]
    UnresolvedInclusion(String),

    #[error("no renderer for extension `{ext}` (url: {url})")]
    Render { ext: String, url: String },

    #[error("dependency cycle detected: {0}")]
    Cycle(String),

    #[error("resource `{resource}` does not belong to collection `{collection}`")]
    ForeignResource { collection: String, resource: String },

    #[error("unknown collection `{0}`")]
    UnknownCollection(String),

    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] io::Error),
}

impl Error {
    pub(crate) fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
