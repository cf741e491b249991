//! Component dependency resolution and versioned static publishing.
//!
//! ```text
//! descriptor ──> Component ──> Collection ──> Resource graph
//!                                   │
//!            Includer ──> Inclusions ──> render() ──> inject()
//!
//! /{signature}/{collection}/{component}/{version}/{file} ──> Publisher::route()
//! ```
//!
//! A [`Bower`] owns named [`Collection`]s of components. Request handlers
//! record inclusions through an [`Includer`]; the rendered snippet block is
//! spliced into HTML responses before `</head>`. Published file addresses
//! embed the component's effective version, so a changed component gets a
//! new address and old addresses stop resolving.

pub mod autoversion;
pub mod bower;
pub mod collection;
pub mod component;
pub mod error;
pub mod include;
pub mod inject;
pub mod logger;
pub mod publish;
pub mod render;
pub mod utils;

#[cfg(test)]
mod testing;

pub use autoversion::{ContentHashVersion, MtimeVersion, VersionStrategy};
pub use bower::{Bower, DEFAULT_SIGNATURE};
pub use collection::{Collection, Resource, Resources, Target};
pub use component::{Component, Version};
pub use error::{Error, Result};
pub use include::{Includer, Inclusion, Inclusions};
pub use publish::{FOREVER, PublishedFile, Publisher, Route};
pub use render::{Render, Renderer};
