//! Configuration section definitions.
//!
//! Each module corresponds to a section in `bowerstatic.toml`:
//!
//! | Module       | TOML Section     | Purpose                              |
//! |--------------|------------------|--------------------------------------|
//! | `publisher`  | `[publisher]`    | URL signature                        |
//! | `collection` | `[[collection]]` | Component directories and fallbacks  |
//! | `serve`      | `[serve]`        | Server address, pages, includes      |

mod collection;
mod publisher;
mod serve;

pub use collection::{CollectionConfig, ComponentConfig};
pub use publisher::PublisherConfig;
pub use serve::ServeConfig;
