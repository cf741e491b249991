//! `[serve]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [serve]
//! interface = "127.0.0.1"     # Network interface (127.0.0.1 = localhost only)
//! port = 5277                 # HTTP port number
//! root = "public"             # HTML pages served as the host application
//! collection = "local"        # collection pages include from
//! include = ["jquery-ui"]     # path specifiers included in every page
//! ```
//!
//! Use `interface = "0.0.0.0"` to make the server accessible from LAN.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath, util::expand_path};

/// Server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Network interface to bind.
    pub interface: IpAddr,

    /// HTTP port number.
    pub port: u16,

    /// Directory of pages served for non-published paths.
    pub root: PathBuf,

    /// Collection used for page includes. Defaults to the last declared.
    pub collection: Option<String>,

    /// Path specifiers included into every HTML page.
    pub include: Vec<String>,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1)),
            port: 5277,
            root: PathBuf::from("public"),
            collection: None,
            include: Vec::new(),
        }
    }
}

impl ServeConfig {
    pub fn normalize(&mut self, root: &Path) {
        self.root = expand_path(&self.root, root);
    }

    pub fn validate(&self, collections: &[&str], diag: &mut ConfigDiagnostics) {
        if let Some(name) = &self.collection
            && !collections.contains(&name.as_str())
        {
            diag.error(
                FieldPath::new("serve.collection"),
                format!("unknown collection `{name}`"),
            );
        }
        if !self.include.is_empty() && collections.is_empty() {
            diag.error(
                FieldPath::new("serve.include"),
                "includes configured but no collection declared",
            );
        }
        if !self.root.is_dir() {
            diag.warn(
                FieldPath::new("serve.root"),
                format!("`{}` is not a directory; pages will 404", self.root.display()),
            );
        }
    }
}
