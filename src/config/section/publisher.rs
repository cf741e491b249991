//! `[publisher]` section configuration.
//!
//! ```toml
//! [publisher]
//! signature = "bowerstatic"   # first segment of every published URL
//! ```

use bowerstatic::DEFAULT_SIGNATURE;
use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublisherConfig {
    pub signature: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            signature: DEFAULT_SIGNATURE.to_string(),
        }
    }
}

impl PublisherConfig {
    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        let signature = self.signature.trim_matches('/');
        if signature.is_empty() || signature.contains('/') {
            diag.error_with_hint(
                FieldPath::new("publisher.signature"),
                format!("invalid signature `{}`", self.signature),
                "use a single path segment such as \"bowerstatic\"",
            );
        }
    }
}
