//! Modification-time autoversion.
//!
//! The token is the newest mtime across the walked tree, directories
//! included, so adding or removing a file bumps the version too.

use std::io;
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{VersionStrategy, walk};
use crate::utils::date::{DateTimeUtc, Precision};

/// Version from the latest modification time under the component root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MtimeVersion {
    precision: Precision,
}

impl MtimeVersion {
    pub const fn seconds() -> Self {
        Self {
            precision: Precision::Second,
        }
    }

    pub const fn microseconds() -> Self {
        Self {
            precision: Precision::Microsecond,
        }
    }
}

impl VersionStrategy for MtimeVersion {
    fn name(&self) -> &'static str {
        match self.precision {
            Precision::Second => "second",
            Precision::Microsecond => "microsecond",
        }
    }

    fn version(&self, root: &Path) -> io::Result<String> {
        let latest = latest_mtime(root)?;
        Ok(DateTimeUtc::from_system_time(latest).to_iso(self.precision))
    }
}

/// Newest modification time of any walked entry under `root`.
pub fn latest_mtime(root: &Path) -> io::Result<SystemTime> {
    let latest = walk(root)?
        .iter()
        .filter_map(|entry| entry.metadata.modified().ok())
        .max()
        .unwrap_or(UNIX_EPOCH);
    Ok(latest)
}
