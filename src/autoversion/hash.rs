//! Content-hash autoversion using blake3.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use super::{VersionStrategy, walk};

/// Number of hex characters kept from the digest.
const TOKEN_LEN: usize = 16;

/// Version from a digest over every file's relative path and bytes.
///
/// Unlike mtime, touching a file without changing it keeps the version.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContentHashVersion;

impl VersionStrategy for ContentHashVersion {
    fn name(&self) -> &'static str {
        "hash"
    }

    fn version(&self, root: &Path) -> io::Result<String> {
        let mut hasher = blake3::Hasher::new();
        let mut files: Vec<_> = walk(root)?
            .into_iter()
            .filter(|entry| !entry.is_dir)
            .map(|entry| entry.path)
            .collect();
        files.sort();

        for path in files {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            hasher.update(relative.to_string_lossy().as_bytes());
            hasher.update(&[0]);
            hash_file(&mut hasher, &path)?;
        }

        let digest = hex::encode(hasher.finalize().as_bytes());
        Ok(digest[..TOKEN_LEN].to_string())
    }
}

fn hash_file(hasher: &mut blake3::Hasher, path: &Path) -> io::Result<()> {
    let mut reader = BufReader::with_capacity(64 * 1024, File::open(path)?);
    let mut buffer = [0u8; 64 * 1024];
    loop {
        match reader.read(&mut buffer) {
            Ok(0) => return Ok(()),
            Ok(n) => {
                hasher.update(&buffer[..n]);
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}
