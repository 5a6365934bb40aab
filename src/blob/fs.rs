//! Filesystem-backed blob store.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::{PantryError, Result};

use super::{BlobItem, BlobStore, METADATA_CONTENT_LENGTH};

/// Extension of the metadata sidecar written next to each blob.
const META_EXT: &str = "meta";

/// Blob store over a local directory.
///
/// A blob with key `"{ownerHex}/{name}"` is stored at
/// `{base_path}/{ownerHex}/{name}` with a JSON metadata sidecar at
/// `{base_path}/{ownerHex}/{name}.meta`.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    base_path: PathBuf,
}

impl FsBlobStore {
    /// Create a store rooted at the given directory, creating it if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Get the base path of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a key to its path under the base directory.
    ///
    /// Keys must not escape the base directory; empty keys and traversal
    /// segments are rejected.
    fn resolve(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty()
            || key.starts_with('/')
            || key.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..")
        {
            return Err(PantryError::Validation(format!("invalid blob key: {key}")));
        }
        Ok(self.base_path.join(key))
    }

    fn meta_path(path: &Path) -> PathBuf {
        let mut os = path.as_os_str().to_owned();
        os.push(".");
        os.push(META_EXT);
        PathBuf::from(os)
    }
}

impl BlobStore for FsBlobStore {
    fn get(&self, key: &str) -> Result<Option<BlobItem>> {
        let path = self.resolve(key)?;

        let data = match fs::read(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let metadata: HashMap<String, String> = match fs::read(Self::meta_path(&path)) {
            Ok(raw) => serde_json::from_slice(&raw)
                .map_err(|e| PantryError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Some(BlobItem {
            key: key.to_string(),
            metadata,
            data,
        }))
    }

    fn upsert(&self, key: &str, data: &[u8], mut metadata: HashMap<String, String>) -> Result<()> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        // Content length is always computed from the actual bytes
        metadata.insert(METADATA_CONTENT_LENGTH.to_string(), data.len().to_string());

        fs::write(&path, data)?;
        let raw = serde_json::to_vec(&metadata)
            .map_err(|e| PantryError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs::write(Self::meta_path(&path), raw)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.resolve(key)?;

        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        match fs::remove_file(Self::meta_path(&path)) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        Ok(())
    }
}
