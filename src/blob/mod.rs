//! Blob storage for Pantry.
//!
//! Uploaded recipe images live in an opaque key/value byte store with
//! string metadata. Keys are scoped by the owning account's hex id
//! (`"{ownerHex}/{name}"`) so one account's upload can't be reached through
//! another account even if the name is known.

mod fs;
mod tracker;

pub use fs::FsBlobStore;
pub use tracker::BlobReferenceTracker;

use std::collections::HashMap;

use crate::Result;

/// Reserved metadata key: content MIME type.
pub const METADATA_MIME_TYPE: &str = "Content-Type";

/// Reserved metadata key: content length. Computed from the stored bytes,
/// never trusted from the caller.
pub const METADATA_CONTENT_LENGTH: &str = "Content-Length";

/// A stored blob: its key, metadata, and content bytes.
#[derive(Debug, Clone)]
pub struct BlobItem {
    /// Storage key.
    pub key: String,
    /// String metadata (MIME type, content length, ...).
    pub metadata: HashMap<String, String>,
    /// Content bytes.
    pub data: Vec<u8>,
}

/// Interface to a simple binary data store. Could be backed by S3, a local
/// filesystem, a database, etc.
pub trait BlobStore: Send + Sync {
    /// Fetch a blob by key; `None` when absent.
    fn get(&self, key: &str) -> Result<Option<BlobItem>>;

    /// Store or replace a blob. The content length metadata entry is
    /// computed from `data`.
    fn upsert(&self, key: &str, data: &[u8], metadata: HashMap<String, String>) -> Result<()>;

    /// Delete a blob. Deleting an absent key is not an error.
    fn delete(&self, key: &str) -> Result<()>;
}
