//! Attachment reference cleanup.

use std::sync::Arc;

use tracing::{debug, warn};

use super::BlobStore;

/// Deletes blobs whose attachment references have been dropped from a
/// recipe.
///
/// An attachment reference is either an externally hosted URL (left alone)
/// or an internal path starting with `/`, which resolves to the blob key
/// `"{ownerHex}{path}"`. Deletions are fire-and-forget: a failed delete is
/// logged and does not fail the caller, and re-running the cleanup is safe
/// because deleting an absent key is a no-op.
#[derive(Clone)]
pub struct BlobReferenceTracker {
    store: Arc<dyn BlobStore>,
}

impl BlobReferenceTracker {
    /// Create a tracker over the given blob store.
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Check whether a reference points at an internally stored blob.
    pub fn is_internal(reference: &str) -> bool {
        reference.starts_with('/')
    }

    /// Resolve an internal reference to its owner-scoped blob key.
    ///
    /// Image keys are scoped by owner so an account can only ever address
    /// its own uploads.
    pub fn resolve_key(owner_id: i64, reference: &str) -> String {
        format!("{owner_id:x}{reference}")
    }

    /// Delete the blobs behind every internal reference in `removed`.
    pub fn release<'a>(&self, owner_id: i64, removed: impl IntoIterator<Item = &'a str>) {
        for reference in removed {
            if !Self::is_internal(reference) {
                continue;
            }
            let key = Self::resolve_key(owner_id, reference);
            match self.store.delete(&key) {
                Ok(()) => debug!(key = %key, "released blob"),
                Err(e) => warn!(key = %key, error = %e, "failed to delete blob"),
            }
        }
    }
}

impl std::fmt::Debug for BlobReferenceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobReferenceTracker").finish()
    }
}
