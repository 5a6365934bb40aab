//! HTTP handlers for the Pantry API.

pub mod account;
pub mod files;
pub mod group;
pub mod recipe;

use std::sync::Arc;

use crate::account::AccountStore;
use crate::auth::SessionAuthenticator;
use crate::blob::{BlobReferenceTracker, BlobStore};
use crate::recipe::{GroupStore, RecipeStore};
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Account store.
    pub accounts: AccountStore,
    /// Recipe store.
    pub recipes: RecipeStore,
    /// Group store.
    pub groups: GroupStore,
    /// Blob store backing file uploads and recipe images.
    pub files: Arc<dyn BlobStore>,
    /// Session token authenticator.
    pub sessions: Arc<SessionAuthenticator>,
    /// Maximum accepted upload size in bytes.
    pub max_upload_size: usize,
}

impl AppState {
    /// Create the application state.
    pub fn new(
        db: &Database,
        files: Arc<dyn BlobStore>,
        sessions: SessionAuthenticator,
        max_upload_size_mb: u64,
    ) -> Self {
        let pool = db.pool().clone();
        Self {
            accounts: AccountStore::new(pool.clone()),
            recipes: RecipeStore::new(
                pool.clone(),
                BlobReferenceTracker::new(files.clone()),
            ),
            groups: GroupStore::new(pool),
            files,
            sessions: Arc::new(sessions),
            max_upload_size: (max_upload_size_mb as usize) * 1024 * 1024,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState").finish()
    }
}
