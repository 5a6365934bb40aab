//! Account model for Pantry.

use serde::Serialize;

use crate::auth::Credential;

/// A registered account as returned to callers.
///
/// The stored credential is never part of this value; it stays inside the
/// account store.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Account {
    /// Unique account id. Stripped from external responses by the web layer.
    #[serde(rename = "_id")]
    pub id: i64,
    /// Normalized (trimmed, lowercased) email address; globally unique.
    pub email: String,
    /// Optional display name.
    pub name: Option<String>,
}

/// Full account record as persisted, credential included. Internal to the
/// account store.
#[derive(Debug, Clone)]
pub(crate) struct AccountRecord {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub credential: Credential,
}

impl AccountRecord {
    /// Strip the credential for return to callers.
    pub fn scrub(self) -> Account {
        Account {
            id: self.id,
            email: self.email,
            name: self.name,
        }
    }
}
