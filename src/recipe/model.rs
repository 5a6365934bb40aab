//! Recipe and group models for Pantry.
//!
//! Wire field names (`_id`, `groups: [{"_id": n}]`) are the persisted and
//! API contract. Entities are immutable values; updates build a new value
//! from the incoming data rather than mutating in place.

use serde::{Deserialize, Serialize};

use crate::{PantryError, Result};

/// An embedded reference to a group inside a recipe.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupRef {
    /// Referenced group id.
    #[serde(rename = "_id")]
    pub id: i64,
}

/// A stored recipe.
///
/// `images` holds attachment references: externally hosted URLs, or
/// internal paths starting with `/` that resolve into the owner's blob
/// namespace. `groups` holds embedded group references with no
/// storage-level foreign key; cascading cleanup is the application's job.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Recipe {
    /// Unique recipe id.
    #[serde(rename = "_id")]
    pub id: i64,
    /// Owning account; immutable after creation. Not serialized in API
    /// responses.
    #[serde(skip_serializing)]
    pub owner_id: i64,
    /// Recipe title.
    pub title: Option<String>,
    /// Free-text ingredient list.
    pub ingredients: Option<String>,
    /// Free-text directions.
    pub directions: Option<String>,
    /// Ordered attachment references.
    pub images: Vec<String>,
    /// Ordered embedded group references.
    pub groups: Vec<GroupRef>,
}

/// Incoming recipe data for create and update operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecipeData {
    /// Record id; required for update, ignored on create.
    #[serde(rename = "_id", default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub ingredients: Option<String>,
    #[serde(default)]
    pub directions: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub groups: Vec<GroupRef>,
}

/// A stored recipe group.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Group {
    /// Unique group id.
    #[serde(rename = "_id")]
    pub id: i64,
    /// Owning account. Not serialized in API responses.
    #[serde(skip_serializing)]
    pub owner_id: i64,
    /// Group name.
    pub name: Option<String>,
}

/// Incoming group data for create and update operations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupData {
    /// Record id; required for update, ignored on create.
    #[serde(rename = "_id", default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Database row shape for recipes; `images` and `groups` are JSON columns.
pub(crate) type RecipeRow = (
    i64,
    i64,
    Option<String>,
    Option<String>,
    Option<String>,
    String,
    String,
);

impl Recipe {
    pub(crate) fn from_row(row: RecipeRow) -> Result<Self> {
        let images: Vec<String> = serde_json::from_str(&row.5)
            .map_err(|e| PantryError::Database(format!("corrupt images column: {e}")))?;
        let groups: Vec<GroupRef> = serde_json::from_str(&row.6)
            .map_err(|e| PantryError::Database(format!("corrupt groups column: {e}")))?;

        Ok(Self {
            id: row.0,
            owner_id: row.1,
            title: row.2,
            ingredients: row.3,
            directions: row.4,
            images,
            groups,
        })
    }
}

pub(crate) fn to_json(value: &impl Serialize) -> Result<String> {
    serde_json::to_string(value).map_err(|e| PantryError::Database(e.to_string()))
}
