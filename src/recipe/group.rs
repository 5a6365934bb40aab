//! Recipe group storage.

use sqlx::SqlitePool;
use tracing::info;

use crate::{PantryError, Result};

use super::model::{to_json, Group, GroupData, GroupRef};

/// Store for recipe groups.
///
/// Groups are referenced from recipes by embedded `{"_id": n}` values with
/// no storage-level constraint, so removal has to scrub those references
/// itself.
#[derive(Clone)]
pub struct GroupStore {
    pool: SqlitePool,
}

impl GroupStore {
    /// Create a store over the given database pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all of the owner's groups, oldest first.
    pub async fn get_groups(&self, owner_id: i64) -> Result<Vec<Group>> {
        let rows: Vec<(i64, i64, Option<String>)> =
            sqlx::query_as("SELECT id, owner_id, name FROM groups WHERE owner_id = ? ORDER BY id")
                .bind(owner_id)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, owner_id, name)| Group { id, owner_id, name })
            .collect())
    }

    /// Create a group for the owner. Any id in `data` is ignored.
    pub async fn create_group(&self, owner_id: i64, data: GroupData) -> Result<Group> {
        let result = sqlx::query("INSERT INTO groups (owner_id, name) VALUES (?, ?)")
            .bind(owner_id)
            .bind(&data.name)
            .execute(&self.pool)
            .await?;

        let id = result.last_insert_rowid();
        info!(owner_id, group_id = id, "created group");

        Ok(Group {
            id,
            owner_id,
            name: data.name,
        })
    }

    /// Replace one of the owner's groups with `data`.
    pub async fn update_group(&self, owner_id: i64, data: GroupData) -> Result<Group> {
        let id = data
            .id
            .ok_or_else(|| PantryError::Validation("group id is required".to_string()))?;

        let result = sqlx::query("UPDATE groups SET name = ? WHERE owner_id = ? AND id = ?")
            .bind(&data.name)
            .bind(owner_id)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(PantryError::NotFound("group".to_string()));
        }

        info!(owner_id, group_id = id, "updated group");

        Ok(Group {
            id,
            owner_id,
            name: data.name,
        })
    }

    /// Remove one of the owner's groups and scrub its references from
    /// recipes.
    ///
    /// The reference scrub runs over every recipe holding the id, not just
    /// the owner's, and it runs whether or not the group row itself exists.
    /// Removing an absent group is otherwise a no-op.
    pub async fn remove_group(&self, owner_id: i64, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let referencing: Vec<(i64, String)> = sqlx::query_as(
            "SELECT id, groups FROM recipes WHERE EXISTS (
                 SELECT 1 FROM json_each(recipes.groups)
                 WHERE json_extract(json_each.value, '$._id') = ?
             )",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        for (recipe_id, groups) in referencing {
            let groups: Vec<GroupRef> = serde_json::from_str(&groups)
                .map_err(|e| PantryError::Database(format!("corrupt groups column: {e}")))?;
            let remaining: Vec<GroupRef> = groups.into_iter().filter(|g| g.id != id).collect();

            sqlx::query("UPDATE recipes SET groups = ? WHERE id = ?")
                .bind(to_json(&remaining)?)
                .bind(recipe_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM groups WHERE owner_id = ? AND id = ?")
            .bind(owner_id)
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        info!(owner_id, group_id = id, "removed group");

        Ok(())
    }
}

impl std::fmt::Debug for GroupStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GroupStore").finish()
    }
}
