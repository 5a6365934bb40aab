//! Owner-scoped recipe storage.

use std::collections::HashSet;

use serde::Serialize;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::info;

use crate::blob::BlobReferenceTracker;
use crate::{PantryError, Result};

use super::model::{to_json, Recipe, RecipeData, RecipeRow};
use super::search::{match_phrase, SearchIndex};

/// Hard cap on the search page size.
pub const MAX_PAGE_SIZE: i64 = 1000;

const RECIPE_COLUMNS: &str = "id, owner_id, title, ingredients, directions, images, groups";

/// One page of search results.
///
/// `total` counts every match for the filters, independent of the page
/// window.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    pub total: i64,
    pub results: Vec<Recipe>,
}

/// Store for recipes.
///
/// Every operation takes the acting owner's id and only ever touches that
/// owner's rows, so an authenticated caller cannot read or modify another
/// account's recipes. Dropped internal image references are released to the
/// blob store as a side effect of update and remove.
#[derive(Clone)]
pub struct RecipeStore {
    pool: SqlitePool,
    blobs: BlobReferenceTracker,
    index: SearchIndex,
}

impl RecipeStore {
    /// Create a store over the given pool and blob tracker.
    pub fn new(pool: SqlitePool, blobs: BlobReferenceTracker) -> Self {
        let index = SearchIndex::new(pool.clone());
        Self { pool, blobs, index }
    }

    /// Get one of the owner's recipes by id.
    pub async fn get(&self, owner_id: i64, id: i64) -> Result<Recipe> {
        let row: Option<RecipeRow> = sqlx::query_as(&format!(
            "SELECT {RECIPE_COLUMNS} FROM recipes WHERE owner_id = ? AND id = ?"
        ))
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Recipe::from_row)
            .ok_or_else(|| PantryError::NotFound("recipe".to_string()))?
    }

    /// Create a recipe for the owner. Any id in `data` is ignored.
    pub async fn create(&self, owner_id: i64, data: RecipeData) -> Result<Recipe> {
        let images = to_json(&data.images)?;
        let groups = to_json(&data.groups)?;

        let result = sqlx::query(
            "INSERT INTO recipes (owner_id, title, ingredients, directions, images, groups)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(owner_id)
        .bind(&data.title)
        .bind(&data.ingredients)
        .bind(&data.directions)
        .bind(&images)
        .bind(&groups)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(owner_id, recipe_id = id, "created recipe");

        Ok(Recipe {
            id,
            owner_id,
            title: data.title,
            ingredients: data.ingredients,
            directions: data.directions,
            images: data.images,
            groups: data.groups,
        })
    }

    /// Replace one of the owner's recipes with `data`.
    ///
    /// The record is fully replaced; absent fields in `data` clear the
    /// stored value. Internal image references present before but not
    /// after the update have their blobs deleted.
    pub async fn update(&self, owner_id: i64, data: RecipeData) -> Result<Recipe> {
        let id = data
            .id
            .ok_or_else(|| PantryError::Validation("recipe id is required".to_string()))?;

        let previous: Option<(String,)> =
            sqlx::query_as("SELECT images FROM recipes WHERE owner_id = ? AND id = ?")
                .bind(owner_id)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        let (previous_images,) =
            previous.ok_or_else(|| PantryError::NotFound("recipe".to_string()))?;
        let previous_images: Vec<String> = serde_json::from_str(&previous_images)
            .map_err(|e| PantryError::Database(format!("corrupt images column: {e}")))?;

        let images = to_json(&data.images)?;
        let groups = to_json(&data.groups)?;

        let result = sqlx::query(
            "UPDATE recipes
             SET title = ?, ingredients = ?, directions = ?, images = ?, groups = ?
             WHERE owner_id = ? AND id = ?",
        )
        .bind(&data.title)
        .bind(&data.ingredients)
        .bind(&data.directions)
        .bind(&images)
        .bind(&groups)
        .bind(owner_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(PantryError::NotFound("recipe".to_string()));
        }

        let kept: HashSet<&str> = data.images.iter().map(String::as_str).collect();
        let removed = previous_images
            .iter()
            .map(String::as_str)
            .filter(|r| !kept.contains(r));
        self.blobs.release(owner_id, removed);

        info!(owner_id, recipe_id = id, "updated recipe");

        Ok(Recipe {
            id,
            owner_id,
            title: data.title,
            ingredients: data.ingredients,
            directions: data.directions,
            images: data.images,
            groups: data.groups,
        })
    }

    /// Remove one of the owner's recipes and release its internal image
    /// blobs.
    ///
    /// Removing an absent recipe is a no-op, so deletes are idempotent.
    pub async fn remove(&self, owner_id: i64, id: i64) -> Result<()> {
        // Fetch-and-delete in one statement so a concurrent remove can't
        // release the same blobs twice
        let images: Option<String> = sqlx::query_scalar(
            "DELETE FROM recipes WHERE owner_id = ? AND id = ? RETURNING images",
        )
        .bind(owner_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(images) = images {
            let images: Vec<String> = serde_json::from_str(&images)
                .map_err(|e| PantryError::Database(format!("corrupt images column: {e}")))?;
            self.blobs.release(owner_id, images.iter().map(String::as_str));
            info!(owner_id, recipe_id = id, "removed recipe");
        }

        Ok(())
    }

    /// Search the owner's recipes.
    ///
    /// `keyword` matches against title, ingredients, and directions;
    /// `group_id` restricts to recipes referencing that group. Filters are
    /// conjunctive. Results are ordered newest first (descending id), and
    /// `total` counts every match regardless of the `start`/`count` window.
    pub async fn search(
        &self,
        owner_id: i64,
        keyword: Option<&str>,
        group_id: Option<i64>,
        start: i64,
        count: i64,
    ) -> Result<SearchPage> {
        if count > MAX_PAGE_SIZE {
            return Err(PantryError::Validation(format!(
                "count must not exceed {MAX_PAGE_SIZE}"
            )));
        }

        self.index.ensure().await?;

        let keyword = keyword.map(str::trim).filter(|k| !k.is_empty());
        let start = start.max(0);
        let count = count.max(0);

        let mut count_query = QueryBuilder::new("SELECT COUNT(*) FROM recipes");
        push_filters(&mut count_query, owner_id, keyword, group_id);
        let total: i64 = count_query
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await?;

        let mut page_query =
            QueryBuilder::new(format!("SELECT {RECIPE_COLUMNS} FROM recipes"));
        push_filters(&mut page_query, owner_id, keyword, group_id);
        page_query.push(" ORDER BY id DESC LIMIT ");
        page_query.push_bind(count);
        page_query.push(" OFFSET ");
        page_query.push_bind(start);

        let rows: Vec<RecipeRow> = page_query.build_query_as().fetch_all(&self.pool).await?;
        let results = rows
            .into_iter()
            .map(Recipe::from_row)
            .collect::<Result<Vec<_>>>()?;

        Ok(SearchPage { total, results })
    }
}

fn push_filters(
    query: &mut QueryBuilder<'_, Sqlite>,
    owner_id: i64,
    keyword: Option<&str>,
    group_id: Option<i64>,
) {
    query.push(" WHERE owner_id = ");
    query.push_bind(owner_id);

    if let Some(keyword) = keyword {
        query.push(" AND id IN (SELECT rowid FROM recipe_fts WHERE recipe_fts MATCH ");
        query.push_bind(match_phrase(keyword));
        query.push(")");
    }

    if let Some(group_id) = group_id {
        query.push(
            " AND EXISTS (SELECT 1 FROM json_each(recipes.groups) \
             WHERE json_extract(json_each.value, '$._id') = ",
        );
        query.push_bind(group_id);
        query.push(")");
    }
}

impl std::fmt::Debug for RecipeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecipeStore").finish()
    }
}
