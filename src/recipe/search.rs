//! Full-text search index over recipe free-text fields.
//!
//! The index is an FTS5 external-content table kept in sync with `recipes`
//! by triggers. It is created lazily on first use rather than by a schema
//! migration, so a deployment that never searches never pays for it.

use std::sync::Arc;

use sqlx::SqlitePool;
use tokio::sync::OnceCell;
use tracing::info;

use crate::Result;

const FTS_TABLE: &str = "recipe_fts";

const FTS_SETUP: &[&str] = &[
    "CREATE VIRTUAL TABLE recipe_fts USING fts5(
        title, ingredients, directions,
        content='recipes', content_rowid='id'
    )",
    "CREATE TRIGGER recipes_fts_insert AFTER INSERT ON recipes BEGIN
        INSERT INTO recipe_fts(rowid, title, ingredients, directions)
        VALUES (new.id, new.title, new.ingredients, new.directions);
    END",
    "CREATE TRIGGER recipes_fts_delete AFTER DELETE ON recipes BEGIN
        INSERT INTO recipe_fts(recipe_fts, rowid, title, ingredients, directions)
        VALUES ('delete', old.id, old.title, old.ingredients, old.directions);
    END",
    "CREATE TRIGGER recipes_fts_update AFTER UPDATE ON recipes BEGIN
        INSERT INTO recipe_fts(recipe_fts, rowid, title, ingredients, directions)
        VALUES ('delete', old.id, old.title, old.ingredients, old.directions);
        INSERT INTO recipe_fts(rowid, title, ingredients, directions)
        VALUES (new.id, new.title, new.ingredients, new.directions);
    END",
    // Index rows that existed before the table was created
    "INSERT INTO recipe_fts(recipe_fts) VALUES ('rebuild')",
];

/// Lazily ensured full-text index.
///
/// Ensuring is idempotent: the table's existence is checked before
/// creation, and a process-local cell skips the check after the first
/// successful call.
#[derive(Clone)]
pub(crate) struct SearchIndex {
    pool: SqlitePool,
    ensured: Arc<OnceCell<()>>,
}

impl SearchIndex {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            ensured: Arc::new(OnceCell::new()),
        }
    }

    /// Create the index and its sync triggers if they do not exist yet.
    pub async fn ensure(&self) -> Result<()> {
        self.ensured
            .get_or_try_init(|| async {
                let exists: Option<String> = sqlx::query_scalar(
                    "SELECT name FROM sqlite_master WHERE type = 'table' AND name = ?",
                )
                .bind(FTS_TABLE)
                .fetch_optional(&self.pool)
                .await?;

                if exists.is_none() {
                    info!("creating recipe search index");
                    for statement in FTS_SETUP {
                        sqlx::raw_sql(statement).execute(&self.pool).await?;
                    }
                }
                Ok::<_, crate::PantryError>(())
            })
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for SearchIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchIndex").finish()
    }
}

/// Quote a keyword as an FTS5 phrase so user input is never parsed as
/// query syntax.
pub(crate) fn match_phrase(keyword: &str) -> String {
    format!("\"{}\"", keyword.replace('"', "\"\""))
}
