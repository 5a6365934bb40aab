//! Database schema migrations for Pantry.
//!
//! Each entry is one migration, applied in order inside a transaction and
//! recorded in the `schema_version` table.

/// All schema migrations, oldest first.
pub const MIGRATIONS: &[&str] = &[
    // v1: accounts
    "CREATE TABLE accounts (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        email           TEXT NOT NULL UNIQUE,
        name            TEXT,
        password_hash   BLOB NOT NULL,
        password_salt   BLOB NOT NULL,
        created_at      TEXT NOT NULL DEFAULT (datetime('now'))
    );",
    // v2: recipes and groups
    //
    // `images` and `groups` are JSON columns: an array of attachment
    // reference strings and an array of {"_id": n} objects. Identifiers are
    // AUTOINCREMENT so descending id order is creation order.
    "CREATE TABLE recipes (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id        INTEGER NOT NULL,
        title           TEXT,
        ingredients     TEXT,
        directions      TEXT,
        images          TEXT NOT NULL DEFAULT '[]',
        groups          TEXT NOT NULL DEFAULT '[]',
        created_at      TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX idx_recipes_owner ON recipes(owner_id);

    CREATE TABLE groups (
        id              INTEGER PRIMARY KEY AUTOINCREMENT,
        owner_id        INTEGER NOT NULL,
        name            TEXT,
        created_at      TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX idx_groups_owner ON groups(owner_id);",
];
