//! Pantry - Personal Recipe Management Service
//!
//! Accounts with signed stateless sessions, an owner-scoped recipe and
//! group store over SQLite, and filesystem blob storage for uploaded
//! images, fronted by a JSON HTTP API.

pub mod account;
pub mod auth;
pub mod blob;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod recipe;
pub mod web;

pub use account::{Account, AccountStore};
pub use auth::{
    hash_password, verify_password, AuthCookie, Credential, SessionAuthenticator, TokenSigner,
    AUTH_COOKIE, AUTH_HEADER,
};
pub use blob::{BlobItem, BlobReferenceTracker, BlobStore, FsBlobStore};
pub use config::Config;
pub use db::Database;
pub use error::{PantryError, Result};
pub use recipe::{
    Group, GroupData, GroupRef, GroupStore, Recipe, RecipeData, RecipeStore, SearchPage,
};
pub use web::{AppState, WebServer};
