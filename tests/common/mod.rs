//! Test helpers for Pantry web API tests.

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};
use tempfile::TempDir;

use pantry::auth::{SessionAuthenticator, TokenSigner};
use pantry::blob::FsBlobStore;
use pantry::web::{create_router, AppState};
use pantry::Database;

/// Create a test server over an in-memory database and a temp blob
/// directory.
///
/// The returned `TempDir` must be kept alive for the duration of the test;
/// dropping it deletes the blob directory.
pub async fn create_test_server() -> (TestServer, TempDir) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let blobs_dir = TempDir::new().expect("Failed to create blob directory");
    let files = Arc::new(FsBlobStore::new(blobs_dir.path()).expect("Failed to create blob store"));
    let sessions = SessionAuthenticator::new(TokenSigner::new("test-secret-key-for-testing-only"));

    let state = AppState::new(&db, files, sessions, 10);
    let mut server = TestServer::new(create_router(state)).expect("Failed to create test server");
    // Carry the auth cookie across requests like a browser would
    server.save_cookies();

    (server, blobs_dir)
}

/// Register an account and return the response body. The server picks up
/// the session cookie automatically.
pub async fn register_account(server: &TestServer, name: &str, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/account")
        .json(&json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .await;

    response.assert_status_ok();
    response.json::<Value>()
}

/// Create a recipe from a JSON payload and return its id.
pub async fn create_recipe(server: &TestServer, payload: Value) -> i64 {
    let response = server.post("/api/recipes").json(&payload).await;
    response.assert_status_ok();
    response.json::<Value>()["_id"]
        .as_i64()
        .expect("recipe id")
}

/// Create a group and return its id.
pub async fn create_group(server: &TestServer, name: &str) -> i64 {
    let response = server
        .post("/api/groups")
        .json(&json!({ "name": name }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["_id"].as_i64().expect("group id")
}
