//! Web API group tests.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{create_group, create_recipe, create_test_server, register_account};

#[tokio::test]
async fn test_groups_require_auth() {
    let (server, _blobs) = create_test_server().await;
    server.get("/api/groups").await.assert_status_unauthorized();
}

#[tokio::test]
async fn test_create_and_list_groups() {
    let (server, _blobs) = create_test_server().await;
    register_account(&server, "A", "a@b.com", "pw123456").await;

    let soups = create_group(&server, "Soups").await;
    let desserts = create_group(&server, "Desserts").await;

    let body = server.get("/api/groups").await.json::<Value>();
    assert_eq!(body["total"], 2);
    let results = body["results"].as_array().unwrap();
    assert_eq!(results[0]["_id"].as_i64(), Some(soups));
    assert_eq!(results[0]["name"], "Soups");
    assert_eq!(results[1]["_id"].as_i64(), Some(desserts));
    // Owner is stripped
    assert!(results[0].get("ownerId").is_none());
}

#[tokio::test]
async fn test_group_name_required() {
    let (server, _blobs) = create_test_server().await;
    register_account(&server, "A", "a@b.com", "pw123456").await;

    server
        .post("/api/groups")
        .json(&json!({}))
        .await
        .assert_status_bad_request();
    server
        .post("/api/groups")
        .json(&json!({ "name": "   " }))
        .await
        .assert_status_bad_request();

    let id = create_group(&server, "Valid").await;
    server
        .put(&format!("/api/groups/{id}"))
        .json(&json!({ "name": "" }))
        .await
        .assert_status_bad_request();
}

#[tokio::test]
async fn test_rename_group() {
    let (server, _blobs) = create_test_server().await;
    register_account(&server, "A", "a@b.com", "pw123456").await;
    let id = create_group(&server, "Old").await;

    let response = server
        .put(&format!("/api/groups/{id}"))
        .json(&json!({ "name": "New" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["name"], "New");

    server
        .put("/api/groups/9999")
        .json(&json!({ "name": "X" }))
        .await
        .assert_status_not_found();
}

#[tokio::test]
async fn test_delete_group_scrubs_recipes() {
    let (server, _blobs) = create_test_server().await;
    register_account(&server, "A", "a@b.com", "pw123456").await;

    let doomed = create_group(&server, "Doomed").await;
    let kept = create_group(&server, "Kept").await;
    let recipe = create_recipe(
        &server,
        json!({ "title": "Tagged", "groups": [{"_id": doomed}, {"_id": kept}] }),
    )
    .await;

    server
        .delete(&format!("/api/groups/{doomed}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    let body = server.get("/api/groups").await.json::<Value>();
    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["name"], "Kept");

    let body = server
        .get(&format!("/api/recipes/{recipe}"))
        .await
        .json::<Value>();
    let groups = body["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["_id"].as_i64(), Some(kept));
}

#[tokio::test]
async fn test_delete_group_scrubs_other_owners_recipes() {
    let (mut server, _blobs) = create_test_server().await;

    // Bob tags a recipe with a group id belonging to Alice
    register_account(&server, "A", "a@b.com", "pw123456").await;
    let group = create_group(&server, "Alice's group").await;

    server.clear_cookies();
    register_account(&server, "B", "b@b.com", "pw123456").await;
    let recipe = create_recipe(
        &server,
        json!({ "title": "Bob's", "groups": [{"_id": group}] }),
    )
    .await;

    // Alice deletes her group; the dangling reference in Bob's recipe goes
    // with it
    server.clear_cookies();
    server
        .get("/api/account/_login")
        .add_query_param("email", "a@b.com")
        .add_query_param("password", "pw123456")
        .await
        .assert_status_ok();
    server
        .delete(&format!("/api/groups/{group}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server.clear_cookies();
    server
        .get("/api/account/_login")
        .add_query_param("email", "b@b.com")
        .add_query_param("password", "pw123456")
        .await
        .assert_status_ok();
    let body = server
        .get(&format!("/api/recipes/{recipe}"))
        .await
        .json::<Value>();
    assert!(body["groups"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_absent_group_ok() {
    let (server, _blobs) = create_test_server().await;
    register_account(&server, "A", "a@b.com", "pw123456").await;

    server
        .delete("/api/groups/9999")
        .await
        .assert_status(StatusCode::NO_CONTENT);
    server
        .delete("/api/groups/garbage")
        .await
        .assert_status(StatusCode::NO_CONTENT);
}
