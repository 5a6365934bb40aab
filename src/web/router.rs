//! Router configuration for the Pantry API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{account, files, group, recipe, AppState};

/// Create the main API router.
pub fn create_router(state: AppState) -> Router {
    let max_upload_size = state.max_upload_size;

    let api_routes = Router::new()
        .route(
            "/account",
            post(account::register)
                .get(account::current)
                .put(account::update),
        )
        .route("/account/_login", get(account::login))
        .route("/account/_logout", get(account::logout))
        .route("/recipes", get(recipe::search).post(recipe::create))
        .route(
            "/recipes/:id",
            get(recipe::get).put(recipe::update).delete(recipe::remove),
        )
        .route("/groups", get(group::list).post(group::create))
        .route("/groups/:id", put(group::update).delete(group::remove))
        .route("/files", post(files::upload))
        .route("/files/:key", get(files::get))
        .route("/status", get(status));

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .layer(DefaultBodyLimit::max(max_upload_size))
        .with_state(state)
}

/// Liveness probe handler.
async fn status() -> &'static str {
    "UP"
}
