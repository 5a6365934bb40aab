use std::sync::Arc;

use tracing::info;

use pantry::auth::{SessionAuthenticator, TokenSigner};
use pantry::blob::FsBlobStore;
use pantry::web::{AppState, WebServer};
use pantry::{Config, Database};

#[tokio::main]
async fn main() -> pantry::Result<()> {
    // Load configuration
    let config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };

    // Initialize logging
    if let Err(e) = pantry::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        pantry::logging::init_console_only(&config.logging.level);
    }

    info!("Pantry - Personal Recipe Management Service");

    let db = Database::open(&config.database.path).await?;
    let files = Arc::new(FsBlobStore::new(&config.blobs.path)?);
    let sessions = SessionAuthenticator::new(TokenSigner::new(&config.auth.secret_key));

    let state = AppState::new(&db, files, sessions, config.blobs.max_upload_size_mb);
    let server = WebServer::new(&config.server, state)?;

    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );
    server.run().await
}
