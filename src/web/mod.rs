//! HTTP API for Pantry.
//!
//! A thin mechanical layer over the stores: extract the caller from the
//! session, deserialize, delegate, serialize. All policy lives below.

mod error;
mod extract;
pub mod handlers;
mod router;
mod server;

pub use error::{ApiError, ErrorCode};
pub use extract::CurrentUser;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;
