//! Account registration, login, and update for Pantry.

mod model;
mod store;

pub use model::Account;
pub use store::AccountStore;
