//! Recipe and group storage for Pantry.

mod group;
mod model;
mod search;
mod store;

pub use group::GroupStore;
pub use model::{Group, GroupData, GroupRef, Recipe, RecipeData};
pub use store::{RecipeStore, SearchPage, MAX_PAGE_SIZE};
