//! Data layer module
//!
//! Handles the records shown by the dashboard and their local persistence:
//! - Placeholder API record models
//! - Local key/value store (JSON file)

mod models;
mod store;

pub use models::*;
pub use store::{ACCOUNTS_KEY, LOGGED_IN_USER_KEY, LocalStore, POSTS_KEY};
