//! Remote placeholder API
//!
//! Handles:
//! - HTTP access to the REST API (`HttpRemote`)
//! - Typed listing/lookup of records (`RemoteApi`)

mod client;

pub use client::{HttpRemote, RemoteApi, RemoteQuery, RemoteSource, Resource};

#[cfg(test)]
pub use client::MockRemoteSource;
