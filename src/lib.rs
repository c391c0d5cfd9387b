// src/lib.rs
// DOCUMENTATION: Library root for the travel guide client
// PURPOSE: Typed API client, session handling and the optimistic favorites cache

pub mod client;
pub mod config;
pub mod errors;
pub mod favorites;
pub mod models;
pub mod services;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::{ApiClient, FileUpload, RetryPolicy};
pub use config::Config;
pub use errors::{ErrorCategory, GuideError, GuideResult};
pub use favorites::{FavoritesApi, FavoritesCache, LoadState};
pub use session::SessionContext;
