// src/client/mod.rs
// DOCUMENTATION: HTTP client module organization
// PURPOSE: Re-export the API client and its retry policy

pub mod api_client;
pub mod retry;

pub use api_client::*;
pub use retry::*;
