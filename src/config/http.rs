// src/config/http.rs
// DOCUMENTATION: Shared HTTP client initialization
// PURPOSE: Build the single reqwest client reused by every API call

use crate::config::Config;
use crate::errors::GuideError;
use reqwest::Client;
use std::time::Duration;

/// Initialize the shared reqwest client
/// DOCUMENTATION: Called once during application startup in main.rs
/// Per-request deadlines come from RetryPolicy, so only connection setup is bounded here
pub fn init_http_client(config: &Config) -> Result<Client, GuideError> {
    log::info!("Initializing HTTP client for {}", config.api_base_url);

    let client = Client::builder()
        // Fail fast when the backend is unreachable
        .connect_timeout(Duration::from_secs(config.request_timeout_secs.max(1)))
        // Keep idle connections for 90 seconds
        .pool_idle_timeout(Duration::from_secs(90))
        .user_agent(concat!("travel-guide/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| GuideError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;

    log::info!("HTTP client initialized successfully");
    Ok(client)
}
