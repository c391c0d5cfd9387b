// src/config/env.rs
// DOCUMENTATION: Environment variable management
// PURPOSE: Load and validate configuration from .env files

use dotenv::dotenv;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration loaded from environment variables
/// DOCUMENTATION: Centralizes all configuration in one struct
/// Load with Config::from_env() at application startup
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the travel-guide REST backend (no trailing slash)
    pub api_base_url: String,

    /// Environment: development, staging, production
    pub environment: String,

    /// Log level: debug, info, warn, error
    pub log_level: String,

    /// File holding the persisted session (token + user)
    pub session_file: PathBuf,

    /// Per-attempt request timeout in seconds
    pub request_timeout_secs: u64,

    /// Attempts used for attraction/restaurant detail fetches
    pub detail_retry_attempts: u32,

    /// Staleness window of the favorites cache in seconds
    pub favorites_stale_secs: u64,

    /// TTL of cached reference data (cities, tags) in seconds
    pub reference_cache_ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_base_url: "http://localhost:3000/api".to_string(),
            environment: "development".to_string(),
            log_level: "info".to_string(),
            session_file: PathBuf::from(".travel-guide-session.json"),
            request_timeout_secs: 10,
            detail_retry_attempts: 3,
            favorites_stale_secs: 30,
            reference_cache_ttl_secs: 300,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    /// DOCUMENTATION: Reads from .env or process environment
    /// Called once at application startup
    pub fn from_env() -> Self {
        // Load .env file if it exists
        dotenv().ok();

        let defaults = Config::default();

        Config {
            api_base_url: env::var("API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base_url),

            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),

            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            session_file: env::var("SESSION_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.session_file),

            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),

            detail_retry_attempts: parse_var(
                "DETAIL_RETRY_ATTEMPTS",
                defaults.detail_retry_attempts,
            ),

            favorites_stale_secs: parse_var("FAVORITES_STALE_SECS", defaults.favorites_stale_secs),

            reference_cache_ttl_secs: parse_var(
                "REFERENCE_CACHE_TTL_SECS",
                defaults.reference_cache_ttl_secs,
            ),
        }
    }

    /// Validate critical configuration
    /// DOCUMENTATION: Ensures application can start safely
    pub fn validate(&self) -> Result<(), String> {
        if self.api_base_url.is_empty() {
            return Err("API_BASE_URL is required".to_string());
        }

        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(format!(
                "API_BASE_URL must start with http:// or https:// (got {})",
                self.api_base_url
            ));
        }

        if self.detail_retry_attempts == 0 {
            return Err("DETAIL_RETRY_ATTEMPTS must be at least 1".to_string());
        }

        if self.environment == "production" && self.api_base_url.starts_with("http://") {
            log::warn!("API_BASE_URL is not using TLS in production");
        }

        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn favorites_stale_after(&self) -> Duration {
        Duration::from_secs(self.favorites_stale_secs)
    }
}

/// Parse a numeric variable, falling back to the default when missing or malformed
fn parse_var<T: FromStr + Copy>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.favorites_stale_after(), Duration::from_secs(30));
        assert_eq!(config.detail_retry_attempts, 3);
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        let mut config = Config::default();
        config.api_base_url = String::new();
        assert!(config.validate().is_err());

        config.api_base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        config.api_base_url = "https://guide.example.com/api".to_string();
        config.detail_retry_attempts = 0;
        assert!(config.validate().is_err());
    }
}
