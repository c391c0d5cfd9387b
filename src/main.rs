// src/main.rs
// DOCUMENTATION: Application entry point
// PURPOSE: Initialize config, logging and session, then warm the client caches

use anyhow::Context;
use dotenv::dotenv;
use std::sync::Arc;
use travel_guide::services::{start_cleanup_task, CityService, ResponseCache, TagService};
use travel_guide::session::FileSessionStore;
use travel_guide::{ApiClient, Config, FavoritesCache, SessionContext};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Load environment variables
    dotenv().ok();

    // 2. Load configuration
    let config = Config::from_env();
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    }

    // 3. Initialize logging
    if std::env::var("RUST_LOG").is_err() {
        let log_level = if !config.log_level.is_empty() {
            config.log_level.as_str()
        } else {
            "info,reqwest=warn"
        };
        std::env::set_var("RUST_LOG", log_level);
    }
    env_logger::init();

    log::info!("Starting travel guide client...");
    log::info!("Environment: {}", config.environment);
    log::info!("API base URL: {}", config.api_base_url);

    // 4. Restore the persisted session
    let store = Arc::new(FileSessionStore::new(config.session_file.clone()));
    let session = SessionContext::restore(store).await;

    // 5. Build the API client with the reference-data cache
    let cache = Arc::new(ResponseCache::new(config.reference_cache_ttl_secs));
    start_cleanup_task(cache.clone(), config.reference_cache_ttl_secs.max(1));
    log::info!(
        "Initialized reference cache (TTL: {}s)",
        config.reference_cache_ttl_secs
    );

    let client = ApiClient::from_config(&config, session.clone())
        .context("failed to build HTTP client")?
        .with_cache(cache);

    // 6. Warm reference data
    let cities = CityService::list(&client)
        .await
        .context("failed to load cities")?;
    let tags = TagService::list(&client).await.context("failed to load tags")?;
    log::info!("Loaded {} cities and {} tags", cities.len(), tags.len());

    // 7. Load favorites for the signed-in user
    match session.current_user().await {
        Some(user) => {
            let favorites =
                FavoritesCache::new(Arc::new(client.clone()), config.favorites_stale_after());
            match favorites.refresh(user.id).await {
                Ok(entries) => log::info!(
                    "User {} has {} favorites",
                    user.username,
                    entries.len()
                ),
                Err(e) => log::warn!("Failed to load favorites for {}: {}", user.username, e),
            }
        }
        None => log::info!("Browsing anonymously"),
    }

    Ok(())
}
