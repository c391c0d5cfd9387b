// src/services/favorite_service.rs
// DOCUMENTATION: Raw /favorites endpoints
// PURPOSE: Network side of the optimistic favorites cache

use crate::client::ApiClient;
use crate::errors::GuideResult;
use crate::favorites::FavoritesApi;
use crate::models::{Favorite, NewFavorite};
use async_trait::async_trait;
use serde::Serialize;

#[derive(Serialize)]
struct FavoritesQuery {
    user_id: i64,
}

pub struct FavoriteService;

impl FavoriteService {
    /// GET /favorites?user_id={id}
    pub async fn list(client: &ApiClient, user_id: i64) -> GuideResult<Vec<Favorite>> {
        client
            .get_query("/favorites", &FavoritesQuery { user_id })
            .await
    }

    /// POST /favorites
    pub async fn create(client: &ApiClient, favorite: &NewFavorite) -> GuideResult<Favorite> {
        favorite.validate()?;
        client.post("/favorites", favorite).await
    }

    /// DELETE /favorites/{id}
    pub async fn delete(client: &ApiClient, favorite_id: i64) -> GuideResult<()> {
        client.delete(&format!("/favorites/{}", favorite_id)).await
    }
}

#[async_trait]
impl FavoritesApi for ApiClient {
    async fn list_favorites(&self, user_id: i64) -> GuideResult<Vec<Favorite>> {
        FavoriteService::list(self, user_id).await
    }

    async fn create_favorite(&self, favorite: &NewFavorite) -> GuideResult<Favorite> {
        FavoriteService::create(self, favorite).await
    }

    async fn delete_favorite(&self, favorite_id: i64) -> GuideResult<()> {
        FavoriteService::delete(self, favorite_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::favorites::FavoritesCache;
    use crate::models::{FavoriteKey, LocationRef, UserRole};
    use crate::test_support::{client_for, session, stub_server};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_cache_over_http() {
        let server = stub_server(vec![
            (200, r#"[{"id": 1, "user_id": 3, "attraction_id": 5}]"#),
            (201, r#"{"id": 42, "user_id": 3, "restaurant_id": 9}"#),
            (
                200,
                r#"[{"id": 1, "user_id": 3, "attraction_id": 5}, {"id": 42, "user_id": 3, "restaurant_id": 9}]"#,
            ),
        ])
        .await;
        let client = client_for(&server.base_url, Some(session(3, UserRole::User))).await;
        let cache = FavoritesCache::new(Arc::new(client), FavoritesCache::DEFAULT_STALE_AFTER);

        cache.refresh(3).await.unwrap();
        let created = cache
            .add(NewFavorite::new(3, LocationRef::Restaurant(9)))
            .await
            .unwrap();
        assert_eq!(created.id, 42);

        let keys: Vec<FavoriteKey> = cache.view(3).await.into_iter().map(|e| e.key).collect();
        assert_eq!(keys, vec![FavoriteKey::Confirmed(1), FavoriteKey::Confirmed(42)]);

        let requests = server.requests();
        assert!(requests[0].starts_with("GET /favorites?user_id=3 HTTP/1.1"));
        assert!(requests[1].starts_with("POST /favorites HTTP/1.1"));
        assert!(requests[1].contains(r#""restaurant_id":9"#));
        assert!(requests[2].starts_with("GET /favorites?user_id=3 HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_favorite() {
        let client = client_for("http://127.0.0.1:9", None).await;
        let favorite = NewFavorite {
            user_id: 3,
            attraction_id: None,
            restaurant_id: None,
        };
        assert!(matches!(
            FavoriteService::create(&client, &favorite).await,
            Err(crate::errors::GuideError::InvalidArgument(_))
        ));
    }
}
