// src/services/city_service.rs
// DOCUMENTATION: Cities and tags
// PURPOSE: Reference data shared by every browsing page, served through the response cache

use crate::client::ApiClient;
use crate::errors::GuideResult;
use crate::models::{Attraction, City, Restaurant, Tag};

pub struct CityService;

impl CityService {
    /// GET /cities (cached)
    pub async fn list(client: &ApiClient) -> GuideResult<Vec<City>> {
        client.get_cached("/cities", None).await
    }

    /// GET /cities/{id}
    pub async fn get(client: &ApiClient, id: i64) -> GuideResult<City> {
        client.get(&format!("/cities/{}", id)).await
    }

    /// GET /cities/{id}/attractions
    pub async fn attractions(client: &ApiClient, id: i64) -> GuideResult<Vec<Attraction>> {
        client.get(&format!("/cities/{}/attractions", id)).await
    }

    /// GET /cities/{id}/restaurants
    pub async fn restaurants(client: &ApiClient, id: i64) -> GuideResult<Vec<Restaurant>> {
        client.get(&format!("/cities/{}/restaurants", id)).await
    }
}

pub struct TagService;

impl TagService {
    /// GET /tags (cached)
    pub async fn list(client: &ApiClient) -> GuideResult<Vec<Tag>> {
        client.get_cached("/tags", None).await
    }
}
