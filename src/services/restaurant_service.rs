// src/services/restaurant_service.rs
// DOCUMENTATION: Restaurant browsing and admin management
// PURPOSE: Validate input, enforce admin role, call /restaurants endpoints

use crate::client::{ApiClient, FileUpload};
use crate::errors::GuideResult;
use crate::models::{
    validate_coordinates, CreateRestaurantRequest, ListQuery, Restaurant, Review,
    UpdateRestaurantRequest,
};
use validator::Validate;

pub struct RestaurantService;

impl RestaurantService {
    /// GET /restaurants with filters
    pub async fn list(client: &ApiClient, query: &ListQuery) -> GuideResult<Vec<Restaurant>> {
        client.get_query("/restaurants", query).await
    }

    /// GET /restaurants/{id} with the detail retry policy
    pub async fn get(client: &ApiClient, id: i64) -> GuideResult<Restaurant> {
        client
            .get_with_policy(&format!("/restaurants/{}", id), client.detail_policy())
            .await
    }

    /// GET /restaurants/{id}/reviews
    pub async fn reviews(client: &ApiClient, id: i64) -> GuideResult<Vec<Review>> {
        client.get(&format!("/restaurants/{}/reviews", id)).await
    }

    /// GET /restaurants/topnearby/{attraction_id}
    /// Best rated restaurants near an attraction
    pub async fn top_nearby(
        client: &ApiClient,
        attraction_id: i64,
    ) -> GuideResult<Vec<Restaurant>> {
        client
            .get(&format!("/restaurants/topnearby/{}", attraction_id))
            .await
    }

    /// POST /restaurants (admin)
    pub async fn create(
        client: &ApiClient,
        req: &CreateRestaurantRequest,
    ) -> GuideResult<Restaurant> {
        client.session().require_admin().await?;
        req.validate()?;
        validate_coordinates(req.latitude, req.longitude)?;

        let restaurant: Restaurant = client.post("/restaurants", req).await?;
        log::info!("Created restaurant {} ({})", restaurant.id, restaurant.name);
        Ok(restaurant)
    }

    /// PUT /restaurants/{id} (admin)
    pub async fn update(
        client: &ApiClient,
        id: i64,
        req: &UpdateRestaurantRequest,
    ) -> GuideResult<Restaurant> {
        client.session().require_admin().await?;
        req.validate()?;

        let restaurant = client.put(&format!("/restaurants/{}", id), req).await?;
        log::info!("Updated restaurant {}", id);
        Ok(restaurant)
    }

    /// DELETE /restaurants/{id} (admin)
    pub async fn delete(client: &ApiClient, id: i64) -> GuideResult<()> {
        client.session().require_admin().await?;
        client.delete(&format!("/restaurants/{}", id)).await?;
        log::info!("Deleted restaurant {}", id);
        Ok(())
    }

    /// POST /restaurants/{id}/image (admin)
    pub async fn upload_image(
        client: &ApiClient,
        id: i64,
        image: &FileUpload,
    ) -> GuideResult<Restaurant> {
        client.session().require_admin().await?;
        image.validate_image()?;
        client
            .upload(&format!("/restaurants/{}/image", id), "image", image)
            .await
    }
}
