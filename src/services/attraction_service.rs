// src/services/attraction_service.rs
// DOCUMENTATION: Attraction browsing and admin management
// PURPOSE: Validate input, enforce admin role, call /attractions endpoints

use crate::client::{ApiClient, FileUpload};
use crate::errors::GuideResult;
use crate::models::{
    validate_coordinates, Attraction, CreateAttractionRequest, ListQuery, Review,
    UpdateAttractionRequest,
};
use validator::Validate;

pub struct AttractionService;

impl AttractionService {
    /// GET /attractions with filters
    pub async fn list(client: &ApiClient, query: &ListQuery) -> GuideResult<Vec<Attraction>> {
        client.get_query("/attractions", query).await
    }

    /// GET /attractions/{id}
    /// DOCUMENTATION: Detail pages retry transient failures (detail policy)
    pub async fn get(client: &ApiClient, id: i64) -> GuideResult<Attraction> {
        client
            .get_with_policy(&format!("/attractions/{}", id), client.detail_policy())
            .await
    }

    /// GET /attractions/{id}/reviews
    pub async fn reviews(client: &ApiClient, id: i64) -> GuideResult<Vec<Review>> {
        client.get(&format!("/attractions/{}/reviews", id)).await
    }

    /// POST /attractions (admin)
    pub async fn create(
        client: &ApiClient,
        req: &CreateAttractionRequest,
    ) -> GuideResult<Attraction> {
        client.session().require_admin().await?;
        req.validate()?;
        validate_coordinates(req.latitude, req.longitude)?;

        let attraction: Attraction = client.post("/attractions", req).await?;
        log::info!("Created attraction {} ({})", attraction.id, attraction.name);
        Ok(attraction)
    }

    /// PUT /attractions/{id} (admin)
    pub async fn update(
        client: &ApiClient,
        id: i64,
        req: &UpdateAttractionRequest,
    ) -> GuideResult<Attraction> {
        client.session().require_admin().await?;
        req.validate()?;

        let attraction = client.put(&format!("/attractions/{}", id), req).await?;
        log::info!("Updated attraction {}", id);
        Ok(attraction)
    }

    /// DELETE /attractions/{id} (admin)
    pub async fn delete(client: &ApiClient, id: i64) -> GuideResult<()> {
        client.session().require_admin().await?;
        client.delete(&format!("/attractions/{}", id)).await?;
        log::info!("Deleted attraction {}", id);
        Ok(())
    }

    /// POST /attractions/{id}/image (admin)
    pub async fn upload_image(
        client: &ApiClient,
        id: i64,
        image: &FileUpload,
    ) -> GuideResult<Attraction> {
        client.session().require_admin().await?;
        image.validate_image()?;
        client
            .upload(&format!("/attractions/{}/image", id), "image", image)
            .await
    }
}
