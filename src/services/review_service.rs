// src/services/review_service.rs
// DOCUMENTATION: Review listing and authoring
// PURPOSE: Enforce authorship rules and call /reviews endpoints

use crate::client::ApiClient;
use crate::errors::{GuideError, GuideResult};
use crate::models::{CreateReviewRequest, LocationRef, Review, UpdateReviewRequest};
use validator::Validate;

pub struct ReviewService;

impl ReviewService {
    /// GET /reviews (admin back-office)
    pub async fn list(client: &ApiClient) -> GuideResult<Vec<Review>> {
        client.session().require_admin().await?;
        client.get("/reviews").await
    }

    /// Reviews of one attraction or restaurant
    pub async fn for_location(client: &ApiClient, location: LocationRef) -> GuideResult<Vec<Review>> {
        let path = match location {
            LocationRef::Attraction(id) => format!("/attractions/{}/reviews", id),
            LocationRef::Restaurant(id) => format!("/restaurants/{}/reviews", id),
        };
        client.get(&path).await
    }

    /// POST /reviews as the signed-in user
    pub async fn create(client: &ApiClient, req: &CreateReviewRequest) -> GuideResult<Review> {
        let user = client.session().require_user().await?;
        if user.id != req.user_id && !user.is_admin() {
            return Err(GuideError::Forbidden);
        }
        req.validate()?;
        LocationRef::from_parts(req.attraction_id, req.restaurant_id)?;

        let review: Review = client.post("/reviews", req).await?;
        log::info!("User {} reviewed {:?}", user.id, review.location().ok());
        Ok(review)
    }

    /// PUT /reviews/{id}
    pub async fn update(
        client: &ApiClient,
        id: i64,
        req: &UpdateReviewRequest,
    ) -> GuideResult<Review> {
        client.session().require_user().await?;
        req.validate()?;
        client.put(&format!("/reviews/{}", id), req).await
    }

    /// DELETE /reviews/{id}; the backend checks ownership
    pub async fn delete(client: &ApiClient, id: i64) -> GuideResult<()> {
        client.session().require_user().await?;
        client.delete(&format!("/reviews/{}", id)).await?;
        log::info!("Deleted review {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserRole;
    use crate::test_support::{client_for, session, stub_server};

    #[tokio::test]
    async fn test_cannot_review_as_someone_else() {
        let client = client_for("http://127.0.0.1:9", Some(session(3, UserRole::User))).await;
        let req = CreateReviewRequest::new(4, LocationRef::Attraction(5), 4, None);
        assert_eq!(
            ReviewService::create(&client, &req).await,
            Err(GuideError::Forbidden)
        );
    }

    #[tokio::test]
    async fn test_review_requires_exactly_one_location() {
        let client = client_for("http://127.0.0.1:9", Some(session(3, UserRole::User))).await;
        let req = CreateReviewRequest {
            user_id: 3,
            attraction_id: Some(5),
            restaurant_id: Some(9),
            rating: 4,
            comment: None,
        };
        assert!(matches!(
            ReviewService::create(&client, &req).await,
            Err(GuideError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_reviews_for_location() {
        let server = stub_server(vec![(
            200,
            r#"[{"id": 1, "user_id": 3, "restaurant_id": 9, "rating": 5, "comment": "Great goulash"}]"#,
        )])
        .await;
        let client = client_for(&server.base_url, None).await;

        let reviews = ReviewService::for_location(&client, LocationRef::Restaurant(9))
            .await
            .unwrap();
        assert_eq!(reviews.len(), 1);
        assert!(server.requests()[0].starts_with("GET /restaurants/9/reviews HTTP/1.1"));
    }
}
