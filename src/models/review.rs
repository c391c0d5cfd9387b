// src/models/review.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::LocationRef;
use crate::errors::GuideError;

/// Review left by a user on an attraction or a restaurant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub attraction_id: Option<i64>,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    pub rating: u8,
    #[serde(default)]
    pub comment: Option<String>,
    /// Author display name, when the backend joins it in
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Review {
    /// Location this review belongs to
    pub fn location(&self) -> Result<LocationRef, GuideError> {
        LocationRef::from_parts(self.attraction_id, self.restaurant_id)
    }
}

/// Request to create a review
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateReviewRequest {
    #[validate(range(min = 1))]
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attraction_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<i64>,
    #[validate(range(min = 1, max = 5))]
    pub rating: u8,
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}

impl CreateReviewRequest {
    pub fn new(user_id: i64, location: LocationRef, rating: u8, comment: Option<String>) -> Self {
        let (attraction_id, restaurant_id) = location.into_parts();
        CreateReviewRequest {
            user_id,
            attraction_id,
            restaurant_id,
            rating,
            comment,
        }
    }
}

/// Request to edit a review
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateReviewRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 2000))]
    pub comment: Option<String>,
}
