// src/models/restaurant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Restaurant record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    pub id: i64,
    pub city_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub cuisine: Option<String>,
    /// Price range marker, e.g. "$$"
    #[serde(default)]
    pub price_range: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub rating: Option<f32>,
    /// Distance from the reference attraction, set by /restaurants/topnearby
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request to create a restaurant (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateRestaurantRequest {
    #[validate(range(min = 1))]
    pub city_id: i64,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[validate(length(max = 100))]
    pub cuisine: Option<String>,
    #[validate(length(min = 1, max = 4))]
    pub price_range: Option<String>,
}

/// Request to update a restaurant; only provided fields are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateRestaurantRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 4))]
    pub price_range: Option<String>,
}
