// src/models/attraction.rs
// DOCUMENTATION: Attraction records and request DTOs
// PURPOSE: Serialization models for /attractions endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Attraction record as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attraction {
    pub id: i64,

    /// Owning city
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
    pub image_url: Option<String>,

    /// Tag names (museum, park, viewpoint, ...)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Average review rating (1-5)
    #[serde(default)]
    pub rating: Option<f32>,

    #[serde(default)]
    pub ticket_price: Option<f64>,

    /// Free-form opening hours text
    #[serde(default)]
    pub opening_hours: Option<String>,

    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Request DTO for creating an attraction
/// DOCUMENTATION: Body of POST /attractions (admin only)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAttractionRequest {
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

    #[serde(default)]
    pub tags: Vec<String>,

    #[validate(range(min = 0.0))]
    pub ticket_price: Option<f64>,

    pub opening_hours: Option<String>,
}

/// Request DTO for updating an attraction
/// DOCUMENTATION: Body of PUT /attractions/{id}; only provided fields are sent
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAttractionRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 5000))]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(range(min = 0.0))]
    pub ticket_price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<String>,
}

/// Listing filters shared by attractions and restaurants
/// DOCUMENTATION: Serialized into the query string; absent fields are omitted
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city_id: Option<i64>,

    /// Free-text search on name/description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// Page number (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Results per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ListQuery {
    pub fn for_city(city_id: i64) -> Self {
        ListQuery {
            city_id: Some(city_id),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_attraction() {
        let json = r#"{"id": 5, "city_id": 2, "name": "Old Town Square"}"#;
        let attraction: Attraction = serde_json::from_str(json).unwrap();
        assert_eq!(attraction.id, 5);
        assert!(attraction.tags.is_empty());
        assert!(attraction.rating.is_none());
    }

    #[test]
    fn test_create_request_validation() {
        let mut req = CreateAttractionRequest {
            city_id: 2,
            name: "Castle".to_string(),
            description: None,
            address: None,
            latitude: Some(50.09),
            longitude: Some(14.40),
            tags: vec!["history".to_string()],
            ticket_price: Some(12.5),
            opening_hours: None,
        };
        assert!(req.validate().is_ok());

        req.name = String::new();
        assert!(req.validate().is_err());

        req.name = "Castle".to_string();
        req.ticket_price = Some(-1.0);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_update_request_omits_unset_fields() {
        let req = UpdateAttractionRequest {
            name: Some("New name".to_string()),
            ..Default::default()
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value, serde_json::json!({"name": "New name"}));
    }

    #[test]
    fn test_list_query_serialization() {
        let query = ListQuery {
            tag: Some("museum".to_string()),
            ..ListQuery::for_city(3)
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value, serde_json::json!({"city_id": 3, "tag": "museum"}));
    }
}
