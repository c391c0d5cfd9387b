// src/models/location.rs
// DOCUMENTATION: Reference to a favoritable/reviewable location
// PURPOSE: Encode "exactly one of attraction_id / restaurant_id" as a type

use crate::errors::GuideError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of location a favorite or review points at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationKind {
    Attraction,
    Restaurant,
}

/// A single attraction or restaurant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationRef {
    Attraction(i64),
    Restaurant(i64),
}

impl LocationRef {
    pub fn new(kind: LocationKind, id: i64) -> Self {
        match kind {
            LocationKind::Attraction => LocationRef::Attraction(id),
            LocationKind::Restaurant => LocationRef::Restaurant(id),
        }
    }

    /// Build from the two optional foreign keys carried by server records
    /// Fails unless exactly one id is present and positive
    pub fn from_parts(
        attraction_id: Option<i64>,
        restaurant_id: Option<i64>,
    ) -> Result<Self, GuideError> {
        match (attraction_id, restaurant_id) {
            (Some(id), None) if id > 0 => Ok(LocationRef::Attraction(id)),
            (None, Some(id)) if id > 0 => Ok(LocationRef::Restaurant(id)),
            (Some(_), Some(_)) => Err(GuideError::InvalidArgument(
                "exactly one of attraction_id or restaurant_id is allowed".to_string(),
            )),
            (None, None) => Err(GuideError::InvalidArgument(
                "one of attraction_id or restaurant_id is required".to_string(),
            )),
            _ => Err(GuideError::InvalidArgument(
                "location id must be positive".to_string(),
            )),
        }
    }

    pub fn kind(&self) -> LocationKind {
        match self {
            LocationRef::Attraction(_) => LocationKind::Attraction,
            LocationRef::Restaurant(_) => LocationKind::Restaurant,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            LocationRef::Attraction(id) | LocationRef::Restaurant(id) => *id,
        }
    }

    /// Split back into (attraction_id, restaurant_id) for request bodies
    pub fn into_parts(self) -> (Option<i64>, Option<i64>) {
        match self {
            LocationRef::Attraction(id) => (Some(id), None),
            LocationRef::Restaurant(id) => (None, Some(id)),
        }
    }
}

impl fmt::Display for LocationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocationRef::Attraction(id) => write!(f, "attraction:{}", id),
            LocationRef::Restaurant(id) => write!(f, "restaurant:{}", id),
        }
    }
}

/// Check an optional coordinate pair before it is submitted
/// Both or neither must be set, within WGS84 bounds
pub fn validate_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), GuideError> {
    match (latitude, longitude) {
        (None, None) => Ok(()),
        (Some(lat), Some(lon)) => {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(GuideError::ValidationError(format!(
                    "latitude out of range: {}",
                    lat
                )));
            }
            if !(-180.0..=180.0).contains(&lon) {
                return Err(GuideError::ValidationError(format!(
                    "longitude out of range: {}",
                    lon
                )));
            }
            Ok(())
        }
        _ => Err(GuideError::ValidationError(
            "latitude and longitude must be provided together".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_parts() {
        assert_eq!(
            LocationRef::from_parts(Some(5), None).unwrap(),
            LocationRef::Attraction(5)
        );
        assert_eq!(
            LocationRef::from_parts(None, Some(9)).unwrap(),
            LocationRef::Restaurant(9)
        );
        assert!(matches!(
            LocationRef::from_parts(Some(5), Some(9)),
            Err(GuideError::InvalidArgument(_))
        ));
        assert!(matches!(
            LocationRef::from_parts(None, None),
            Err(GuideError::InvalidArgument(_))
        ));
        assert!(matches!(
            LocationRef::from_parts(Some(0), None),
            Err(GuideError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parts_and_display() {
        let loc = LocationRef::new(LocationKind::Restaurant, 9);
        assert_eq!(loc.kind(), LocationKind::Restaurant);
        assert_eq!(loc.id(), 9);
        assert_eq!(loc.into_parts(), (None, Some(9)));
        assert_eq!(loc.to_string(), "restaurant:9");
    }

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(None, None).is_ok());
        assert!(validate_coordinates(Some(50.08), Some(14.42)).is_ok());
        assert!(validate_coordinates(Some(91.0), Some(14.42)).is_err());
        assert!(validate_coordinates(Some(50.08), Some(-181.0)).is_err());
        assert!(validate_coordinates(Some(50.08), None).is_err());
    }
}
