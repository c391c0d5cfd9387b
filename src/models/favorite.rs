// src/models/favorite.rs
// DOCUMENTATION: Favorite (user-to-location bookmark) models
// PURPOSE: Server record, create request and cache keys for /favorites

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::LocationRef;
use crate::errors::GuideError;

/// Favorite record as stored by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Favorite {
    pub id: i64,
    pub user_id: i64,
    #[serde(default)]
    pub attraction_id: Option<i64>,
    #[serde(default)]
    pub restaurant_id: Option<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Favorite {
    pub fn location(&self) -> Result<LocationRef, GuideError> {
        LocationRef::from_parts(self.attraction_id, self.restaurant_id)
    }
}

/// Body of POST /favorites
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewFavorite {
    pub user_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attraction_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restaurant_id: Option<i64>,
}

impl NewFavorite {
    pub fn new(user_id: i64, location: LocationRef) -> Self {
        let (attraction_id, restaurant_id) = location.into_parts();
        NewFavorite {
            user_id,
            attraction_id,
            restaurant_id,
        }
    }

    /// Check the user id and the exactly-one-location rule
    pub fn validate(&self) -> Result<LocationRef, GuideError> {
        if self.user_id <= 0 {
            return Err(GuideError::InvalidArgument(
                "user_id is required".to_string(),
            ));
        }
        LocationRef::from_parts(self.attraction_id, self.restaurant_id)
    }
}

/// Locally generated identifier standing in for a not-yet-assigned server id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TempId(Uuid);

impl TempId {
    pub fn generate() -> Self {
        TempId(Uuid::new_v4())
    }
}

impl fmt::Display for TempId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "temp-{}", self.0)
    }
}

/// Identifier of an entry in the favorites view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FavoriteKey {
    /// Server-assigned id
    Confirmed(i64),
    /// Placeholder for a create still in flight
    Pending(TempId),
}

impl FavoriteKey {
    pub fn is_pending(&self) -> bool {
        matches!(self, FavoriteKey::Pending(_))
    }
}

impl From<i64> for FavoriteKey {
    fn from(id: i64) -> Self {
        FavoriteKey::Confirmed(id)
    }
}

impl fmt::Display for FavoriteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FavoriteKey::Confirmed(id) => write!(f, "{}", id),
            FavoriteKey::Pending(temp) => write!(f, "{}", temp),
        }
    }
}

/// One row of the favorites view exposed to callers
#[derive(Debug, Clone, PartialEq)]
pub struct FavoriteEntry {
    pub key: FavoriteKey,
    pub user_id: i64,
    pub location: LocationRef,
    pub created_at: Option<DateTime<Utc>>,
}

impl FavoriteEntry {
    pub fn is_pending(&self) -> bool {
        self.key.is_pending()
    }
}
