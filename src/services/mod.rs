// src/services/mod.rs
// DOCUMENTATION: Services module organization
// PURPOSE: Re-export service components

pub mod attraction_service;
pub mod auth_service;
pub mod cache;
pub mod city_service;
pub mod favorite_service;
pub mod restaurant_service;
pub mod review_service;
pub mod user_service;

pub use attraction_service::*;
pub use auth_service::*;
pub use cache::*;
pub use city_service::*;
pub use favorite_service::*;
pub use restaurant_service::*;
pub use review_service::*;
pub use user_service::*;
