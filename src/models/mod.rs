// src/models/mod.rs
// DOCUMENTATION: Models module organization
// PURPOSE: Re-export model components

pub mod attraction;
pub mod city;
pub mod favorite;
pub mod location;
pub mod restaurant;
pub mod review;
pub mod user;

pub use attraction::*;
pub use city::*;
pub use favorite::*;
pub use location::*;
pub use restaurant::*;
pub use review::*;
pub use user::*;
