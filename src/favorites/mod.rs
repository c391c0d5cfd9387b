// src/favorites/mod.rs
// DOCUMENTATION: Favorites module organization
// PURPOSE: Optimistic favorites cache and the API seam it talks to

pub mod cache;
pub mod reducer;

pub use cache::{FavoritesApi, FavoritesCache, LoadState};
pub use reducer::{AddOutcome, FavoritesState, Mutation, MutationId, RemoveTicket};
