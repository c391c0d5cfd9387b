// src/session/mod.rs
// DOCUMENTATION: Session module organization
// PURPOSE: Re-export the session context and its persistence backends

pub mod context;
pub mod store;

pub use context::SessionContext;
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
