// API layer - the HTTP surface (axum handlers, router, error mapping).

#[path = "endpoints/mod.rs"]
pub mod endpoints;

#[path = "error.rs"]
pub mod error;

#[path = "router.rs"]
pub mod router;

#[path = "state.rs"]
pub mod state;

pub use router::build_router;
pub use state::{AppState, CredentialPresence};
