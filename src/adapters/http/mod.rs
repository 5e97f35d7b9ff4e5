//! HTTP adapters - the axum application around the messaging gateway.

pub mod health;
pub mod routes;

pub use health::{health, HealthResponse};
pub use routes::create_router;
