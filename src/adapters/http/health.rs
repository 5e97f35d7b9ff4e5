//! Liveness endpoint.

use std::sync::Arc;

use axum::extract::{Json, State};
use serde::Serialize;

use crate::application::SessionGateway;

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub connections: usize,
    pub rooms: usize,
}

/// Reports liveness with current registry counts.
pub async fn health(State(gateway): State<Arc<SessionGateway>>) -> Json<HealthResponse> {
    let registry = gateway.registry();
    Json(HealthResponse {
        status: "ok",
        connections: registry.connection_count().await,
        rooms: registry.active_rooms().await.len(),
    })
}
