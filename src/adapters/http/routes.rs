//! Application router: WebSocket endpoint, health check, and HTTP layers.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::adapters::websocket::{websocket_router, WebSocketState};
use crate::application::SessionGateway;
use crate::config::{AppConfig, Environment};

use super::health::health;

/// Create the application router.
pub fn create_router(gateway: Arc<SessionGateway>, config: &AppConfig) -> Router {
    let ws_state = WebSocketState::new(Arc::clone(&gateway))
        .with_max_frame_bytes(config.messaging.max_frame_bytes)
        .with_queue_capacity(config.messaging.outbound_queue_capacity);

    // Tracing layer with request timing
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    Router::new()
        .route("/health", get(health))
        .with_state(gateway)
        .merge(websocket_router(&config.messaging.ws_path).with_state(ws_state))
        .layer(build_cors_layer(config))
        .layer(trace_layer)
}

/// Build the CORS layer based on configuration.
///
/// With no configured origins, development allows any origin and other
/// environments deny cross-origin requests.
fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    let configured = config.server.cors_origins_list();
    let methods = [Method::GET, Method::OPTIONS];
    let headers = [header::CONTENT_TYPE, header::ACCEPT, header::ORIGIN];

    if configured.is_empty() {
        if config.server.environment != Environment::Development {
            tracing::warn!("CORS: No origins configured, denying all cross-origin requests");
            return CorsLayer::new().allow_origin(AllowOrigin::exact(HeaderValue::from_static("null")));
        }
        tracing::debug!("CORS: No origins configured, allowing any origin in development");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers);
    }

    let origins: Vec<HeaderValue> = configured
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("CORS: Invalid origin in config: {}", origin);
                None
            })
        })
        .collect();

    if origins.is_empty() {
        tracing::error!("CORS: All configured origins are invalid!");
        CorsLayer::new().allow_origin(AllowOrigin::exact(HeaderValue::from_static("null")))
    } else {
        tracing::info!("CORS: Allowing {} origin(s)", origins.len());
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryConnectionRegistry;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn gateway() -> Arc<SessionGateway> {
        Arc::new(SessionGateway::new(Arc::new(InMemoryConnectionRegistry::new())))
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let app = create_router(gateway(), &AppConfig::default());

        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn configured_origin_is_echoed() {
        let mut config = AppConfig::default();
        config.server.environment = Environment::Production;
        config.server.cors_origins = Some("http://localhost:3000".to_string());
        let app = create_router(gateway(), &config);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .header(header::ORIGIN, "http://localhost:3000")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(
            response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
            Some(&HeaderValue::from_static("http://localhost:3000"))
        );
    }

    #[tokio::test]
    async fn plain_get_on_ws_path_is_rejected() {
        let app = create_router(gateway(), &AppConfig::default());

        let response = app
            .oneshot(Request::builder().uri("/ws").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert!(response.status().is_client_error());
    }
}
