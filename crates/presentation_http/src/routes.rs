//! Route definitions

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post},
};
use infrastructure::ServerConfig;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::{handlers, middleware::RequestIdLayer, state::AppState};

/// Create the main router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors = cors_layer(server);
    let body_limit = DefaultBodyLimit::max(server.max_upload_bytes);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/predict", post(handlers::predict::predict))
        // Path used by the web frontend's proxy
        .route("/api/predict", post(handlers::predict::predict))
        .layer(body_limit)
        // Last added is outermost
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(RequestIdLayer::new())
        .with_state(state)
}

/// CORS policy: any origin when none are configured, the listed ones otherwise
pub fn cors_layer(config: &ServerConfig) -> CorsLayer {
    if config.allowed_origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any)
}
