//! Main application router.

use crate::{
    controllers::{
        admin_controller, health_controller, index_controller, invalidation_controller,
    },
    middleware::{logging_middleware, webhook_auth, WebhookAuthState},
    openapi::api_doc,
    state::AppState,
};
use axum::{extract::DefaultBodyLimit, http::HeaderValue, middleware, routing::get, Router};
use tagsweep_config::ServerConfig;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router.
///
/// Every route under `/api/v1` requires the shared secret; health checks,
/// the OpenAPI document and the root route do not.
pub fn create_router(
    state: AppState,
    auth_state: WebhookAuthState,
    server_config: &ServerConfig,
) -> Router {
    let cors = create_cors_layer(server_config);
    let openapi = api_doc(auth_state.header().as_str(), state.tags_header.as_str());

    let api_router = Router::new()
        .merge(invalidation_controller::router())
        .merge(index_controller::router())
        .merge(admin_controller::router())
        .layer(middleware::from_fn_with_state(auth_state, webhook_auth))
        .with_state(state.clone());

    let router = Router::new()
        .merge(health_controller::router().with_state(state))
        .nest("/api/v1", api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .route("/", get(root))
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with webhook endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        if server_config.cors_origins.iter().any(|origin| origin == "*") {
            CorsLayer::permissive()
        } else {
            let origins = server_config
                .cors_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect::<Vec<HeaderValue>>();
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    } else {
        CorsLayer::new()
    }
}

/// Root endpoint handler.
async fn root() -> &'static str {
    "Tagsweep API v1"
}
