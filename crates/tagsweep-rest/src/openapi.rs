//! OpenAPI documentation configuration.

use crate::controllers::{
    admin_controller::FlushResponse,
    health_controller::{HealthResponse, ReadinessResponse},
    index_controller::{IndexRequest, IndexResponse},
    invalidation_controller::InvalidationRequest,
};
use tagsweep_core::{CacheTag, ErrorResponse, FieldError, QueryId};
use tagsweep_service::InvalidationOutcome;
use utoipa::openapi::path::ParameterIn;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::OpenApi;

/// OpenAPI documentation for the Tagsweep API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tagsweep API",
        version = "1.0.0",
        description = "Tag-based invalidation service for cached query results",
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        crate::controllers::invalidation_controller::invalidate,
        crate::controllers::index_controller::index_query,
        crate::controllers::admin_controller::flush,
        crate::controllers::health_controller::health_check,
        crate::controllers::health_controller::readiness_check,
        crate::controllers::health_controller::liveness_check,
    ),
    components(
        schemas(
            CacheTag,
            QueryId,
            ErrorResponse,
            FieldError,
            InvalidationRequest,
            InvalidationOutcome,
            IndexRequest,
            IndexResponse,
            FlushResponse,
            HealthResponse,
            ReadinessResponse,
        )
    ),
    tags(
        (name = "invalidation", description = "Change-event webhook"),
        (name = "index", description = "Query tag indexing"),
        (name = "admin", description = "Administrative endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Builds the OpenAPI document for the configured header names.
///
/// `secret_header` names the shared-secret header of the `webhook_secret`
/// scheme; `tags_header` names the cache-tag header of the index operation.
#[must_use]
pub fn api_doc(secret_header: &str, tags_header: &str) -> utoipa::openapi::OpenApi {
    let mut doc = ApiDoc::openapi();

    if let Some(components) = doc.components.as_mut() {
        components.add_security_scheme(
            "webhook_secret",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                secret_header,
                "Shared webhook secret",
            ))),
        );
    }

    let index_params = doc
        .paths
        .paths
        .get_mut("/index")
        .and_then(|item| item.post.as_mut())
        .and_then(|operation| operation.parameters.as_mut());
    if let Some(params) = index_params {
        for param in params
            .iter_mut()
            .filter(|param| matches!(param.parameter_in, ParameterIn::Header))
        {
            param.name = tags_header.to_string();
        }
    }

    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_webhook_paths() {
        let doc = api_doc("x-tagsweep-secret", "x-cache-tags");
        assert!(doc.paths.paths.contains_key("/invalidations"));
        assert!(doc.paths.paths.contains_key("/index"));
        assert!(doc.paths.paths.contains_key("/ready"));
    }

    #[test]
    fn test_openapi_uses_configured_header_names() {
        let doc = serde_json::to_value(api_doc("x-hook-key", "x-surrogate-keys")).unwrap();

        let scheme = &doc["components"]["securitySchemes"]["webhook_secret"];
        assert_eq!(scheme["in"], "header");
        assert_eq!(scheme["name"], "x-hook-key");

        let params = doc["paths"]["/index"]["post"]["parameters"].as_array().unwrap();
        let header = params.iter().find(|param| param["in"] == "header").unwrap();
        assert_eq!(header["name"], "x-surrogate-keys");
    }
}
