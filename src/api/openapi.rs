//! OpenAPI document for the HTTP surface.
//!
//! GraphQL types are described by the schema itself (GraphiQL, SDL); this
//! document covers the transport endpoints around it.

use axum::Router;
use utoipa::OpenApi;

use super::handlers;
use crate::app_state::AppState;
use crate::error::{ErrorBody, ErrorResponse};

/// OpenAPI description of the gateway's HTTP endpoints.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "event-booking-gateway",
        description = "GraphQL gateway for events and users backed by MongoDB"
    ),
    paths(
        handlers::graphql::graphql_handler,
        handlers::system::health_handler,
        handlers::system::ready_handler,
    ),
    components(schemas(
        ErrorResponse,
        ErrorBody,
        handlers::system::HealthResponse,
        handlers::system::ReadinessResponse,
    )),
    tags(
        (name = "GraphQL", description = "GraphQL over HTTP"),
        (name = "System", description = "Liveness and readiness"),
    )
)]
pub struct ApiDoc;

/// Path the OpenAPI JSON is served from.
pub const OPENAPI_PATH: &str = "/api-docs/openapi.json";

/// Serves the OpenAPI JSON, plus Swagger UI when the `swagger-ui` feature
/// is enabled.
#[cfg(feature = "swagger-ui")]
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(utoipa_swagger_ui::SwaggerUi::new("/swagger-ui").url(OPENAPI_PATH, ApiDoc::openapi()))
}

/// Serves the OpenAPI JSON.
#[cfg(not(feature = "swagger-ui"))]
pub fn routes() -> Router<AppState> {
    use axum::Json;
    use axum::routing::get;

    Router::new().route(OPENAPI_PATH, get(|| async { Json(ApiDoc::openapi()) }))
}
