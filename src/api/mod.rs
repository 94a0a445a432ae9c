//! HTTP layer: route handlers and router composition.
//!
//! GraphQL lives at `/graphql`, system endpoints at the root, and the
//! OpenAPI document under `/api-docs`.

pub mod handlers;
pub mod openapi;

use std::time::Duration;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::app_state::AppState;
use crate::graphql::ApiSchema;

/// Builds the router with all endpoints, still awaiting its state.
pub fn build_router(schema: ApiSchema) -> Router<AppState> {
    Router::new()
        .merge(handlers::graphql::routes(schema))
        .merge(handlers::system::routes())
        .merge(openapi::routes())
}

/// Builds the complete application: routes, middleware, and state.
pub fn build_app(state: AppState, request_timeout: Duration) -> Router {
    build_router(state.schema.clone())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
