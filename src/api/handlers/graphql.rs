//! GraphQL endpoints: query/mutation execution, GraphiQL, subscriptions.

use async_graphql::http::GraphiQLSource;
use async_graphql::{ErrorExtensions, Pos};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse, GraphQLSubscription};
use axum::Router;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use tracing::Instrument;

use crate::app_state::AppState;
use crate::domain::CallerIdentity;
use crate::graphql::ApiSchema;

/// `POST /graphql` — Execute a GraphQL query or mutation.
///
/// The optional `x-user-id` header becomes the request's
/// [`CallerIdentity`]; `createEvent` attributes the new event to it.
#[utoipa::path(
    post,
    path = "/graphql",
    tag = "GraphQL",
    summary = "Execute a GraphQL operation",
    description = "Accepts a standard GraphQL-over-HTTP JSON body. Errors are reported in the `errors` array with `extensions.code`.",
    params(
        ("x-user-id" = Option<String>, Header, description = "Id of the user the request acts for"),
    ),
    request_body = serde_json::Value,
    responses(
        (status = 200, description = "GraphQL response", body = serde_json::Value),
    )
)]
pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    req: GraphQLRequest,
) -> GraphQLResponse {
    let request_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("graphql", %request_id);

    let mut request = req.into_inner();
    match CallerIdentity::from_headers(&headers) {
        Ok(Some(caller)) => request = request.data(caller),
        Ok(None) => {}
        Err(err) => {
            tracing::debug!(%request_id, error = %err, "rejecting request with bad caller header");
            let error = err.extend().into_server_error(Pos::default());
            return async_graphql::Response::from_errors(vec![error]).into();
        }
    }

    state.schema.execute(request).instrument(span).await.into()
}

/// `GET /graphql` — GraphiQL IDE.
pub async fn graphiql_handler() -> impl IntoResponse {
    Html(
        GraphiQLSource::build()
            .endpoint("/graphql")
            .subscription_endpoint("/graphql/ws")
            .finish(),
    )
}

/// GraphQL routes. Subscriptions are served over WebSocket at
/// `/graphql/ws`.
pub fn routes(schema: ApiSchema) -> Router<AppState> {
    Router::new()
        .route("/graphql", get(graphiql_handler).post(graphql_handler))
        .route_service("/graphql/ws", GraphQLSubscription::new(schema))
}
