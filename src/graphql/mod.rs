//! GraphQL schema: roots, object types, and schema construction.
//!
//! The schema exposes `events`, `createEvent`, `createUser`, and the
//! `eventCreated` / `userCreated` subscriptions. Relational fields resolve
//! lazily; the only bound on nesting is the configured depth limit.

pub mod mutation;
pub mod query;
pub mod subscription;
pub mod types;

use std::sync::Arc;

use async_graphql::Schema;

pub use mutation::MutationRoot;
pub use query::QueryRoot;
pub use subscription::SubscriptionRoot;

use crate::service::BookingService;

/// The gateway's executable schema.
pub type ApiSchema = Schema<QueryRoot, MutationRoot, SubscriptionRoot>;

/// Builds the schema with the service injected as context data.
#[must_use]
pub fn build_schema(service: Arc<BookingService>, depth_limit: usize) -> ApiSchema {
    Schema::build(QueryRoot, MutationRoot, SubscriptionRoot)
        .data(service)
        .limit_depth(depth_limit)
        .finish()
}
