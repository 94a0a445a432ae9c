//! Shared application state injected into all Axum handlers.

use std::fmt;
use std::sync::Arc;

use crate::graphql::{ApiSchema, build_schema};
use crate::service::BookingService;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Booking service for all business logic.
    pub booking_service: Arc<BookingService>,
    /// Executable GraphQL schema.
    pub schema: ApiSchema,
}

impl AppState {
    /// Builds the state and the schema around `booking_service`.
    #[must_use]
    pub fn new(booking_service: Arc<BookingService>, depth_limit: usize) -> Self {
        let schema = build_schema(Arc::clone(&booking_service), depth_limit);
        Self {
            booking_service,
            schema,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("booking_service", &self.booking_service)
            .finish_non_exhaustive()
    }
}
