//! Query root.

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Object, Result};

use crate::service::{BookingService, EventView};

/// `RootQuery` type.
#[derive(Debug, Default)]
pub struct QueryRoot;

#[Object(name = "RootQuery")]
impl QueryRoot {
    /// Every stored event.
    async fn events(&self, ctx: &Context<'_>) -> Result<Vec<EventView>> {
        let service = ctx.data::<Arc<BookingService>>()?;
        service.list_events().await.map_err(|e| e.extend())
    }
}
