//! Mutation root.

use std::sync::Arc;

use async_graphql::{Context, ErrorExtensions, Object, Result};

use super::types::{EventInputData, UserInputData};
use crate::domain::CallerIdentity;
use crate::error::ApiError;
use crate::service::{BookingService, EventView, UserView};

/// `RootMutation` type.
#[derive(Debug, Default)]
pub struct MutationRoot;

#[Object(name = "RootMutation")]
impl MutationRoot {
    /// Creates an event owned by the caller named in the request context.
    async fn create_event(
        &self,
        ctx: &Context<'_>,
        event_input: EventInputData,
    ) -> Result<EventView> {
        let service = ctx.data::<Arc<BookingService>>()?;
        let caller = ctx
            .data_opt::<CallerIdentity>()
            .ok_or_else(|| ApiError::MissingIdentity.extend())?;
        service
            .create_event(caller, event_input.into())
            .await
            .map_err(|e| e.extend())
    }

    /// Registers a user. The response's `password` is always `null`.
    async fn create_user(&self, ctx: &Context<'_>, user_input: UserInputData) -> Result<UserView> {
        let service = ctx.data::<Arc<BookingService>>()?;
        service
            .create_user(user_input.into())
            .await
            .map_err(|e| e.extend())
    }
}
