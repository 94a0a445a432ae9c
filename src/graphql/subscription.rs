//! Subscription root fed by the [`EventBus`](crate::domain::EventBus).

use std::sync::Arc;

use async_graphql::{Context, Result, Subscription};
use futures_util::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast::{self, error::RecvError};

use crate::domain::DomainEvent;
use crate::service::{BookingService, EventView, UserView};

/// `RootSubscription` type.
#[derive(Debug, Default)]
pub struct SubscriptionRoot;

/// Turns a bus receiver into a stream, skipping over lag gaps.
fn domain_events(rx: broadcast::Receiver<DomainEvent>) -> impl Stream<Item = DomainEvent> {
    stream::unfold(rx, |mut rx| async move {
        loop {
            match rx.recv().await {
                Ok(event) => return Some((event, rx)),
                Err(RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "subscriber lagged behind event bus");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    })
}

/// Builds the streamed view of a new user; `createdEvents` stays lazy.
fn created_user_view(service: &BookingService, event: DomainEvent) -> Option<UserView> {
    match event {
        DomainEvent::UserCreated {
            user_id,
            email,
            created_events,
        } => Some(UserView {
            id: user_id,
            email,
            created_events: service.relations().events_of(created_events),
        }),
        DomainEvent::EventCreated { .. } => None,
    }
}

#[Subscription(name = "RootSubscription")]
impl SubscriptionRoot {
    /// Events created after the subscription started.
    async fn event_created(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = EventView>> {
        let service = Arc::clone(ctx.data::<Arc<BookingService>>()?);
        let rx = service.event_bus().subscribe();
        Ok(domain_events(rx).filter_map(move |event| {
            let view = match event {
                DomainEvent::EventCreated { event } => {
                    Some(service.relations().event_view(event))
                }
                DomainEvent::UserCreated { .. } => None,
            };
            futures_util::future::ready(view)
        }))
    }

    /// Users registered after the subscription started.
    async fn user_created(&self, ctx: &Context<'_>) -> Result<impl Stream<Item = UserView>> {
        let service = Arc::clone(ctx.data::<Arc<BookingService>>()?);
        let rx = service.event_bus().subscribe();
        Ok(domain_events(rx).filter_map(move |event| {
            futures_util::future::ready(created_user_view(&service, event))
        }))
    }
}
