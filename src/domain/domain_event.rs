//! Domain events emitted after successful mutations.
//!
//! Every completed write publishes a [`DomainEvent`] through the
//! [`super::EventBus`]. GraphQL subscriptions forward them to clients.

use super::{EventId, EventRecord, UserId};

/// Notification that state changed.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// An event was stored and linked to its creator.
    EventCreated {
        /// The stored event.
        event: EventRecord,
    },

    /// A user registered.
    UserCreated {
        /// New user's id.
        user_id: UserId,
        /// New user's email.
        email: String,
        /// Events linked at registration time (empty for new users).
        created_events: Vec<EventId>,
    },
}

impl DomainEvent {
    /// Returns the event type as a static string slice.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::EventCreated { .. } => "event_created",
            Self::UserCreated { .. } => "user_created",
        }
    }
}
