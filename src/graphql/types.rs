//! GraphQL object and input types.
//!
//! [`EventView`] and [`UserView`] are exposed as `Event` and `User`. Their
//! relational fields call [`crate::domain::Deferred::resolve`], so storage
//! is only hit when a query actually selects them.

use std::fmt;

use async_graphql::{ErrorExtensions, ID, InputObject, Object, Result};

use crate::domain::{EventInput, UserInput};
use crate::service::{EventView, UserView};

#[Object(name = "Event")]
impl EventView {
    /// Event id.
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.record.id.to_string())
    }

    async fn title(&self) -> &str {
        &self.record.title
    }

    async fn description(&self) -> &str {
        &self.record.description
    }

    async fn price(&self) -> f64 {
        self.record.price
    }

    /// ISO-8601 timestamp with millisecond precision.
    async fn date(&self) -> String {
        self.record.date_iso()
    }

    /// The user who created the event, fetched on demand.
    async fn creator(&self) -> Result<UserView> {
        self.creator.resolve().await.map_err(|e| e.extend())
    }
}

#[Object(name = "User")]
impl UserView {
    /// User id.
    #[graphql(name = "_id")]
    async fn id(&self) -> ID {
        ID(self.id.to_string())
    }

    async fn email(&self) -> &str {
        &self.email
    }

    /// Always `null`; passwords are never returned.
    async fn password(&self) -> Option<String> {
        None
    }

    /// Events this user created, in creation order, fetched on demand.
    async fn created_events(&self) -> Result<Vec<EventView>> {
        self.created_events.resolve().await.map_err(|e| e.extend())
    }
}

/// `EventInput` argument of `createEvent`.
#[derive(Debug, Clone, InputObject)]
#[graphql(name = "EventInput")]
pub struct EventInputData {
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Ticket price.
    pub price: f64,
    /// Date string (`YYYY-MM-DD` or ISO-8601).
    pub date: String,
}

impl From<EventInputData> for EventInput {
    fn from(data: EventInputData) -> Self {
        Self {
            title: data.title,
            description: data.description,
            price: data.price,
            date: data.date,
        }
    }
}

/// `UserInput` argument of `createUser`.
#[derive(Clone, InputObject)]
#[graphql(name = "UserInput")]
pub struct UserInputData {
    /// Email address.
    pub email: String,
    /// Plaintext password.
    pub password: String,
}

impl fmt::Debug for UserInputData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserInputData")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

impl From<UserInputData> for UserInput {
    fn from(data: UserInputData) -> Self {
        Self {
            email: data.email,
            password: data.password,
        }
    }
}
