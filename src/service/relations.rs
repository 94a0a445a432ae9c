//! Lazy cross-entity resolution.
//!
//! Storage keeps only foreign ids (`Event.creator`, `User.createdEvents`).
//! [`RelationResolver`] turns records into views whose relational fields are
//! [`Deferred`] loaders bound to those ids. Each loader, when run, performs
//! one storage round-trip and hands back views that are themselves lazy, so
//! `creator → createdEvents → creator → …` can go as deep as the query asks.
//! There is no cycle guard; the GraphQL depth limit bounds recursion.

use std::sync::Arc;

use crate::domain::{Deferred, EventId, EventRecord, UserId, UserRecord};
use crate::error::ApiError;
use crate::persistence::Store;

/// An event as seen by clients, with a lazily resolved creator.
#[derive(Debug, Clone)]
pub struct EventView {
    /// The stored event.
    pub record: EventRecord,
    /// Loader for the creating user.
    pub creator: Deferred<UserView>,
}

/// A user as seen by clients. The password hash is not carried at all.
#[derive(Debug, Clone)]
pub struct UserView {
    /// User id.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Loader for the user's events, in creation order.
    pub created_events: Deferred<Vec<EventView>>,
}

/// Builds views with deferred relational fields.
#[derive(Debug, Clone)]
pub struct RelationResolver {
    store: Arc<dyn Store>,
}

impl RelationResolver {
    /// Creates a resolver reading from `store`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Wraps an event record; the creator is not fetched yet.
    #[must_use]
    pub fn event_view(&self, record: EventRecord) -> EventView {
        let creator = self.creator_of(record.creator);
        EventView { record, creator }
    }

    /// Wraps a user record; created events are not fetched yet.
    #[must_use]
    pub fn user_view(&self, record: UserRecord) -> UserView {
        let created_events = self.events_of(record.created_events);
        UserView {
            id: record.id,
            email: record.email,
            created_events,
        }
    }

    /// Binds a loader for the user with the given id.
    #[must_use]
    pub fn creator_of(&self, user_id: UserId) -> Deferred<UserView> {
        let resolver = self.clone();
        Deferred::new(move || {
            let resolver = resolver.clone();
            async move { resolver.resolve_creator(user_id).await }
        })
    }

    /// Binds a loader for the events with the given ids. An empty id list
    /// needs no loader.
    #[must_use]
    pub fn events_of(&self, ids: Vec<EventId>) -> Deferred<Vec<EventView>> {
        if ids.is_empty() {
            return Deferred::ready(Vec::new());
        }
        let resolver = self.clone();
        let ids: Arc<[EventId]> = ids.into();
        Deferred::new(move || {
            let resolver = resolver.clone();
            let ids = Arc::clone(&ids);
            async move { resolver.resolve_created_events(&ids).await }
        })
    }

    /// Loads a user and returns its view.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::NotFound`] if the user does not exist, or any
    /// storage error.
    pub async fn resolve_creator(&self, user_id: UserId) -> Result<UserView, ApiError> {
        let record = self
            .store
            .find_user(user_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(format!("user {user_id}")))?;
        Ok(self.user_view(record))
    }

    /// Loads events in the order of `ids`, skipping ids that no longer
    /// resolve.
    ///
    /// # Errors
    ///
    /// Propagates storage errors.
    pub async fn resolve_created_events(
        &self,
        ids: &[EventId],
    ) -> Result<Vec<EventView>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let records = self.store.find_events(ids).await?;
        Ok(records.into_iter().map(|r| self.event_view(r)).collect())
    }
}
