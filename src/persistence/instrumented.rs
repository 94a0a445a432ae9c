//! Test double that counts lookups and injects failures.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;

use super::{MemoryStore, Store};
use crate::domain::{EventId, EventRecord, NewEvent, NewUser, UserId, UserRecord};
use crate::error::ApiError;

/// Wraps a [`MemoryStore`], counting relational lookups.
#[derive(Debug, Default)]
pub(crate) struct InstrumentedStore {
    pub(crate) inner: MemoryStore,
    pub(crate) user_lookups: AtomicUsize,
    pub(crate) event_lookups: AtomicUsize,
    pub(crate) fail_append: AtomicBool,
}

impl InstrumentedStore {
    pub(crate) fn user_lookups(&self) -> usize {
        self.user_lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn event_lookups(&self) -> usize {
        self.event_lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn reset_counts(&self) {
        self.user_lookups.store(0, Ordering::SeqCst);
        self.event_lookups.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl Store for InstrumentedStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>, ApiError> {
        self.inner.list_events().await
    }

    async fn find_events(&self, ids: &[EventId]) -> Result<Vec<EventRecord>, ApiError> {
        self.event_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_events(ids).await
    }

    async fn insert_event(&self, event: NewEvent) -> Result<EventRecord, ApiError> {
        self.inner.insert_event(event).await
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, ApiError> {
        self.inner.delete_event(id).await
    }

    async fn find_user(&self, id: UserId) -> Result<Option<UserRecord>, ApiError> {
        self.user_lookups.fetch_add(1, Ordering::SeqCst);
        self.inner.find_user(id).await
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ApiError> {
        self.inner.find_user_by_email(email).await
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, ApiError> {
        self.inner.insert_user(user).await
    }

    async fn append_created_event(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<(), ApiError> {
        if self.fail_append.load(Ordering::SeqCst) {
            return Err(ApiError::Storage("injected append failure".to_string()));
        }
        self.inner.append_created_event(user_id, event_id).await
    }

    async fn ping(&self) -> Result<(), ApiError> {
        self.inner.ping().await
    }
}
