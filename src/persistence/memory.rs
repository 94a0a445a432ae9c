//! In-process store guarded by a single async lock.
//!
//! Collections are plain vectors so that listing preserves insertion order,
//! the same "natural order" a fresh MongoDB collection returns. The write
//! lock makes the email check and the insert one atomic step.

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::Store;
use crate::domain::{EventId, EventRecord, NewEvent, NewUser, UserId, UserRecord};
use crate::error::ApiError;

#[derive(Debug, Default)]
struct Collections {
    events: Vec<EventRecord>,
    users: Vec<UserRecord>,
}

/// Volatile [`Store`] implementation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) async fn event_count(&self) -> usize {
        self.collections.read().await.events.len()
    }

    #[cfg(test)]
    pub(crate) async fn user_count(&self) -> usize {
        self.collections.read().await.users.len()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>, ApiError> {
        Ok(self.collections.read().await.events.clone())
    }

    async fn find_events(&self, ids: &[EventId]) -> Result<Vec<EventRecord>, ApiError> {
        let collections = self.collections.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| collections.events.iter().find(|e| e.id == *id))
            .cloned()
            .collect())
    }

    async fn insert_event(&self, event: NewEvent) -> Result<EventRecord, ApiError> {
        let record = EventRecord {
            id: EventId::new(),
            title: event.title,
            description: event.description,
            price: event.price,
            date: event.date,
            creator: event.creator,
        };
        self.collections.write().await.events.push(record.clone());
        Ok(record)
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, ApiError> {
        let mut collections = self.collections.write().await;
        let before = collections.events.len();
        collections.events.retain(|e| e.id != id);
        Ok(collections.events.len() != before)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<UserRecord>, ApiError> {
        let collections = self.collections.read().await;
        Ok(collections.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ApiError> {
        let collections = self.collections.read().await;
        Ok(collections.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, ApiError> {
        let mut collections = self.collections.write().await;
        if collections.users.iter().any(|u| u.email == user.email) {
            return Err(ApiError::Conflict(format!(
                "user with email {} already exists",
                user.email
            )));
        }
        let record = UserRecord {
            id: UserId::new(),
            email: user.email,
            password_hash: user.password_hash,
            created_events: Vec::new(),
        };
        collections.users.push(record.clone());
        Ok(record)
    }

    async fn append_created_event(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<(), ApiError> {
        let mut collections = self.collections.write().await;
        let user = collections
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or_else(|| ApiError::NotFound(format!("user {user_id}")))?;
        user.created_events.push(event_id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), ApiError> {
        Ok(())
    }
}
