//! Persistence layer: the [`Store`] seam and its implementations.
//!
//! [`MongoStore`] talks to MongoDB through the official driver;
//! [`MemoryStore`] keeps everything in process and backs the test suite and
//! the `memory` storage backend.

pub mod memory;
pub mod models;
pub mod mongo;

#[cfg(test)]
pub(crate) mod instrumented;

use async_trait::async_trait;

use crate::domain::{EventId, EventRecord, NewEvent, NewUser, UserId, UserRecord};
use crate::error::ApiError;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Document storage for events and users.
///
/// Implementations must enforce email uniqueness at write time: two
/// concurrent [`Store::insert_user`] calls with the same email yield one
/// record and one [`ApiError::Conflict`].
#[async_trait]
pub trait Store: std::fmt::Debug + Send + Sync {
    /// Returns every event in storage order.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] on backend failure.
    async fn list_events(&self) -> Result<Vec<EventRecord>, ApiError>;

    /// Returns the events whose ids appear in `ids`, ordered as in `ids`.
    /// Unknown ids are skipped.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] on backend failure.
    async fn find_events(&self, ids: &[EventId]) -> Result<Vec<EventRecord>, ApiError>;

    /// Writes a new event and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] on backend failure.
    async fn insert_event(&self, event: NewEvent) -> Result<EventRecord, ApiError>;

    /// Deletes an event. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] on backend failure.
    async fn delete_event(&self, id: EventId) -> Result<bool, ApiError>;

    /// Looks up a user by id.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] on backend failure.
    async fn find_user(&self, id: UserId) -> Result<Option<UserRecord>, ApiError>;

    /// Looks up a user by exact email.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] on backend failure.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ApiError>;

    /// Writes a new user.
    ///
    /// # Errors
    ///
    /// [`ApiError::Conflict`] on a duplicate email, [`ApiError::Storage`]
    /// on backend failure.
    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, ApiError>;

    /// Appends `event_id` to the user's created-events sequence.
    ///
    /// # Errors
    ///
    /// [`ApiError::NotFound`] if the user does not exist,
    /// [`ApiError::Storage`] on backend failure.
    async fn append_created_event(&self, user_id: UserId, event_id: EventId)
    -> Result<(), ApiError>;

    /// Round-trips to the backend to prove it is reachable.
    ///
    /// # Errors
    ///
    /// [`ApiError::Storage`] if the backend does not answer.
    async fn ping(&self) -> Result<(), ApiError>;
}
