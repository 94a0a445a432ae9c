//! MongoDB document shapes for the `events` and `users` collections.
//!
//! Field names match the documents the service has always written
//! (`_id`, `createdEvents`), so existing collections load unchanged.

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::domain::{EventId, EventRecord, UserId, UserRecord};
use crate::error::ApiError;

/// A document in the `events` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDocument {
    /// Primary key.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Short title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Ticket price.
    pub price: f64,
    /// Event date as a BSON date.
    pub date: mongodb::bson::DateTime,
    /// Creator's user id.
    pub creator: ObjectId,
}

/// A document in the `users` collection.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDocument {
    /// Primary key.
    #[serde(rename = "_id")]
    pub id: ObjectId,
    /// Unique email address.
    pub email: String,
    /// bcrypt hash.
    pub password: String,
    /// Ids of events this user created, in creation order.
    #[serde(rename = "createdEvents", default)]
    pub created_events: Vec<ObjectId>,
}

impl std::fmt::Debug for UserDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDocument")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("created_events", &self.created_events)
            .finish_non_exhaustive()
    }
}

impl From<&EventRecord> for EventDocument {
    fn from(record: &EventRecord) -> Self {
        Self {
            id: *record.id.as_object_id(),
            title: record.title.clone(),
            description: record.description.clone(),
            price: record.price,
            date: mongodb::bson::DateTime::from_millis(record.date.timestamp_millis()),
            creator: *record.creator.as_object_id(),
        }
    }
}

impl TryFrom<EventDocument> for EventRecord {
    type Error = ApiError;

    fn try_from(doc: EventDocument) -> Result<Self, Self::Error> {
        let date = DateTime::<Utc>::from_timestamp_millis(doc.date.timestamp_millis())
            .ok_or_else(|| ApiError::Storage(format!("event {} has an out-of-range date", doc.id)))?;
        Ok(Self {
            id: EventId::from_object_id(doc.id),
            title: doc.title,
            description: doc.description,
            price: doc.price,
            date,
            creator: UserId::from_object_id(doc.creator),
        })
    }
}

impl From<&UserRecord> for UserDocument {
    fn from(record: &UserRecord) -> Self {
        Self {
            id: *record.id.as_object_id(),
            email: record.email.clone(),
            password: record.password_hash.clone(),
            created_events: record
                .created_events
                .iter()
                .map(|id| *id.as_object_id())
                .collect(),
        }
    }
}

impl From<UserDocument> for UserRecord {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: UserId::from_object_id(doc.id),
            email: doc.email,
            password_hash: doc.password,
            created_events: doc
                .created_events
                .into_iter()
                .map(EventId::from_object_id)
                .collect(),
        }
    }
}
