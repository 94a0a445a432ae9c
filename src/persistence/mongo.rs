//! MongoDB implementation of the persistence layer.

use std::collections::HashMap;

use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::bson::oid::ObjectId;
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};

use super::Store;
use super::models::{EventDocument, UserDocument};
use crate::domain::{EventId, EventRecord, NewEvent, NewUser, UserId, UserRecord};
use crate::error::ApiError;

const EVENTS: &str = "events";
const USERS: &str = "users";
const EMAIL_INDEX: &str = "users_email_unique";
const DUPLICATE_KEY: i32 = 11000;

/// MongoDB-backed [`Store`].
#[derive(Debug, Clone)]
pub struct MongoStore {
    database: Database,
    events: Collection<EventDocument>,
    users: Collection<UserDocument>,
}

impl MongoStore {
    /// Wraps an already-selected database without touching the server.
    #[must_use]
    pub fn new(database: Database) -> Self {
        Self {
            events: database.collection(EVENTS),
            users: database.collection(USERS),
            database,
        }
    }

    /// Connects, pings, and ensures indexes exist.
    ///
    /// Called once at startup; any failure here should abort the process.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] if the URI is invalid, the server is
    /// unreachable, or the unique email index cannot be created (for
    /// example because duplicates already exist).
    pub async fn connect(uri: &str, database: &str) -> Result<Self, ApiError> {
        let client = Client::with_uri_str(uri).await?;
        let store = Self::new(client.database(database));
        store.ping().await?;
        store.ensure_indexes().await?;
        tracing::info!(database, "connected to mongodb");
        Ok(store)
    }

    /// Creates the unique index on `users.email`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Storage`] on database failure.
    pub async fn ensure_indexes(&self) -> Result<(), ApiError> {
        let options = IndexOptions::builder()
            .unique(true)
            .name(EMAIL_INDEX.to_string())
            .build();
        let index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(options)
            .build();
        self.users.create_index(index).await?;
        Ok(())
    }
}

fn object_ids<I: Copy + Into<ObjectId>>(ids: &[I]) -> Vec<ObjectId> {
    ids.iter().map(|id| (*id).into()).collect()
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl Store for MongoStore {
    async fn list_events(&self) -> Result<Vec<EventRecord>, ApiError> {
        let docs: Vec<EventDocument> = self.events.find(doc! {}).await?.try_collect().await?;
        docs.into_iter().map(EventRecord::try_from).collect()
    }

    async fn find_events(&self, ids: &[EventId]) -> Result<Vec<EventRecord>, ApiError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let filter = doc! { "_id": { "$in": object_ids(ids) } };
        let docs: Vec<EventDocument> = self.events.find(filter).await?.try_collect().await?;

        // `$in` returns documents in storage order; callers want `ids` order.
        let mut by_id: HashMap<EventId, EventRecord> = HashMap::with_capacity(docs.len());
        for doc in docs {
            let record = EventRecord::try_from(doc)?;
            by_id.insert(record.id, record);
        }
        Ok(ids.iter().filter_map(|id| by_id.get(id).cloned()).collect())
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
        self.events.insert_one(EventDocument::from(&record)).await?;
        Ok(record)
    }

    async fn delete_event(&self, id: EventId) -> Result<bool, ApiError> {
        let oid: ObjectId = id.into();
        let result = self.events.delete_one(doc! { "_id": oid }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_user(&self, id: UserId) -> Result<Option<UserRecord>, ApiError> {
        let oid: ObjectId = id.into();
        let doc = self.users.find_one(doc! { "_id": oid }).await?;
        Ok(doc.map(UserRecord::from))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<UserRecord>, ApiError> {
        let doc = self.users.find_one(doc! { "email": email }).await?;
        Ok(doc.map(UserRecord::from))
    }

    async fn insert_user(&self, user: NewUser) -> Result<UserRecord, ApiError> {
        let record = UserRecord {
            id: UserId::new(),
            email: user.email,
            password_hash: user.password_hash,
            created_events: Vec::new(),
        };
        match self.users.insert_one(UserDocument::from(&record)).await {
            Ok(_) => Ok(record),
            Err(err) if is_duplicate_key(&err) => Err(ApiError::Conflict(format!(
                "user with email {} already exists",
                record.email
            ))),
            Err(err) => Err(err.into()),
        }
    }

    async fn append_created_event(
        &self,
        user_id: UserId,
        event_id: EventId,
    ) -> Result<(), ApiError> {
        let user_oid: ObjectId = user_id.into();
        let event_oid: ObjectId = event_id.into();
        let result = self
            .users
            .update_one(
                doc! { "_id": user_oid },
                doc! { "$push": { "createdEvents": event_oid } },
            )
            .await?;
        if result.matched_count == 0 {
            return Err(ApiError::NotFound(format!("user {user_id}")));
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), ApiError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
