//! Booking service: the event and user operations behind the GraphQL API.

use std::sync::Arc;

use super::password::PasswordHasher;
use super::relations::{EventView, RelationResolver, UserView};
use crate::domain::event::parse_event_date;
use crate::domain::{CallerIdentity, DomainEvent, EventBus, EventInput, NewEvent, NewUser, UserInput};
use crate::error::ApiError;
use crate::persistence::Store;

/// Orchestration layer for all event and user operations.
///
/// Stateless coordinator: owns a handle to the [`Store`], the
/// [`RelationResolver`] that builds lazy views, the [`PasswordHasher`], and
/// the [`EventBus`]. Every mutation follows the pattern: check → write →
/// publish → return view.
#[derive(Debug, Clone)]
pub struct BookingService {
    store: Arc<dyn Store>,
    relations: RelationResolver,
    hasher: PasswordHasher,
    event_bus: EventBus,
}

impl BookingService {
    /// Creates a new `BookingService`.
    #[must_use]
    pub fn new(store: Arc<dyn Store>, hasher: PasswordHasher, event_bus: EventBus) -> Self {
        Self {
            relations: RelationResolver::new(Arc::clone(&store)),
            store,
            hasher,
            event_bus,
        }
    }

    /// Returns the resolver used to build lazy views.
    #[must_use]
    pub fn relations(&self) -> &RelationResolver {
        &self.relations
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a reference to the backing store.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    /// Lists every event with a lazily resolved creator.
    ///
    /// # Errors
    ///
    /// Propagates storage errors unchanged.
    pub async fn list_events(&self) -> Result<Vec<EventView>, ApiError> {
        let records = self.store.list_events().await?;
        Ok(records
            .into_iter()
            .map(|r| self.relations.event_view(r))
            .collect())
    }

    /// Creates an event owned by `caller` and links it to the caller's
    /// created events.
    ///
    /// The creator is checked before anything is written. If linking fails
    /// after the event was stored, the event is deleted again so no orphan
    /// is left behind.
    ///
    /// # Errors
    ///
    /// - [`ApiError::InvalidInput`] if the date cannot be coerced.
    /// - [`ApiError::NotFound`] if the caller is not a stored user.
    /// - [`ApiError::Storage`] on any write failure.
    pub async fn create_event(
        &self,
        caller: &CallerIdentity,
        input: EventInput,
    ) -> Result<EventView, ApiError> {
        let date = parse_event_date(&input.date)?;
        let creator = caller.user_id();

        if self.store.find_user(creator).await?.is_none() {
            return Err(ApiError::NotFound(format!(
                "cannot add an event to user {creator}: user does not exist"
            )));
        }

        let event = self
            .store
            .insert_event(NewEvent {
                title: input.title,
                description: input.description,
                price: input.price,
                date,
                creator,
            })
            .await?;

        if let Err(err) = self.store.append_created_event(creator, event.id).await {
            tracing::warn!(event_id = %event.id, user_id = %creator, error = %err, "linking event to creator failed, removing event");
            if let Err(cleanup) = self.store.delete_event(event.id).await {
                tracing::error!(event_id = %event.id, error = %cleanup, "compensating delete failed, event is orphaned");
            }
            return Err(err);
        }

        let _ = self
            .event_bus
            .publish(DomainEvent::EventCreated { event: event.clone() });

        tracing::info!(event_id = %event.id, user_id = %creator, "event created");
        Ok(self.relations.event_view(event))
    }

    /// Registers a user with a bcrypt-hashed password.
    ///
    /// The returned view never carries the password.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Conflict`] if the email is taken, whether detected by
    ///   the pre-check or by the store's uniqueness constraint.
    /// - [`ApiError::Internal`] if hashing fails.
    /// - [`ApiError::Storage`] on write failure.
    pub async fn create_user(&self, input: UserInput) -> Result<UserView, ApiError> {
        if self.store.find_user_by_email(&input.email).await?.is_some() {
            return Err(ApiError::Conflict(format!(
                "user with email {} already exists",
                input.email
            )));
        }

        let password_hash = self.hasher.hash(input.password).await?;
        let user = self
            .store
            .insert_user(NewUser {
                email: input.email,
                password_hash,
            })
            .await?;

        let _ = self.event_bus.publish(DomainEvent::UserCreated {
            user_id: user.id,
            email: user.email.clone(),
            created_events: user.created_events.clone(),
        });

        tracing::info!(user_id = %user.id, "user created");
        Ok(self.relations.user_view(user))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::domain::UserId;
    use crate::domain::event::format_event_date;
    use crate::persistence::MemoryStore;
    use crate::persistence::instrumented::InstrumentedStore;
    use crate::service::password::MIN_COST;

    fn make_service(store: Arc<dyn Store>) -> BookingService {
        let Ok(hasher) = PasswordHasher::new(MIN_COST) else {
            panic!("valid cost");
        };
        BookingService::new(store, hasher, EventBus::new(64))
    }

    fn user_input(email: &str) -> UserInput {
        UserInput {
            email: email.to_string(),
            password: "secret".to_string(),
        }
    }

    fn event_input(date: &str) -> EventInput {
        EventInput {
            title: "T".to_string(),
            description: "D".to_string(),
            price: 9.99,
            date: date.to_string(),
        }
    }

    #[tokio::test]
    async fn create_user_stores_hash_not_plaintext() {
        let store = Arc::new(MemoryStore::new());
        let service = make_service(Arc::clone(&store) as Arc<dyn Store>);

        let Ok(view) = service.create_user(user_input("a@x.com")).await else {
            panic!("create_user failed");
        };
        assert_eq!(view.email, "a@x.com");

        let Ok(Some(stored)) = store.find_user(view.id).await else {
            panic!("user not stored");
        };
        assert_ne!(stored.password_hash, "secret");
        assert!(stored.password_hash.starts_with("$2"));
    }

    #[tokio::test]
    async fn second_user_with_same_email_conflicts() {
        let store = Arc::new(MemoryStore::new());
        let service = make_service(Arc::clone(&store) as Arc<dyn Store>);

        assert!(service.create_user(user_input("a@x.com")).await.is_ok());
        let Err(ApiError::Conflict(_)) = service.create_user(user_input("a@x.com")).await else {
            panic!("expected conflict");
        };
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_duplicate_emails_yield_one_user() {
        let store = Arc::new(MemoryStore::new());
        let service = make_service(Arc::clone(&store) as Arc<dyn Store>);

        let mut handles = Vec::new();
        for _ in 0..8 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service.create_user(user_input("race@x.com")).await
            }));
        }

        let mut created = 0;
        let mut conflicts = 0;
        for handle in handles {
            match handle.await {
                Ok(Ok(_)) => created += 1,
                Ok(Err(ApiError::Conflict(_))) => conflicts += 1,
                other => panic!("unexpected outcome: {other:?}"),
            }
        }
        assert_eq!(created, 1);
        assert_eq!(conflicts, 7);
        assert_eq!(store.user_count().await, 1);
    }

    #[tokio::test]
    async fn create_event_links_creator_and_round_trips_date() {
        let store = Arc::new(MemoryStore::new());
        let service = make_service(Arc::clone(&store) as Arc<dyn Store>);
        let Ok(user) = service.create_user(user_input("a@x.com")).await else {
            panic!("create_user failed");
        };
        let caller = CallerIdentity::new(user.id);

        let Ok(event) = service.create_event(&caller, event_input("2024-01-01")).await else {
            panic!("create_event failed");
        };
        assert_eq!(event.record.date_iso(), "2024-01-01T00:00:00.000Z");
        let Ok(parsed) = parse_event_date(&event.record.date_iso()) else {
            panic!("output date should parse");
        };
        assert_eq!(format_event_date(&parsed), "2024-01-01T00:00:00.000Z");

        let Ok(creator) = event.creator.resolve().await else {
            panic!("creator should resolve");
        };
        assert_eq!(creator.id, user.id);

        let Ok(created) = creator.created_events.resolve().await else {
            panic!("created events should resolve");
        };
        let ids: Vec<_> = created.iter().map(|e| e.record.id).collect();
        assert_eq!(ids, [event.record.id]);
    }

    #[tokio::test]
    async fn unknown_caller_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let service = make_service(Arc::clone(&store) as Arc<dyn Store>);
        let caller = CallerIdentity::new(UserId::new());

        let Err(ApiError::NotFound(_)) = service.create_event(&caller, event_input("2024-01-01")).await
        else {
            panic!("expected not found");
        };
        assert_eq!(store.event_count().await, 0);
    }

    #[tokio::test]
    async fn bad_date_is_rejected_before_any_lookup() {
        let store = Arc::new(InstrumentedStore::default());
        let service = make_service(Arc::clone(&store) as Arc<dyn Store>);
        let caller = CallerIdentity::new(UserId::new());

        let Err(ApiError::InvalidInput(_)) = service.create_event(&caller, event_input("soon")).await
        else {
            panic!("expected invalid input");
        };
        assert_eq!(store.user_lookups(), 0);
    }

    #[tokio::test]
    async fn failed_link_removes_the_event() {
        let store = Arc::new(InstrumentedStore::default());
        let service = make_service(Arc::clone(&store) as Arc<dyn Store>);
        let Ok(user) = service.create_user(user_input("a@x.com")).await else {
            panic!("create_user failed");
        };
        store.fail_append.store(true, Ordering::SeqCst);

        let result = service
            .create_event(&CallerIdentity::new(user.id), event_input("2024-01-01"))
            .await;
        let Err(ApiError::Storage(_)) = result else {
            panic!("expected storage failure");
        };
        assert_eq!(store.inner.event_count().await, 0);
    }

    #[tokio::test]
    async fn list_events_returns_all_with_lazy_creators() {
        let store = Arc::new(InstrumentedStore::default());
        let service = make_service(Arc::clone(&store) as Arc<dyn Store>);
        let Ok(user) = service.create_user(user_input("a@x.com")).await else {
            panic!("create_user failed");
        };
        let caller = CallerIdentity::new(user.id);
        for date in ["2024-01-01", "2024-02-01"] {
            assert!(service.create_event(&caller, event_input(date)).await.is_ok());
        }
        store.reset_counts();

        let Ok(events) = service.list_events().await else {
            panic!("list failed");
        };
        assert_eq!(events.len(), 2);
        assert_eq!(store.user_lookups(), 0);
        for event in &events {
            let Ok(creator) = event.creator.resolve().await else {
                panic!("creator should resolve");
            };
            assert_eq!(creator.id, event.record.creator);
        }
    }

    #[tokio::test]
    async fn mutations_publish_domain_events() {
        let store = Arc::new(MemoryStore::new());
        let service = make_service(Arc::clone(&store) as Arc<dyn Store>);
        let mut rx = service.event_bus().subscribe();

        let Ok(user) = service.create_user(user_input("a@x.com")).await else {
            panic!("create_user failed");
        };
        let _ = service
            .create_event(&CallerIdentity::new(user.id), event_input("2024-01-01"))
            .await;

        let Ok(DomainEvent::UserCreated { user_id, .. }) = rx.recv().await else {
            panic!("expected user_created first");
        };
        assert_eq!(user_id, user.id);
        let Ok(DomainEvent::EventCreated { event }) = rx.recv().await else {
            panic!("expected event_created second");
        };
        assert_eq!(event.creator, user.id);
    }
}
