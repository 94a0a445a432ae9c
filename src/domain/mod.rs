//! Domain layer: identifiers, records, lazy relations, and events.
//!
//! Holds the server-side model independent of MongoDB and GraphQL: typed
//! ids, event and user records, the [`Deferred`] field used for lazy
//! cross-entity resolution, the caller identity, and the event bus.

pub mod caller;
pub mod deferred;
pub mod domain_event;
pub mod event;
pub mod event_bus;
pub mod ids;
pub mod user;

pub use caller::{CALLER_HEADER, CallerIdentity};
pub use deferred::Deferred;
pub use domain_event::DomainEvent;
pub use event::{EventInput, EventRecord, NewEvent};
pub use event_bus::EventBus;
pub use ids::{EventId, UserId};
pub use user::{NewUser, UserInput, UserRecord};
