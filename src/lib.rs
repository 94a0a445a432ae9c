//! # event-booking-gateway
//!
//! GraphQL API for events and the users who create them, backed by
//! MongoDB.
//!
//! Relational fields (`Event.creator`, `User.createdEvents`) are resolved
//! lazily: views carry [`domain::Deferred`] loaders bound to foreign ids,
//! and a lookup only happens when a query selects the field.
//!
//! ## Architecture
//!
//! ```text
//! Clients (HTTP, WebSocket)
//!     │
//!     ├── Axum routes (api/)
//!     ├── async-graphql schema (graphql/)
//!     │
//!     ├── BookingService + RelationResolver (service/)
//!     ├── EventBus, Deferred, records (domain/)
//!     │
//!     └── Store: MongoStore | MemoryStore (persistence/)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod graphql;
pub mod persistence;
pub mod service;
