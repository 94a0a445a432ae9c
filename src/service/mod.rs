//! Service layer: business logic orchestration.
//!
//! [`BookingService`] implements the event and user operations;
//! [`RelationResolver`] builds the lazy views they return.

pub mod booking_service;
pub mod password;
pub mod relations;

pub use booking_service::BookingService;
pub use password::PasswordHasher;
pub use relations::{EventView, RelationResolver, UserView};
