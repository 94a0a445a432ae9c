//! Type-safe document identifiers.
//!
//! [`EventId`] and [`UserId`] are newtype wrappers around a MongoDB
//! [`ObjectId`] so that an event reference can never be passed where a
//! user reference is expected.

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;

use crate::error::ApiError;

macro_rules! object_id_newtype {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(ObjectId);

        impl $name {
            /// Generates a fresh identifier.
            #[must_use]
            pub fn new() -> Self {
                Self(ObjectId::new())
            }

            /// Wraps an existing [`ObjectId`].
            #[must_use]
            pub const fn from_object_id(oid: ObjectId) -> Self {
                Self(oid)
            }

            /// Returns the inner [`ObjectId`].
            #[must_use]
            pub const fn as_object_id(&self) -> &ObjectId {
                &self.0
            }

            /// Parses a 24-character hex string.
            ///
            /// # Errors
            ///
            /// Returns [`ApiError::InvalidInput`] if `raw` is not a valid
            /// object id.
            pub fn parse(raw: &str) -> Result<Self, ApiError> {
                ObjectId::parse_str(raw.trim())
                    .map(Self)
                    .map_err(|_| ApiError::InvalidInput(format!("invalid {} id: {raw:?}", $label)))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0.to_hex())
            }
        }

        impl FromStr for $name {
            type Err = ApiError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<ObjectId> for $name {
            fn from(oid: ObjectId) -> Self {
                Self(oid)
            }
        }

        impl From<$name> for ObjectId {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

object_id_newtype!(
    /// Unique identifier of a stored event.
    EventId,
    "event"
);

object_id_newtype!(
    /// Unique identifier of a stored user.
    UserId,
    "user"
);
