//! User records.

use std::fmt;

use super::{EventId, UserId};

/// A persisted user.
///
/// `password_hash` never leaves the service layer: views and logs omit it.
#[derive(Clone, PartialEq, Eq)]
pub struct UserRecord {
    /// Storage identifier.
    pub id: UserId,
    /// Unique email address.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
    /// Events created by this user, in creation order.
    pub created_events: Vec<EventId>,
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("created_events", &self.created_events)
            .finish()
    }
}

/// A user ready to be written; the store assigns the identifier.
#[derive(Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique email address.
    pub email: String,
    /// bcrypt hash of the password.
    pub password_hash: String,
}

impl fmt::Debug for NewUser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Raw user input as received from the client.
#[derive(Clone, PartialEq, Eq)]
pub struct UserInput {
    /// Email address.
    pub email: String,
    /// Plaintext password; hashed before storage.
    pub password: String,
}

impl fmt::Debug for UserInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserInput")
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}
