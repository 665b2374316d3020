//! User entity as seen by the link service.

use chrono::{DateTime, Utc};

use super::short_link::Owner;

/// A user who can own short links.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// The reference stored on links this user owns.
    pub fn as_owner(&self) -> Owner {
        Owner {
            id: self.id,
            name: self.name.clone(),
        }
    }
}

/// Input data for registering a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
}
