//! In-process user store.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde_json::json;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

/// User repository backed by `DashMap`.
///
/// Emails are unique, mirroring the PostgreSQL schema.
#[derive(Debug)]
pub struct MemoryUserRepository {
    users: DashMap<i64, User>,
    emails: DashMap<String, i64>,
    next_id: AtomicI64,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            emails: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, AppError> {
        Ok(self.users.get(&id).map(|user| user.value().clone()))
    }

    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let Entry::Vacant(slot) = self.emails.entry(new_user.email.clone()) else {
            return Err(AppError::conflict(
                "Email already registered",
                json!({ "email": new_user.email }),
            ));
        };

        let user = User {
            id: self.next_id.fetch_add(1, Ordering::Relaxed),
            name: new_user.name,
            email: new_user.email,
            created_at: Utc::now(),
        };

        slot.insert(user.id);
        self.users.insert(user.id, user.clone());

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.value().clone()).collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: format!("{name}@example.com"),
        }
    }

    #[tokio::test]
    async fn test_create_and_find() {
        let repo = MemoryUserRepository::new();

        let alice = repo.create(new_user("alice")).await.unwrap();

        assert_eq!(repo.find_by_id(alice.id).await.unwrap(), Some(alice));
        assert_eq!(repo.find_by_id(999).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = MemoryUserRepository::new();
        repo.create(new_user("alice")).await.unwrap();

        let err = repo.create(new_user("alice")).await.unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(repo.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_ordered_by_id() {
        let repo = MemoryUserRepository::new();
        for name in ["carol", "alice", "bob"] {
            repo.create(new_user(name)).await.unwrap();
        }

        let names: Vec<_> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();

        assert_eq!(names, ["carol", "alice", "bob"]);
    }
}
