//! In-memory [`UserStore`] implementation backed by [`DashMap`].
//!
//! Concurrent, lock-free for readers. Stands in for the external user
//! database in tests and the demo binary.

use async_trait::async_trait;
use dashmap::DashMap;
use vantage_core::User;

use crate::traits::{StoreError, UserStore};

/// In-memory user store keyed by email address.
pub struct MemoryUserStore {
    users: DashMap<String, User>,
}

impl MemoryUserStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
        }
    }

    /// Inserts or replaces a user, keyed by its email.
    pub fn insert(&self, user: User) {
        self.users.insert(user.email.clone(), user);
    }

    /// Number of stored users.
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(email).map(|entry| entry.value().clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str) -> User {
        User {
            id: format!("u-{email}"),
            email: email.to_string(),
            name: "Test".to_string(),
        }
    }

    #[tokio::test]
    async fn find_by_email_exact_match() {
        let store = MemoryUserStore::new();
        store.insert(user("a@example.com"));

        let found = store.find_by_email("a@example.com").await.unwrap();
        assert_eq!(found.unwrap().email, "a@example.com");
    }

    #[tokio::test]
    async fn find_by_email_misses_are_ok_none() {
        let store = MemoryUserStore::new();
        store.insert(user("a@example.com"));

        // Exact equality: no case folding, no partials.
        assert!(store.find_by_email("A@example.com").await.unwrap().is_none());
        assert!(store.find_by_email("a@example.co").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn insert_replaces_existing_entry() {
        let store = MemoryUserStore::new();
        store.insert(user("a@example.com"));
        let mut updated = user("a@example.com");
        updated.name = "Renamed".to_string();
        store.insert(updated);

        assert_eq!(store.len(), 1);
        let found = store.find_by_email("a@example.com").await.unwrap().unwrap();
        assert_eq!(found.name, "Renamed");
    }
}
