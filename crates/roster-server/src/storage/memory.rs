//! In-memory user store
//!
//! Nothing is persisted. All records live in one map behind a single
//! reader/writer lock: lookups share the read side, mutations take the
//! write side for exactly the duration of the map operation.

use async_trait::async_trait;
use roster_core::{NewUser, Result, RosterError, User, UserStore};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Concurrent-safe, non-persistent [`UserStore`]
pub struct MemoryUserStore {
    inner: RwLock<Inner>,
}

#[derive(Default)]
struct Inner {
    users: HashMap<String, Entry>,
    next_seq: u64,
}

struct Entry {
    /// Insertion order, used to list newest first.
    seq: u64,
    user: User,
}

impl Inner {
    fn email_taken(&self, email: &str, except_id: Option<&str>) -> bool {
        self.users
            .values()
            .any(|e| e.user.email == email && Some(e.user.id.as_str()) != except_id)
    }
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
        }
    }
}

impl Default for MemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, user: NewUser) -> Result<String> {
        let mut inner = self.inner.write().await;

        if inner.email_taken(&user.email, None) {
            return Err(RosterError::Conflict(format!(
                "email already exists: {}",
                user.email
            )));
        }

        let user = User::new(user);
        let id = user.id.clone();
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.users.insert(id.clone(), Entry { seq, user });

        Ok(id)
    }

    async fn get_by_id(&self, id: &str) -> Result<User> {
        let inner = self.inner.read().await;
        inner
            .users
            .get(id)
            .map(|e| e.user.clone())
            .ok_or_else(|| RosterError::NotFound(id.to_string()))
    }

    async fn get_by_email(&self, email: &str) -> Result<User> {
        let inner = self.inner.read().await;
        inner
            .users
            .values()
            .find(|e| e.user.email == email)
            .map(|e| e.user.clone())
            .ok_or_else(|| RosterError::NotFound(email.to_string()))
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>> {
        let inner = self.inner.read().await;

        let mut entries: Vec<&Entry> = inner.users.values().collect();
        entries.sort_unstable_by(|a, b| b.seq.cmp(&a.seq));

        let skip = usize::try_from(offset.max(0)).unwrap_or(usize::MAX);
        let take = if limit > 0 {
            usize::try_from(limit).unwrap_or(usize::MAX)
        } else {
            usize::MAX
        };

        Ok(entries
            .into_iter()
            .skip(skip)
            .take(take)
            .map(|e| e.user.clone())
            .collect())
    }

    async fn update(&self, id: &str, user: User) -> Result<()> {
        let mut inner = self.inner.write().await;

        if !inner.users.contains_key(id) {
            return Err(RosterError::NotFound(id.to_string()));
        }
        if inner.email_taken(&user.email, Some(id)) {
            return Err(RosterError::Conflict(format!(
                "email already exists: {}",
                user.email
            )));
        }

        if let Some(entry) = inner.users.get_mut(id) {
            entry.user.first_name = user.first_name;
            entry.user.last_name = user.last_name;
            entry.user.email = user.email;
            entry.user.password = user.password;
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .users
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| RosterError::NotFound(id.to_string()))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
