//! Storage traits for persistence

use crate::Result;
use async_trait::async_trait;
use roster_types::{NewUser, User};

/// User store
///
/// Every backend must behave identically through this trait: the same
/// error kinds, the same newest-first ordering for [`UserStore::list`], and
/// email uniqueness on both create and update. Returned users are owned
/// copies, so callers can never mutate a backend's state through them.
///
/// Dropping a returned future cancels the operation.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user and return its store-assigned identifier.
    ///
    /// Fails with `Conflict` when the email is already in use.
    async fn create(&self, user: NewUser) -> Result<String>;

    /// Fails with `NotFound` when no user has this identifier.
    async fn get_by_id(&self, id: &str) -> Result<User>;

    /// Exact, case-sensitive match. Fails with `NotFound` when absent.
    async fn get_by_email(&self, email: &str) -> Result<User>;

    /// Newest-created first. `limit <= 0` means no limit and `offset <= 0`
    /// means no skip.
    async fn list(&self, limit: i64, offset: i64) -> Result<Vec<User>>;

    /// Replace the mutable fields of user `id`. The stored identifier and
    /// creation time are kept whatever `user` carries.
    ///
    /// Fails with `NotFound` when `id` is absent and with `Conflict` when
    /// the new email belongs to another user.
    async fn update(&self, id: &str, user: User) -> Result<()>;

    /// Fails with `NotFound` when `id` is absent.
    async fn delete(&self, id: &str) -> Result<()>;

    /// Release held resources. Safe to call more than once.
    async fn close(&self) -> Result<()>;
}
