//! User persistence trait.

use async_trait::async_trait;
use uuid::Uuid;

use fernweh_core::User;

use crate::StorageResult;

/// Storage operations for user accounts.
///
/// Uniqueness of `username` and `email` is enforced here; handlers still
/// pre-check both so they can pick the right client-facing message.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Returns `None` if no user has this id.
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<User>>;

    /// Returns `None` if no user has this username.
    async fn find_by_username(&self, username: &str) -> StorageResult<Option<User>>;

    /// Returns `None` if no user has this email.
    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>>;

    /// Inserts a new user.
    ///
    /// # Errors
    ///
    /// [`StorageError::Duplicate`](crate::StorageError::Duplicate) if the
    /// username or email is already taken.
    async fn create(&self, user: &User) -> StorageResult<()>;

    /// Overwrites the stored record for `user.id`.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`](crate::StorageError::NotFound) if the
    /// user does not exist.
    async fn update(&self, user: &User) -> StorageResult<()>;

    /// Removes the user.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`](crate::StorageError::NotFound) if the
    /// user does not exist.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// All users, newest account first.
    async fn list(&self) -> StorageResult<Vec<User>>;
}
