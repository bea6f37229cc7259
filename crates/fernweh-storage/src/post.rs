//! Post persistence trait.

use async_trait::async_trait;
use uuid::Uuid;

use fernweh_core::{Category, Post};

use crate::StorageResult;

/// Storage operations for posts.
///
/// Every listing returns posts newest first.
#[async_trait]
pub trait PostStorage: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Post>>;

    /// Every post.
    async fn list_all(&self) -> StorageResult<Vec<Post>>;

    /// Posts flagged as featured.
    async fn list_featured(&self) -> StorageResult<Vec<Post>>;

    /// The `limit` most recently created posts.
    async fn list_latest(&self, limit: usize) -> StorageResult<Vec<Post>>;

    /// Posts filed under `category`.
    async fn list_by_category(&self, category: Category) -> StorageResult<Vec<Post>>;

    /// Posts filed under any of `categories`.
    async fn list_by_any_category(&self, categories: &[Category]) -> StorageResult<Vec<Post>>;

    async fn create(&self, post: &Post) -> StorageResult<()>;

    /// Overwrites the stored record for `post.id`.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`](crate::StorageError::NotFound) if the
    /// post does not exist.
    async fn update(&self, post: &Post) -> StorageResult<()>;

    /// Removes the post.
    ///
    /// # Errors
    ///
    /// [`StorageError::NotFound`](crate::StorageError::NotFound) if the
    /// post does not exist.
    async fn delete(&self, id: Uuid) -> StorageResult<()>;

    /// Removes every post by `author_id`, returning the deleted ids.
    async fn delete_by_author(&self, author_id: Uuid) -> StorageResult<Vec<Uuid>>;
}
