//! In-memory backend over [`DashMap`].
//!
//! Used by the test suite and by single-process deployments that do not
//! need durability. All listings sort on demand, which is fine at the
//! scale this backend is meant for.

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use fernweh_core::{Category, Post, User};

use crate::{PostStorage, StorageError, StorageResult, UserStorage};

#[derive(Debug, Default)]
pub struct MemoryStorage {
    users: DashMap<Uuid, User>,
    posts: DashMap<Uuid, Post>,
    /// Serializes user creations so the uniqueness scans and the insert
    /// form one step. Never held across an await point.
    user_writes: Mutex<()>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl UserStorage for MemoryStorage {
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn find_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.username == username)
            .map(|u| u.clone()))
    }

    async fn find_by_email(&self, email: &str) -> StorageResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.email == email)
            .map(|u| u.clone()))
    }

    async fn create(&self, user: &User) -> StorageResult<()> {
        let _guard = self
            .user_writes
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if self.users.iter().any(|u| u.username == user.username) {
            return Err(StorageError::Duplicate { field: "username" });
        }
        if self.users.iter().any(|u| u.email == user.email) {
            return Err(StorageError::Duplicate { field: "email" });
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> StorageResult<()> {
        if !self.users.contains_key(&user.id) {
            return Err(StorageError::NotFound);
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn list(&self) -> StorageResult<Vec<User>> {
        let mut users: Vec<User> = self.users.iter().map(|u| u.clone()).collect();
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(users)
    }
}

#[async_trait]
impl PostStorage for MemoryStorage {
    async fn find_by_id(&self, id: Uuid) -> StorageResult<Option<Post>> {
        Ok(self.posts.get(&id).map(|p| p.clone()))
    }

    async fn list_all(&self) -> StorageResult<Vec<Post>> {
        let mut posts: Vec<Post> = self.posts.iter().map(|p| p.clone()).collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn list_featured(&self) -> StorageResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| p.is_featured)
            .map(|p| p.clone())
            .collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn list_latest(&self, limit: usize) -> StorageResult<Vec<Post>> {
        let mut posts = self.list_all().await?;
        posts.truncate(limit);
        Ok(posts)
    }

    async fn list_by_category(&self, category: Category) -> StorageResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| p.has_category(category))
            .map(|p| p.clone())
            .collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn list_by_any_category(&self, categories: &[Category]) -> StorageResult<Vec<Post>> {
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| categories.iter().any(|c| p.has_category(*c)))
            .map(|p| p.clone())
            .collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn create(&self, post: &Post) -> StorageResult<()> {
        self.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn update(&self, post: &Post) -> StorageResult<()> {
        if !self.posts.contains_key(&post.id) {
            return Err(StorageError::NotFound);
        }
        self.posts.insert(post.id, post.clone());
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> StorageResult<()> {
        self.posts
            .remove(&id)
            .map(|_| ())
            .ok_or(StorageError::NotFound)
    }

    async fn delete_by_author(&self, author_id: Uuid) -> StorageResult<Vec<Uuid>> {
        let ids: Vec<Uuid> = self
            .posts
            .iter()
            .filter(|p| p.author_id == author_id)
            .map(|p| p.id)
            .collect();
        for id in &ids {
            self.posts.remove(id);
        }
        Ok(ids)
    }
}
