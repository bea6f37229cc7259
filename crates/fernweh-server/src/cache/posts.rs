//! Typed cache over the three post list queries.
//!
//! Keys are fixed and well known. Population after a miss runs in a
//! spawned task so the response never waits on it; a supervisor task
//! observes the join result and logs failures instead of dropping them.
//! Every post mutation invalidates all three keys unconditionally.

use fernweh_core::Post;

use super::CacheBackend;

pub const ALL_POSTS_KEY: &str = "posts:all";
pub const FEATURED_POSTS_KEY: &str = "posts:featured";
pub const LATEST_POSTS_KEY: &str = "posts:latest";

const ALL_KEYS: [&str; 3] = [ALL_POSTS_KEY, FEATURED_POSTS_KEY, LATEST_POSTS_KEY];

#[derive(Clone)]
pub struct PostCache {
    backend: CacheBackend,
}

impl PostCache {
    #[must_use]
    pub fn new(backend: CacheBackend) -> Self {
        Self { backend }
    }

    /// Returns the cached list for `key`, or `None` on a miss.
    ///
    /// An entry that fails to decode counts as a miss and is dropped, so
    /// a format change after an upgrade heals itself.
    pub async fn get(&self, key: &str) -> Option<Vec<Post>> {
        let bytes = self.backend.get(key).await?;
        match serde_json::from_slice(&bytes) {
            Ok(posts) => {
                tracing::debug!(key = %key, "post cache hit");
                Some(posts)
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "discarding undecodable cache entry");
                self.backend.invalidate(key).await;
                None
            }
        }
    }

    /// Fills `key` with `posts` without blocking the caller.
    pub fn populate(&self, key: &'static str, posts: Vec<Post>) {
        let backend = self.backend.clone();
        let task = tokio::spawn(async move {
            let bytes = serde_json::to_vec(&posts)?;
            backend.set(key, bytes).await;
            Ok::<(), serde_json::Error>(())
        });
        tokio::spawn(async move {
            match task.await {
                Ok(Ok(())) => tracing::debug!(key = %key, "post cache populated"),
                Ok(Err(e)) => tracing::warn!(key = %key, error = %e, "post cache population failed"),
                Err(e) => tracing::warn!(key = %key, error = %e, "post cache population task aborted"),
            }
        });
    }

    /// Drops all three list keys.
    pub async fn invalidate_all(&self) {
        for key in ALL_KEYS {
            self.backend.invalidate(key).await;
        }
        tracing::debug!("post cache invalidated");
    }
}
