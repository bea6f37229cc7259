//! Cache-aside layer for the post list queries.

pub mod backend;
pub mod posts;

pub use backend::CacheBackend;
pub use posts::{ALL_POSTS_KEY, FEATURED_POSTS_KEY, LATEST_POSTS_KEY, PostCache};
