//! Persistence layer for the Fernweh backend.
//!
//! Handlers talk to the [`UserStorage`] and [`PostStorage`] traits only;
//! the backing store is picked at startup. [`MemoryStorage`] is the
//! single-process backend used in tests and small deployments.

pub mod error;
pub mod memory;
pub mod post;
pub mod user;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryStorage;
pub use post::PostStorage;
pub use user::UserStorage;
