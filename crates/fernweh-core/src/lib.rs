//! Domain model for the Fernweh blogging backend.
//!
//! This crate is deliberately free of any web or storage concerns. It
//! defines the entities the rest of the workspace moves around ([`User`],
//! [`Post`]) together with the input shapes and validation rules for
//! creating and updating them.

pub mod model;
pub mod validate;

pub use model::{Category, Post, Role, User};
pub use validate::{NewPost, PostDraft, PostPatch, ValidationError};
