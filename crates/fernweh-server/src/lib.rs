//! HTTP server for the Fernweh blogging backend.
//!
//! [`config`] loads the environment-sourced [`AppConfig`], [`state`]
//! wires storage, sessions and the post cache into one [`AppState`],
//! and [`routes`] assembles the `/api` router. `main.rs` is a thin
//! bootstrap over these pieces.

pub mod cache;
pub mod config;
pub mod observability;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use state::AppState;
