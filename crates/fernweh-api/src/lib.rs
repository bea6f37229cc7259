//! HTTP-facing building blocks shared by every route in the workspace:
//! the [`ApiError`] taxonomy with its wire representation, and the
//! [`ApiResponse`] success envelope.

pub mod error;
pub mod response;

pub use error::{ApiError, Result};
pub use response::ApiResponse;
