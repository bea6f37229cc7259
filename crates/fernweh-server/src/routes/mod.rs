//! Route table and cross-cutting HTTP layers.

pub mod auth;
pub mod posts;
pub mod users;

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use fernweh_api::ApiError;

use crate::state::AppState;

/// Builds the full application router.
///
/// `frontend_origin` is the single origin allowed to send credentialed
/// cross-origin requests.
pub fn router(state: AppState, frontend_origin: HeaderValue) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(frontend_origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(root))
        .nest("/api/auth", auth::router())
        .nest("/api/posts", posts::router())
        .nest("/api/user", users::router())
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

async fn root() -> &'static str {
    "fernweh backend is running"
}

async fn not_found() -> ApiError {
    ApiError::not_found("Route not found")
}
