//! `/api/user` handlers, all admin-only.

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::routing::get;
use serde::Deserialize;

use fernweh_api::{ApiError, ApiResponse, Result};
use fernweh_auth::extract::AdminUser;
use fernweh_core::{Role, User};

use crate::routes::auth::parse_user_id;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/{id}", axum::routing::patch(change_role).delete(delete))
}

async fn list(AdminUser(_): AdminUser, State(state): State<AppState>) -> Result<ApiResponse<Vec<User>>> {
    let users = state.users.list().await?;
    Ok(ApiResponse::ok(users, "Users fetched"))
}

#[derive(Debug, Deserialize)]
struct RolePatch {
    role: Option<Role>,
}

async fn change_role(
    AdminUser(_): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<RolePatch>,
) -> Result<ApiResponse<User>> {
    let Some(role) = patch.role else {
        return Err(ApiError::bad_request("Role is required"));
    };
    let id = parse_user_id(&id)?;
    let Some(mut user) = state.users.find_by_id(id).await? else {
        return Err(ApiError::not_found("User does not exist"));
    };

    user.role = role;
    user.touch();
    state.users.update(&user).await?;

    tracing::info!(user_id = %user.id, role = %role, "role changed");
    Ok(ApiResponse::ok(user, "Role updated"))
}

/// Deleting an account cascade-deletes its posts so no post is left
/// pointing at a missing author, then drops the cached list views.
async fn delete(
    AdminUser(_): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>> {
    let id = parse_user_id(&id)?;
    if state.users.find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("User does not exist"));
    }

    let write = async {
        let removed = state.posts.delete_by_author(id).await?;
        state.users.delete(id).await?;
        Ok::<usize, ApiError>(removed.len())
    };
    let (written, ()) = tokio::join!(write, state.cache.invalidate_all());
    let removed = written?;

    tracing::info!(user_id = %id, posts_removed = removed, "user deleted");
    Ok(ApiResponse::ok(serde_json::Value::Null, "User deleted"))
}
