//! `/api/posts` handlers.
//!
//! The three list endpoints are cache-fronted: a hit short-circuits
//! before the store is touched. Every mutation runs its store write and
//! the three-key invalidation concurrently and waits for both, so a
//! response never races its own invalidation.

use axum::Json;
use axum::Router;
use axum::extract::{Path, Query, State};
use axum::routing::{get, patch, post};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use fernweh_api::{ApiError, ApiResponse, Result};
use fernweh_auth::extract::{AdminUser, AuthUser};
use fernweh_auth::token::Claims;
use fernweh_core::{Category, Post, PostDraft, PostPatch};

use crate::cache::{ALL_POSTS_KEY, FEATURED_POSTS_KEY, LATEST_POSTS_KEY};
use crate::state::AppState;

/// How many posts the `latest` view returns.
const LATEST_LIMIT: usize = 5;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_all).post(create))
        .route("/featured", get(list_featured))
        .route("/latest", get(list_latest))
        .route("/categories/{category}", get(list_by_category))
        .route("/related-posts-by-category", get(related_by_category))
        .route("/{id}", get(get_by_id).patch(update_own).delete(delete_own))
        .route("/admin/{id}", patch(update_any).delete(delete_any))
}

async fn list_all(State(state): State<AppState>) -> Result<ApiResponse<Vec<Post>>> {
    if let Some(posts) = state.cache.get(ALL_POSTS_KEY).await {
        return Ok(ApiResponse::ok(posts, "Posts fetched"));
    }
    let posts = state.posts.list_all().await?;
    state.cache.populate(ALL_POSTS_KEY, posts.clone());
    Ok(ApiResponse::ok(posts, "Posts fetched"))
}

async fn list_featured(State(state): State<AppState>) -> Result<ApiResponse<Vec<Post>>> {
    if let Some(posts) = state.cache.get(FEATURED_POSTS_KEY).await {
        return Ok(ApiResponse::ok(posts, "Featured posts fetched"));
    }
    let posts = state.posts.list_featured().await?;
    state.cache.populate(FEATURED_POSTS_KEY, posts.clone());
    Ok(ApiResponse::ok(posts, "Featured posts fetched"))
}

async fn list_latest(State(state): State<AppState>) -> Result<ApiResponse<Vec<Post>>> {
    if let Some(posts) = state.cache.get(LATEST_POSTS_KEY).await {
        return Ok(ApiResponse::ok(posts, "Latest posts fetched"));
    }
    let posts = state.posts.list_latest(LATEST_LIMIT).await?;
    state.cache.populate(LATEST_POSTS_KEY, posts.clone());
    Ok(ApiResponse::ok(posts, "Latest posts fetched"))
}

async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Result<ApiResponse<Vec<Post>>> {
    let category: Category = category.parse()?;
    let posts = state.posts.list_by_category(category).await?;
    Ok(ApiResponse::ok(posts, "Posts fetched"))
}

#[derive(Debug, Deserialize)]
struct RelatedQuery {
    categories: Option<String>,
}

async fn related_by_category(
    State(state): State<AppState>,
    Query(query): Query<RelatedQuery>,
) -> Result<ApiResponse<Vec<Post>>> {
    let Some(raw) = query.categories.filter(|c| !c.is_empty()) else {
        return Err(ApiError::not_found("No categories specified"));
    };
    let categories = raw
        .split(',')
        .map(|c| c.trim().parse())
        .collect::<std::result::Result<Vec<Category>, _>>()?;
    let posts = state.posts.list_by_any_category(&categories).await?;
    Ok(ApiResponse::ok(posts, "Related posts fetched"))
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Post>> {
    let post = load_post(&state, &id).await?;
    Ok(ApiResponse::ok(post, "Post fetched"))
}

async fn create(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Json(draft): Json<PostDraft>,
) -> Result<ApiResponse<Post>> {
    let new = draft.validate()?;
    let Some(mut author) = state.users.find_by_id(claims.sub).await? else {
        return Err(ApiError::not_found("User does not exist"));
    };

    let post = Post {
        id: Uuid::new_v4(),
        title: new.title,
        author_name: new.author_name,
        image_link: new.image_link,
        categories: new.categories,
        description: new.description,
        is_featured: new.is_featured,
        author_id: author.id,
        created_at: OffsetDateTime::now_utc(),
    };

    let write = async {
        state.posts.create(&post).await?;
        author.posts.push(post.id);
        author.touch();
        state.users.update(&author).await?;
        Ok::<(), ApiError>(())
    };
    let (written, ()) = tokio::join!(write, state.cache.invalidate_all());
    written?;

    tracing::info!(post_id = %post.id, author_id = %post.author_id, "post created");
    Ok(ApiResponse::created(post, "Post created"))
}

async fn update_own(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<PostPatch>,
) -> Result<ApiResponse<Post>> {
    let post = load_owned_post(&state, &id, &claims).await?;
    apply_update(&state, post, patch).await
}

async fn delete_own(
    AuthUser(claims): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>> {
    let post = load_owned_post(&state, &id, &claims).await?;
    apply_delete(&state, post).await
}

async fn update_any(
    AdminUser(_): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<PostPatch>,
) -> Result<ApiResponse<Post>> {
    let post = load_post(&state, &id).await?;
    apply_update(&state, post, patch).await
}

async fn delete_any(
    AdminUser(_): AdminUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<serde_json::Value>> {
    let post = load_post(&state, &id).await?;
    apply_delete(&state, post).await
}

async fn apply_update(
    state: &AppState,
    mut post: Post,
    patch: PostPatch,
) -> Result<ApiResponse<Post>> {
    patch.apply(&mut post)?;

    let write = state.posts.update(&post);
    let (written, ()) = tokio::join!(write, state.cache.invalidate_all());
    written?;

    tracing::info!(post_id = %post.id, "post updated");
    Ok(ApiResponse::ok(post, "Post updated"))
}

async fn apply_delete(state: &AppState, post: Post) -> Result<ApiResponse<serde_json::Value>> {
    let write = async {
        state.posts.delete(post.id).await?;
        // Drop the back-reference; the author may already be gone.
        if let Some(mut author) = state.users.find_by_id(post.author_id).await? {
            author.posts.retain(|id| *id != post.id);
            author.touch();
            state.users.update(&author).await?;
        }
        Ok::<(), ApiError>(())
    };
    let (written, ()) = tokio::join!(write, state.cache.invalidate_all());
    written?;

    tracing::info!(post_id = %post.id, "post deleted");
    Ok(ApiResponse::ok(serde_json::Value::Null, "Post deleted"))
}

/// Ownership gate: reads the store, never the cache, so a just-changed
/// owner is always seen.
async fn load_owned_post(state: &AppState, id: &str, claims: &Claims) -> Result<Post> {
    let post = load_post(state, id).await?;
    if post.author_id != claims.sub {
        return Err(ApiError::forbidden("You are not allowed to modify this post"));
    }
    Ok(post)
}

async fn load_post(state: &AppState, id: &str) -> Result<Post> {
    let id = Uuid::parse_str(id).map_err(|_| ApiError::bad_request("Invalid post id"))?;
    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Post not found"))
}
