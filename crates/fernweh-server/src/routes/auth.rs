//! `/api/auth` handlers.

use axum::Json;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::header::SET_COOKIE;
use axum::http::{HeaderMap, HeaderValue};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::json;
use uuid::Uuid;

use fernweh_api::{ApiError, ApiResponse, Result};
use fernweh_auth::extract::{AuthUser, cookie_value};
use fernweh_auth::session::{IssuedTokens, SessionTokens, SignInRequest, SignUpRequest};
use fernweh_auth::{ACCESS_COOKIE, REFRESH_COOKIE};
use fernweh_core::User;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/email-password/signup", post(sign_up))
        .route("/email-password/signin", post(sign_in))
        .route("/signout", post(sign_out))
        .route("/check/{id}", get(check))
}

async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<SignUpRequest>,
) -> Result<Response> {
    let (user, tokens) = state.sessions.sign_up(request).await?;
    session_response(
        &state,
        user,
        tokens,
        axum::http::StatusCode::CREATED,
        "Signed up successfully",
    )
}

async fn sign_in(
    State(state): State<AppState>,
    Json(request): Json<SignInRequest>,
) -> Result<Response> {
    let (user, tokens) = state.sessions.sign_in(request).await?;
    session_response(
        &state,
        user,
        tokens,
        axum::http::StatusCode::OK,
        "Signed in successfully",
    )
}

async fn sign_out(AuthUser(claims): AuthUser, State(state): State<AppState>) -> Result<Response> {
    state.sessions.sign_out(claims.sub).await?;

    let mut response =
        ApiResponse::ok(serde_json::Value::Null, "Signed out successfully").into_response();
    append_cookie(&mut response, &state.cookies.clear_cookie(ACCESS_COOKIE))?;
    append_cookie(&mut response, &state.cookies.clear_cookie(REFRESH_COOKIE))?;
    Ok(response)
}

/// The session resolution cascade. Public: the tokens themselves are the
/// credential.
async fn check(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let subject = parse_user_id(&id)?;
    let access = cookie_value(&headers, ACCESS_COOKIE);
    let refresh = cookie_value(&headers, REFRESH_COOKIE);

    let outcome = state
        .sessions
        .resolve(access.as_deref(), refresh.as_deref(), subject)
        .await?;

    let mut response = ApiResponse::ok(outcome.claims, "Token is valid").into_response();
    match outcome.issued {
        IssuedTokens::None => {}
        IssuedTokens::Access(access) => {
            append_cookie(&mut response, &state.cookies.access_cookie(&access))?;
        }
        IssuedTokens::Pair(tokens) => {
            append_cookie(&mut response, &state.cookies.access_cookie(&tokens.access))?;
            append_cookie(&mut response, &state.cookies.refresh_cookie(&tokens.refresh))?;
        }
    }
    Ok(response)
}

fn session_response(
    state: &AppState,
    user: User,
    tokens: SessionTokens,
    status: axum::http::StatusCode,
    message: &str,
) -> Result<Response> {
    let body = json!({
        "user": user,
        "access_token": tokens.access,
        "refresh_token": tokens.refresh,
    });
    let mut response = ApiResponse::new(status, body, message).into_response();
    append_cookie(&mut response, &state.cookies.access_cookie(&tokens.access))?;
    append_cookie(&mut response, &state.cookies.refresh_cookie(&tokens.refresh))?;
    Ok(response)
}

fn append_cookie(response: &mut Response, cookie: &str) -> Result<()> {
    let value =
        HeaderValue::from_str(cookie).map_err(|e| ApiError::internal(e.to_string()))?;
    response.headers_mut().append(SET_COOKIE, value);
    Ok(())
}

pub(crate) fn parse_user_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| ApiError::bad_request("Invalid user id"))
}
