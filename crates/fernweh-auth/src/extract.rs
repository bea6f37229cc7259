//! Request extractors for gated routes.
//!
//! [`AuthUser`] demands a verifiable access cookie. [`AdminUser`] layers
//! the role check on top. Both reject before the handler body runs, so
//! handlers can assume a resolved identity.

use axum::extract::FromRef;
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header::COOKIE, request::Parts};

use fernweh_api::ApiError;

use crate::cookie::ACCESS_COOKIE;
use crate::token::{Claims, TokenService};

/// Shared state the extractors pull out of the application state.
#[derive(Clone)]
pub struct AuthState {
    pub tokens: std::sync::Arc<TokenService>,
}

/// Reads a cookie value from the `Cookie` header.
#[must_use]
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let header = headers.get(COOKIE)?.to_str().ok()?;
    for cookie in header.split(';') {
        if let Some((key, value)) = cookie.trim().split_once('=')
            && key.trim() == name
        {
            return Some(value.trim().to_string());
        }
    }
    None
}

/// An authenticated caller, resolved from the access cookie.
///
/// Missing cookie rejects 401; a cookie that fails verification rejects
/// 403. The split lets clients distinguish "sign in" from "token went
/// bad mid-session".
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl<S> FromRequestParts<S> for AuthUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_state = AuthState::from_ref(state);
        let Some(token) = cookie_value(&parts.headers, ACCESS_COOKIE) else {
            return Err(ApiError::unauthorized("Please sign in again"));
        };
        match auth_state.tokens.verify(&token) {
            Ok(claims) => Ok(AuthUser(claims)),
            Err(err) => {
                tracing::debug!(error = %err, "access token rejected");
                Err(ApiError::forbidden("Invalid token"))
            }
        }
    }
}

/// An authenticated caller that also holds the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Claims);

impl<S> FromRequestParts<S> for AdminUser
where
    AuthState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let AuthUser(claims) = AuthUser::from_request_parts(parts, state).await?;
        if !claims.role.is_admin() {
            return Err(ApiError::unauthorized("Unauthorized user"));
        }
        Ok(AdminUser(claims))
    }
}
