//! Sign-up, sign-in, sign-out and the session resolution cascade.
//!
//! Resolution tries three branches in order, first success wins:
//!
//! 1. a valid access cookie resolves from its own claims, no store read;
//! 2. a valid refresh cookie loads the user and mints a fresh access
//!    token from the persisted fields, so role or email changes take
//!    effect here rather than at the distant refresh-token expiry;
//! 3. with neither cookie usable, the persisted refresh token is
//!    verified server-side and, when still valid, both tokens are
//!    rotated.
//!
//! Rotation is last-write-wins: concurrent refreshes for one user race
//! on the single persisted slot and either outcome is a valid session.

use std::sync::Arc;

use serde::Deserialize;
use uuid::Uuid;

use fernweh_api::{ApiError, Result};
use fernweh_core::User;
use fernweh_storage::UserStorage;

use crate::password::{hash_password, verify_password};
use crate::token::{Claims, TokenService};

/// Freshly signed token pair.
#[derive(Debug, Clone)]
pub struct SessionTokens {
    pub access: String,
    pub refresh: String,
}

/// Result of the resolution cascade: the caller's claims plus whatever
/// cookies need re-setting.
#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub claims: Claims,
    pub issued: IssuedTokens,
}

#[derive(Debug, Clone)]
pub enum IssuedTokens {
    /// The presented access token was still good.
    None,
    /// A new access token; the refresh cookie stays as presented.
    Access(String),
    /// Full rotation; both cookies must be replaced.
    Pair(SessionTokens),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignUpRequest {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignInRequest {
    /// Either the username or the email address.
    pub username_or_email: Option<String>,
    pub password: Option<String>,
}

/// Account lifecycle and session resolution over a [`UserStorage`].
#[derive(Clone)]
pub struct SessionService {
    tokens: Arc<TokenService>,
    users: Arc<dyn UserStorage>,
}

impl SessionService {
    #[must_use]
    pub fn new(tokens: Arc<TokenService>, users: Arc<dyn UserStorage>) -> Self {
        Self { tokens, users }
    }

    /// Registers a new account and opens its first session.
    ///
    /// Username and email are lowercased before the uniqueness checks so
    /// casing variants cannot create near-duplicate accounts. When both
    /// fields collide, the username message wins.
    pub async fn sign_up(&self, request: SignUpRequest) -> Result<(User, SessionTokens)> {
        let (Some(username), Some(full_name), Some(email), Some(password)) = (
            request.username,
            request.full_name,
            request.email,
            request.password,
        ) else {
            return Err(ApiError::bad_request("All fields are required"));
        };
        if username.trim().is_empty()
            || full_name.trim().is_empty()
            || email.trim().is_empty()
            || password.is_empty()
        {
            return Err(ApiError::bad_request("All fields are required"));
        }
        let username = username.trim().to_lowercase();
        let email = email.trim().to_lowercase();

        if self.users.find_by_username(&username).await?.is_some() {
            return Err(ApiError::conflict("Username already exists"));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::conflict("Email already exists"));
        }

        let password_hash =
            hash_password(&password).map_err(|e| ApiError::internal(e.to_string()))?;
        let mut user = User::new(username, full_name, email, password_hash);

        let tokens = self.issue_pair(&user)?;
        user.refresh_token = Some(tokens.refresh.clone());
        self.users.create(&user).await?;

        tracing::info!(user_id = %user.id, username = %user.username, "account created");
        Ok((user, tokens))
    }

    /// Authenticates by username or email and opens a session.
    pub async fn sign_in(&self, request: SignInRequest) -> Result<(User, SessionTokens)> {
        let (Some(identifier), Some(password)) = (request.username_or_email, request.password)
        else {
            return Err(ApiError::bad_request("All fields are required"));
        };
        let identifier = identifier.trim().to_lowercase();

        let user = match self.users.find_by_username(&identifier).await? {
            Some(user) => Some(user),
            None => self.users.find_by_email(&identifier).await?,
        };
        let Some(mut user) = user else {
            return Err(ApiError::not_found("User does not exist"));
        };

        let matches = verify_password(&password, &user.password_hash)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        if !matches {
            return Err(ApiError::unauthorized("Invalid password"));
        }

        let tokens = self.issue_pair(&user)?;
        user.refresh_token = Some(tokens.refresh.clone());
        user.touch();
        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id, "signed in");
        Ok((user, tokens))
    }

    /// Drops the caller's persisted refresh token.
    ///
    /// Idempotent: signing out an already signed-out session is fine.
    pub async fn sign_out(&self, user_id: Uuid) -> Result<()> {
        let Some(mut user) = self.users.find_by_id(user_id).await? else {
            return Err(ApiError::not_found("User does not exist"));
        };
        user.refresh_token = None;
        user.touch();
        self.users.update(&user).await?;

        tracing::info!(user_id = %user.id, "signed out");
        Ok(())
    }

    /// Runs the resolution cascade for one request.
    ///
    /// `access` and `refresh` are the raw cookie values if present;
    /// `subject` is the user id from the route.
    pub async fn resolve(
        &self,
        access: Option<&str>,
        refresh: Option<&str>,
        subject: Uuid,
    ) -> Result<SessionOutcome> {
        if let Some(token) = access
            && let Ok(claims) = self.tokens.verify(token)
        {
            return Ok(SessionOutcome {
                claims,
                issued: IssuedTokens::None,
            });
        }

        if let Some(token) = refresh
            && self.tokens.verify(token).is_ok()
        {
            let user = self.load_subject(subject).await?;
            let access = self
                .tokens
                .issue_access(&user)
                .map_err(|e| ApiError::internal(e.to_string()))?;
            let claims = self
                .tokens
                .verify(&access)
                .map_err(|e| ApiError::internal(e.to_string()))?;
            tracing::debug!(user_id = %user.id, "access token refreshed from cookie");
            return Ok(SessionOutcome {
                claims,
                issued: IssuedTokens::Access(access),
            });
        }

        let mut user = self.load_subject(subject).await?;
        let Some(stored) = user.refresh_token.as_deref() else {
            return Err(ApiError::unauthorized("Please sign in again"));
        };
        if self.tokens.verify(stored).is_err() {
            return Err(ApiError::unauthorized("Please sign in again"));
        }

        let tokens = self.issue_pair(&user)?;
        user.refresh_token = Some(tokens.refresh.clone());
        user.touch();
        self.users.update(&user).await?;
        let claims = self
            .tokens
            .verify(&tokens.access)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        tracing::debug!(user_id = %user.id, "session rotated");
        Ok(SessionOutcome {
            claims,
            issued: IssuedTokens::Pair(tokens),
        })
    }

    async fn load_subject(&self, subject: Uuid) -> Result<User> {
        self.users
            .find_by_id(subject)
            .await?
            .ok_or_else(|| ApiError::not_found("User does not exist"))
    }

    fn issue_pair(&self, user: &User) -> Result<SessionTokens> {
        let access = self
            .tokens
            .issue_access(user)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        let refresh = self
            .tokens
            .issue_refresh(user)
            .map_err(|e| ApiError::internal(e.to_string()))?;
        Ok(SessionTokens { access, refresh })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fernweh_storage::MemoryStorage;
    use time::Duration;

    fn token_service() -> Arc<TokenService> {
        Arc::new(TokenService::new(
            "cascade-test-secret",
            Duration::minutes(15),
            Duration::days(7),
        ))
    }

    fn service() -> (SessionService, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let service = SessionService::new(token_service(), storage.clone());
        (service, storage)
    }

    fn signup() -> SignUpRequest {
        SignUpRequest {
            username: Some("Ada".into()),
            full_name: Some("Ada Lovelace".into()),
            email: Some("Ada@Example.com".into()),
            password: Some("hunter2".into()),
        }
    }

    #[tokio::test]
    async fn sign_up_hashes_and_lowercases() {
        let (service, storage) = service();
        let (user, tokens) = service.sign_up(signup()).await.unwrap();

        assert_eq!(user.username, "ada");
        assert_eq!(user.email, "ada@example.com");
        assert_ne!(user.password_hash, "hunter2");

        let stored = storage.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(tokens.refresh.as_str()));
    }

    #[tokio::test]
    async fn duplicate_username_wins_over_duplicate_email() {
        let (service, _) = service();
        service.sign_up(signup()).await.unwrap();

        let err = service.sign_up(signup()).await.unwrap_err();
        assert_eq!(err, ApiError::conflict("Username already exists"));

        let mut other = signup();
        other.username = Some("grace".into());
        let err = service.sign_up(other).await.unwrap_err();
        assert_eq!(err, ApiError::conflict("Email already exists"));
    }

    #[tokio::test]
    async fn sign_up_requires_every_field() {
        let (service, _) = service();
        let mut request = signup();
        request.password = None;
        assert_eq!(
            service.sign_up(request).await.unwrap_err(),
            ApiError::bad_request("All fields are required")
        );
    }

    #[tokio::test]
    async fn sign_in_by_email_and_username() {
        let (service, _) = service();
        service.sign_up(signup()).await.unwrap();

        for identifier in ["ada", "ADA@example.com"] {
            let request = SignInRequest {
                username_or_email: Some(identifier.into()),
                password: Some("hunter2".into()),
            };
            let (user, _) = service.sign_in(request).await.unwrap();
            assert_eq!(user.username, "ada");
        }
    }

    #[tokio::test]
    async fn sign_in_distinguishes_missing_user_from_bad_password() {
        let (service, _) = service();
        service.sign_up(signup()).await.unwrap();

        let missing = SignInRequest {
            username_or_email: Some("ghost".into()),
            password: Some("hunter2".into()),
        };
        assert_eq!(
            service.sign_in(missing).await.unwrap_err(),
            ApiError::not_found("User does not exist")
        );

        let wrong = SignInRequest {
            username_or_email: Some("ada".into()),
            password: Some("hunter3".into()),
        };
        assert_eq!(
            service.sign_in(wrong).await.unwrap_err(),
            ApiError::unauthorized("Invalid password")
        );
    }

    #[tokio::test]
    async fn valid_access_token_resolves_without_store() {
        // Storage is empty on purpose: branch 1 must not read it.
        let (service, _) = service();
        let user = User::new(
            "ada".into(),
            "Ada Lovelace".into(),
            "ada@example.com".into(),
            "$argon2id$fake".into(),
        );
        let access = token_service().issue_access(&user).unwrap();

        let outcome = service
            .resolve(Some(&access), None, user.id)
            .await
            .unwrap();
        assert_eq!(outcome.claims.sub, user.id);
        assert!(matches!(outcome.issued, IssuedTokens::None));
    }

    #[tokio::test]
    async fn refresh_cookie_mints_access_without_rotation() {
        let (service, storage) = service();
        let (user, tokens) = service.sign_up(signup()).await.unwrap();

        let outcome = service
            .resolve(Some("garbage"), Some(&tokens.refresh), user.id)
            .await
            .unwrap();
        assert!(matches!(outcome.issued, IssuedTokens::Access(_)));

        // The persisted refresh token is untouched in this branch.
        let stored = storage.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(tokens.refresh.as_str()));
    }

    #[tokio::test]
    async fn refresh_cookie_reflects_current_role() {
        let (service, storage) = service();
        let (mut user, tokens) = service.sign_up(signup()).await.unwrap();

        user.role = fernweh_core::Role::Admin;
        storage.update(&user).await.unwrap();

        let outcome = service
            .resolve(None, Some(&tokens.refresh), user.id)
            .await
            .unwrap();
        assert_eq!(outcome.claims.role, fernweh_core::Role::Admin);
    }

    #[tokio::test]
    async fn stored_refresh_token_rotates_both() {
        let (service, storage) = service();
        let (user, _) = service.sign_up(signup()).await.unwrap();

        let outcome = service.resolve(None, None, user.id).await.unwrap();
        let IssuedTokens::Pair(pair) = outcome.issued else {
            panic!("expected a full rotation");
        };

        let stored = storage.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.refresh_token.as_deref(), Some(pair.refresh.as_str()));
    }

    #[tokio::test]
    async fn missing_stored_refresh_is_unauthorized() {
        let (service, _) = service();
        let (user, _) = service.sign_up(signup()).await.unwrap();
        service.sign_out(user.id).await.unwrap();

        assert_eq!(
            service.resolve(None, None, user.id).await.unwrap_err(),
            ApiError::unauthorized("Please sign in again")
        );
    }

    #[tokio::test]
    async fn tampered_stored_refresh_is_unauthorized() {
        let (service, storage) = service();
        let (mut user, _) = service.sign_up(signup()).await.unwrap();

        user.refresh_token = Some("tampered".into());
        storage.update(&user).await.unwrap();

        assert_eq!(
            service.resolve(None, None, user.id).await.unwrap_err(),
            ApiError::unauthorized("Please sign in again")
        );
    }

    #[tokio::test]
    async fn unknown_subject_is_not_found() {
        let (service, _) = service();
        assert_eq!(
            service.resolve(None, None, Uuid::new_v4()).await.unwrap_err(),
            ApiError::not_found("User does not exist")
        );
    }
}
