//! Stateless signed tokens.
//!
//! Access and refresh tokens carry the same claim set and differ only in
//! expiry. Both are signed with HS256 under one process-wide secret; the
//! service holds no other state and is safe to share across tasks.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use uuid::Uuid;

use fernweh_core::{Role, User};

/// Claim set shared by access and refresh tokens.
///
/// Identity fields are snapshots of the user record at issuance time.
/// The session cascade re-reads the store before minting, so a role or
/// email change propagates at the next refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// Expiration time (Unix timestamp).
    pub exp: i64,
    /// Issued at (Unix timestamp).
    pub iat: i64,
}

/// Errors from token verification.
///
/// Callers in the session cascade treat both variants uniformly as "this
/// token is unusable"; the split exists for logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {message}")]
    Invalid { message: String },
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => Self::Expired,
            _ => Self::Invalid {
                message: err.to_string(),
            },
        }
    }
}

/// Issues and verifies the two token kinds.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenService {
    #[must_use]
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Signs a short-lived access token for `user`.
    ///
    /// # Errors
    ///
    /// Fails only if serialization of the claims fails.
    pub fn issue_access(&self, user: &User) -> Result<String, TokenError> {
        self.issue(user, self.access_ttl)
    }

    /// Signs a long-lived refresh token for `user`.
    ///
    /// # Errors
    ///
    /// Fails only if serialization of the claims fails.
    pub fn issue_refresh(&self, user: &User) -> Result<String, TokenError> {
        self.issue(user, self.refresh_ttl)
    }

    fn issue(&self, user: &User, ttl: Duration) -> Result<String, TokenError> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: now + ttl.whole_seconds(),
            iat: now,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(TokenError::from)
    }

    /// Verifies signature and expiry, returning the embedded claims.
    ///
    /// # Errors
    ///
    /// [`TokenError::Expired`] past the expiry timestamp, otherwise
    /// [`TokenError::Invalid`] for any malformed or tampered token.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims)
    }
}
