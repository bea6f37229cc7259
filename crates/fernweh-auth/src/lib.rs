//! Authentication for the Fernweh backend.
//!
//! Four concerns live here:
//!
//! - [`token`]: stateless HS256 access/refresh tokens and their claims.
//! - [`password`]: Argon2id hashing plus reset-token generation.
//! - [`cookie`]: the `access_token`/`refresh_token` cookie pair and the
//!   deployment-dependent SameSite/Secure switches.
//! - [`session`]: sign-up/sign-in/sign-out and the session resolution
//!   cascade that transparently refreshes expired access tokens.
//!
//! Route-facing extractors ([`AuthUser`], [`AdminUser`]) are in
//! [`extract`].

pub mod config;
pub mod cookie;
pub mod extract;
pub mod password;
pub mod session;
pub mod token;

pub use config::AuthConfig;
pub use cookie::{ACCESS_COOKIE, CookieConfig, REFRESH_COOKIE};
pub use extract::{AdminUser, AuthState, AuthUser};
pub use password::{generate_reset_token, hash_password, verify_password};
pub use session::{SessionOutcome, SessionService, SessionTokens};
pub use token::{Claims, TokenError, TokenService};
