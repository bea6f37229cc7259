//! Auth configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Token and cookie settings, deserialized from the environment as part
/// of the server configuration. Durations accept humantime strings
/// ("15m", "7d").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Process-wide signing secret. Required in any real deployment; the
    /// empty default exists only so partial configs deserialize, and is
    /// rejected by [`validate`](Self::validate).
    pub secret: String,

    /// Access token lifetime.
    #[serde(with = "humantime_serde")]
    pub access_ttl: Duration,

    /// Refresh token lifetime.
    #[serde(with = "humantime_serde")]
    pub refresh_ttl: Duration,

    /// Max-age of the access cookie.
    #[serde(with = "humantime_serde")]
    pub access_cookie_max_age: Duration,

    /// Max-age of the refresh cookie.
    #[serde(with = "humantime_serde")]
    pub refresh_cookie_max_age: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            access_ttl: Duration::from_secs(15 * 60),
            refresh_ttl: Duration::from_secs(7 * 24 * 60 * 60),
            access_cookie_max_age: Duration::from_secs(15 * 60),
            refresh_cookie_max_age: Duration::from_secs(7 * 24 * 60 * 60),
        }
    }
}

impl AuthConfig {
    /// Rejects configurations that cannot produce a working session
    /// lifecycle.
    ///
    /// # Errors
    ///
    /// A human-readable description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.secret.is_empty() {
            return Err("auth secret must not be empty".into());
        }
        if self.access_ttl.is_zero() || self.refresh_ttl.is_zero() {
            return Err("token lifetimes must be greater than zero".into());
        }
        if self.access_ttl >= self.refresh_ttl {
            return Err("access token lifetime must be shorter than refresh lifetime".into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AuthConfig {
        AuthConfig {
            secret: "secret".into(),
            ..AuthConfig::default()
        }
    }

    #[test]
    fn default_durations_are_sane() {
        let config = AuthConfig::default();
        assert_eq!(config.access_ttl, Duration::from_secs(900));
        assert_eq!(config.refresh_ttl, Duration::from_secs(604_800));
    }

    #[test]
    fn empty_secret_rejected() {
        assert!(AuthConfig::default().validate().is_err());
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn inverted_lifetimes_rejected() {
        let config = AuthConfig {
            access_ttl: Duration::from_secs(1000),
            refresh_ttl: Duration::from_secs(100),
            ..valid()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn humantime_strings_deserialize() {
        let config: AuthConfig = serde_json::from_str(
            r#"{"secret":"s","access_ttl":"15m","refresh_ttl":"7d"}"#,
        )
        .unwrap();
        assert_eq!(config.access_ttl, Duration::from_secs(900));
        assert_eq!(config.refresh_ttl, Duration::from_secs(7 * 86_400));
    }
}
