//! Environment-sourced configuration.
//!
//! Variables use the `FERNWEH_` prefix with `__` separating nesting
//! levels, e.g. `FERNWEH_SERVER__PORT=8080`,
//! `FERNWEH_AUTH__SECRET=...`, `FERNWEH_CACHE__MODE=redis`. A `.env`
//! file is honored in development via dotenvy (loaded in `main.rs`).

use std::net::SocketAddr;

use serde::{Deserialize, Serialize};

use fernweh_auth::{AuthConfig, CookieConfig};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub environment: Environment,
    /// Origin allowed by CORS, with credentials.
    pub frontend_origin: String,
    pub cache: CacheConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    Disabled,
    #[default]
    Local,
    Redis,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CacheConfig {
    pub mode: CacheMode,
    /// Required when `mode = redis`.
    pub redis_url: Option<String>,
}

impl AppConfig {
    /// Reads the configuration from `FERNWEH_`-prefixed environment
    /// variables.
    ///
    /// # Errors
    ///
    /// Any malformed variable (bad number, unknown enum value) fails the
    /// whole load; startup treats that as fatal.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let source = ::config::Environment::with_prefix("FERNWEH").separator("__");
        ::config::Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    /// Rejects configurations the server cannot run with.
    ///
    /// # Errors
    ///
    /// A description of the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("server.port must be > 0".into());
        }
        if self.server.host.is_empty() {
            return Err("server.host must not be empty".into());
        }
        if self.frontend_origin.is_empty() {
            return Err("frontend_origin must be set".into());
        }
        if self.cache.mode == CacheMode::Redis
            && self.cache.redis_url.as_deref().unwrap_or("").is_empty()
        {
            return Err("cache.mode=redis requires cache.redis_url".into());
        }
        self.auth.validate()?;
        Ok(())
    }

    /// Listen address.
    ///
    /// # Errors
    ///
    /// If host and port do not form a parseable socket address.
    pub fn addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("invalid listen address: {e}"))
    }

    /// Cookie settings derived from the deployment environment and the
    /// configured max-ages.
    #[must_use]
    pub fn cookie_config(&self) -> CookieConfig {
        CookieConfig::new(
            self.environment.is_production(),
            time::Duration::seconds(self.auth.access_cookie_max_age.as_secs() as i64),
            time::Duration::seconds(self.auth.refresh_cookie_max_age.as_secs() as i64),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> AppConfig {
        AppConfig {
            frontend_origin: "http://localhost:5173".into(),
            auth: AuthConfig {
                secret: "secret".into(),
                ..AuthConfig::default()
            },
            ..AppConfig::default()
        }
    }

    #[test]
    fn default_config_fails_validation_without_secret() {
        assert!(AppConfig::default().validate().is_err());
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn redis_mode_requires_url() {
        let mut config = valid();
        config.cache.mode = CacheMode::Redis;
        assert!(config.validate().is_err());

        config.cache.redis_url = Some("redis://127.0.0.1:6379".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_port_rejected() {
        let mut config = valid();
        config.server.port = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn addr_combines_host_and_port() {
        let config = valid();
        assert_eq!(config.addr().unwrap().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn production_gets_secure_cookies() {
        let mut config = valid();
        config.environment = Environment::Production;
        let cookie = config.cookie_config().access_cookie("t");
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=None"));
    }
}
