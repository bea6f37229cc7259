//! Shared application state.

use std::sync::Arc;

use axum::extract::FromRef;

use fernweh_auth::{AuthState, CookieConfig, SessionService, TokenService};
use fernweh_storage::{MemoryStorage, PostStorage, UserStorage};

use crate::cache::{CacheBackend, PostCache};
use crate::config::AppConfig;

/// One instance per process, `Clone` is cheap (all `Arc`s).
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStorage>,
    pub posts: Arc<dyn PostStorage>,
    pub sessions: SessionService,
    pub auth: AuthState,
    pub cookies: CookieConfig,
    pub cache: PostCache,
}

impl AppState {
    #[must_use]
    pub fn new(
        users: Arc<dyn UserStorage>,
        posts: Arc<dyn PostStorage>,
        tokens: Arc<TokenService>,
        cookies: CookieConfig,
        cache: CacheBackend,
    ) -> Self {
        Self {
            sessions: SessionService::new(tokens.clone(), users.clone()),
            auth: AuthState { tokens },
            users,
            posts,
            cookies,
            cache: PostCache::new(cache),
        }
    }

    /// State over the in-memory store, wired from the loaded config.
    #[must_use]
    pub fn from_config(config: &AppConfig, cache: CacheBackend) -> Self {
        let storage = Arc::new(MemoryStorage::new());
        let tokens = Arc::new(TokenService::new(
            &config.auth.secret,
            time::Duration::seconds(config.auth.access_ttl.as_secs() as i64),
            time::Duration::seconds(config.auth.refresh_ttl.as_secs() as i64),
        ));
        Self::new(
            storage.clone(),
            storage,
            tokens,
            config.cookie_config(),
            cache,
        )
    }
}

impl FromRef<AppState> for AuthState {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
