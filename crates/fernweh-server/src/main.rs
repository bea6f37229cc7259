use axum::http::HeaderValue;
use deadpool_redis::Runtime;

use fernweh_server::cache::CacheBackend;
use fernweh_server::config::CacheMode;
use fernweh_server::{AppConfig, AppState, observability, routes};

#[tokio::main]
async fn main() {
    // A missing .env is fine; any other failure is worth a warning.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io) if io.kind() == std::io::ErrorKind::NotFound) {
            eprintln!("Warning: failed to load .env file: {e}");
        }
    }

    observability::init_tracing();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("Configuration error: {e}");
        std::process::exit(2);
    }

    let cache = match build_cache(&config) {
        Ok(cache) => cache,
        Err(e) => {
            eprintln!("Cache initialization failed: {e}");
            std::process::exit(2);
        }
    };

    let origin = match config.frontend_origin.parse::<HeaderValue>() {
        Ok(origin) => origin,
        Err(e) => {
            eprintln!("Configuration error: invalid frontend_origin: {e}");
            std::process::exit(2);
        }
    };

    let addr = match config.addr() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    let state = AppState::from_config(&config, cache);
    let app = routes::router(state, origin);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(2);
        }
    };

    tracing::info!(%addr, environment = ?config.environment, "listening");
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        eprintln!("Server error: {e}");
    }
}

fn build_cache(config: &AppConfig) -> Result<CacheBackend, String> {
    match config.cache.mode {
        CacheMode::Disabled => Ok(CacheBackend::Disabled),
        CacheMode::Local => Ok(CacheBackend::new_local()),
        CacheMode::Redis => {
            let url = config
                .cache
                .redis_url
                .as_deref()
                .ok_or_else(|| "cache.redis_url is required".to_string())?;
            let pool = deadpool_redis::Config::from_url(url)
                .create_pool(Some(Runtime::Tokio1))
                .map_err(|e| e.to_string())?;
            Ok(CacheBackend::new_redis(pool))
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to install ctrl-c handler");
    }
    tracing::info!("shutting down");
}
