//! Serve command - Starts the HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use crate::api::{create_router, AppState};
use crate::cli::args::ServeArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::infra::{Cache, Database, RateLimiter};

/// Execute the serve command
pub async fn execute(args: ServeArgs, config: Config) -> AppResult<()> {
    config.validate()?;
    tracing::info!("Starting server...");

    let db = Arc::new(
        Database::connect(&config)
            .await
            .map_err(|e| AppError::internal(format!("Database connection failed: {}", e)))?,
    );
    tracing::info!("Database connected");

    let rate_limiter = connect_rate_limiter(&config).await?;

    let app_state = AppState::from_config(db, rate_limiter, &config);
    let app = create_router(app_state, &config.allowed_origins);

    let addr = format!(
        "{}:{}",
        args.host.as_deref().unwrap_or(&config.server_host),
        args.port.unwrap_or(config.server_port)
    );
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    // Peer addresses feed the rate limiter when no proxy header is present
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}

async fn connect_rate_limiter(config: &Config) -> AppResult<Option<Arc<dyn RateLimiter>>> {
    let Some(url) = config.redis_url.as_deref() else {
        tracing::warn!("REDIS_URL is not set; rate limiting is disabled");
        return Ok(None);
    };

    let cache = Cache::connect(url)
        .await
        .map_err(|e| AppError::internal(format!("Redis connection failed: {}", e)))?;
    tracing::info!("Redis connected");

    Ok(Some(Arc::new(cache)))
}
