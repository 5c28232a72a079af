use std::net::SocketAddr;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tracing::{error, info};

use session_api::{build_router, AppState};
use session_core::{RetryPolicy, SessionDataStore, SessionStore};
use session_infrastructure::{JsonSerializer, MemoryExecutor, RedisExecutor};
use session_shared::config::{AppConfig, Backend};

fn build_store(config: &AppConfig) -> anyhow::Result<Arc<dyn SessionDataStore>> {
    let retry = RetryPolicy::new(config.session.max_attempts, config.session.retry_backoff());
    let serializer = JsonSerializer::new();

    let store: Arc<dyn SessionDataStore> = match config.session.backend()? {
        Backend::Redis => {
            info!(max_connections = config.redis.max_connections, "Using Redis session backend");
            let executor = RedisExecutor::from_url(&config.redis.url, config.redis.max_connections)?;
            Arc::new(SessionStore::with_retry_policy(executor, serializer, retry))
        }
        Backend::Memory => {
            info!("Using in-memory session backend (sessions are not shared between instances)");
            let executor = MemoryExecutor::new(config.redis.max_connections as usize);
            Arc::new(SessionStore::with_retry_policy(executor, serializer, retry))
        }
    };
    Ok(store)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    let _log_guard = session_shared::telemetry::init_telemetry();

    info!("Session server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Build and start the session store
    let store = build_store(&config)?;
    store.start()?;

    // Build router
    let app = build_router(AppState::new(store.clone())).layer(CorsLayer::permissive());

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.stop()?;
    info!("Session server stopped");

    Ok(())
}
