use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use flicklet_daily::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, BlobStore, MemoryBlobStore, RedisBlobStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "flicklet_daily=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn BlobStore> = match config.redis_url.as_deref() {
        Some(url) => {
            tracing::info!("Using Redis for history storage");
            Arc::new(RedisBlobStore::new(create_redis_client(url)?))
        }
        None => {
            tracing::warn!("REDIS_URL not set, history is kept in memory only");
            Arc::new(MemoryBlobStore::new())
        }
    };

    let state = AppState::build(&config, store).await?;
    let app = create_router(state, config.enable_debug_routes);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
