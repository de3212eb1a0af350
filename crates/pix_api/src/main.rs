use std::sync::Arc;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use pix_api::config::Config;
use pix_api::{app_router, AppState};
use pix_core::render::{TemplateCompositor, TemplateRegistry};
use pix_db::{PgEstablishmentRepository, PgPixRepository};
use pix_service::{AuthConfig, CacheAdapter, MemoryCache, PixService, RedisCache};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to Postgres")?;

    let cache: Arc<dyn CacheAdapter> = match &config.redis_url {
        Some(url) => match RedisCache::connect(url).await {
            Ok(redis) => {
                info!("using Redis cache");
                Arc::new(redis)
            }
            Err(e) => {
                warn!(error = %e, "Redis unavailable, using in-process cache");
                Arc::new(MemoryCache::new())
            }
        },
        None => Arc::new(MemoryCache::new()),
    };

    if !config.templates_dir.is_dir() {
        warn!(dir = %config.templates_dir.display(), "templates directory not found");
    }
    let templates = TemplateRegistry::with_defaults(&config.templates_dir);

    let service = PixService::new(
        Arc::new(PgPixRepository::new(pool.clone())),
        Arc::new(PgEstablishmentRepository::new(pool)),
        cache,
        TemplateCompositor::new(templates),
        AuthConfig::new(config.jwt_secret.clone(), config.jwt_ttl_hours),
    );
    let state = AppState::new(service).context("failed to register metrics")?;

    let app = app_router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind port {}", config.port))?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
