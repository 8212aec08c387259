use anyhow::Result;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use common::database::{DatabaseConfig, health_check, init_pool};
use marketplace::{
    AppState,
    auth::{TokenConfig, TokenService},
    config::{ServerConfig, StorageBackend},
    create_router,
    store::{MarketplaceStore, MemoryStore, PgStore},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting marketplace service");

    let server_config = ServerConfig::from_env()?;
    let token_config = TokenConfig::from_env();
    if token_config.is_insecure() {
        warn!("SECRET_KEY is empty; issued tokens can be forged by anyone");
    }

    let store: Arc<dyn MarketplaceStore> = match server_config.storage_backend()? {
        StorageBackend::Postgres => {
            let db_config = DatabaseConfig::from_env()?;
            let pool = init_pool(&db_config).await?;

            // Check database connectivity
            if health_check(&pool).await? {
                info!("Database connection successful");
            } else {
                anyhow::bail!("Failed to connect to database");
            }

            let store = PgStore::new(pool);
            if db_config.run_migrations {
                store.migrate().await?;
                info!("Database migrations applied");
            }
            Arc::new(store)
        }
        StorageBackend::Memory => {
            warn!("Using in-memory storage; data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let app_state = AppState::new(store, TokenService::new(token_config));
    let app = create_router(app_state);

    let addr = server_config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!(
        "Marketplace service listening on {} ({} storage)",
        addr,
        server_config.storage_backend()?
    );

    axum::serve(listener, app).await?;

    Ok(())
}
