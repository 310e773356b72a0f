use std::sync::Arc;

mod auth;
mod config;
mod db;
mod dto;
mod error;
mod handlers;
mod models;
mod routes;
mod services;

use config::Config;
use db::{MemoryEntryStore, PgEntryStore, StoreBackend};
use services::clock::{Clock, SystemClock};
use services::lifecycle::EntryLifecycleManager;
use services::sensor::HttpActivitySensor;

#[derive(Clone)]
pub struct AppState {
    pub store: StoreBackend,
    pub config: Arc<Config>,
    pub clock: Arc<dyn Clock>,
    pub entries: Arc<EntryLifecycleManager<StoreBackend>>,
    pub activity_sensor: Option<HttpActivitySensor>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "carbon_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    let store = match config.database_url.as_deref() {
        Some(url) => {
            let db = db::pool::create_pool(url).await?;
            sqlx::migrate!("./migrations").run(&db).await?;
            tracing::info!("Database migrations applied");
            StoreBackend::Postgres(PgEntryStore::new(db))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, entries are kept in memory only");
            StoreBackend::Memory(MemoryEntryStore::new())
        }
    };

    let activity_sensor = config.activity_api_url.as_deref().map(|url| {
        tracing::info!(url = %url, "Activity bridge configured");
        HttpActivitySensor::new(url)
    });

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let state = AppState {
        entries: Arc::new(EntryLifecycleManager::new(store.clone(), clock.clone())),
        clock,
        store,
        config: config.clone(),
        activity_sensor,
    };

    let app = routes::router(state);

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
