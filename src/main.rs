//! Camera Console - main entry point

use camera_console::{
    camera_store::{CameraRepository, MemoryCameraRepository, MySqlCameraRepository},
    state::{AppConfig, AppState, StoreBackend},
    web_api,
};
use sqlx::mysql::MySqlPoolOptions;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Pick the camera store from configuration
async fn open_store(config: &AppConfig) -> anyhow::Result<(Arc<dyn CameraRepository>, StoreBackend)> {
    if let Some(database_url) = &config.database_url {
        let pool = MySqlPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(10))
            .connect(database_url)
            .await?;

        tracing::info!(max_connections = config.db_max_connections, "Database connected");

        return Ok((Arc::new(MySqlCameraRepository::new(pool)), StoreBackend::MySql));
    }

    let repo = match &config.camera_seed_file {
        Some(path) => MemoryCameraRepository::from_seed_file(path).await?,
        None => {
            tracing::warn!("DATABASE_URL and CAMERA_SEED_FILE unset, starting with an empty in-memory store");
            MemoryCameraRepository::new()
        }
    };

    Ok((Arc::new(repo), StoreBackend::Memory))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "camera_console=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Camera Console v{}", env!("CARGO_PKG_VERSION"));

    // Load configuration
    let config = AppConfig::default();
    tracing::info!(
        database = config.database_url.is_some(),
        seed_file = ?config.camera_seed_file,
        host = %config.host,
        port = config.port,
        "Configuration loaded"
    );

    let (repo, backend) = open_store(&config).await?;
    tracing::info!(store = backend.as_str(), "Camera store initialized");

    let state = AppState::new(config, repo, backend);
    let addr = format!("{}:{}", state.config.host, state.config.port);

    let app = web_api::create_router(state).layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
