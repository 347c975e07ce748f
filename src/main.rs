//! Accessibly - display presets and a focus timer for your editor
//!
//! This is the main entry point for the accessibly daemon.

use std::sync::Arc;
use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use accessibly::{
    api::create_router,
    config::Config,
    state::AppState,
    store::{DurableStore, JsonFileStore, MemoryStore, SettingsStore},
    utils::shutdown_signal,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    // Initialize tracing with appropriate log level
    tracing_subscriber::fmt()
        .with_env_filter(format!("accessibly={},tower_http=info", config.log_level()))
        .init();

    info!("Starting accessibly v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: host={}, port={}, focus={}min",
        config.host, config.port, config.focus_minutes
    );

    let (settings, durable) = open_stores(&config)?;

    // Create application state
    let state = Arc::new(
        AppState::new(
            config.port,
            config.host.clone(),
            config.focus_seconds(),
            settings,
            durable,
        )
        .context("Failed to load saved preset snapshots")?,
    );

    // Create HTTP router with all endpoints
    let app = create_router(Arc::clone(&state));

    // Bind to the specified address
    let addr = config.address();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Endpoints:");
    info!("  POST /ui/message - Dispatch a UI pane command");
    info!("  GET  /events     - Stream timer updates and notifications");
    info!("  GET  /status     - Check timer and preset status");
    info!("  GET  /health     - Health check");

    // Setup graceful shutdown
    let server = axum::serve(listener, app);

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                tracing::error!("Server error: {}", e);
            }
        }
        result = shutdown_signal() => {
            result.context("Failed to register signal handlers")?;
            info!("Shutdown signal received");
        }
    }

    state.shutdown();
    info!("Server shutdown complete");
    Ok(())
}

type Stores = (Arc<dyn SettingsStore>, Arc<dyn DurableStore>);

fn open_stores(config: &Config) -> anyhow::Result<Stores> {
    if config.ephemeral {
        info!("Running with in-memory stores");
        let settings: Arc<dyn SettingsStore> = Arc::new(MemoryStore::new());
        let durable: Arc<dyn DurableStore> = Arc::new(MemoryStore::new());
        return Ok((settings, durable));
    }

    let dir = config
        .resolve_data_dir()
        .context("Could not resolve a data directory; pass --data-dir")?;
    info!("Data directory: {}", dir.display());

    let settings: Arc<dyn SettingsStore> = Arc::new(
        JsonFileStore::open(dir.join("settings.json")).context("Failed to open settings store")?,
    );
    let durable: Arc<dyn DurableStore> = Arc::new(
        JsonFileStore::open(dir.join("state.json")).context("Failed to open state store")?,
    );
    Ok((settings, durable))
}
