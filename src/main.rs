use std::{net::SocketAddr, sync::Arc};
use tokio::signal;
use tracing::{error, info};

use smart_vocab_api::{
    config::{Config, StorageBackend},
    create_router,
    db::Database,
    middleware::{apply_middleware_stack, init_tracing},
    store::{MemoryStore, Store},
    AppState,
};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    if let Err(e) = init_tracing() {
        eprintln!("Failed to initialize tracing: {}", e);
        std::process::exit(1);
    }

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => {
            info!("Configuration loaded successfully ({:?} environment)", config.environment);
            config
        }
        Err(e) => {
            error!("Failed to load configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let store = match open_store(&config).await {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to initialize storage: {}", e);
            std::process::exit(1);
        }
    };

    let state = match AppState::new(store, &config.auth) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {:#}", e);
            std::process::exit(1);
        }
    };
    let app = apply_middleware_stack(create_router(state), config.request_timeout);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Starting server on {}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            info!("Server listening on {}", addr);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    // Start the server with graceful shutdown handling
    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    info!("Server shutdown complete");
}

/// Connects and migrates PostgreSQL, or hands back an empty in-memory store
async fn open_store(config: &Config) -> Result<Arc<dyn Store>, smart_vocab_api::ApiError> {
    match (config.storage, &config.database) {
        (StorageBackend::Postgres, Some(database_config)) => {
            let database = Database::new(database_config.clone()).await?;
            info!("Database connection established");

            database.migrate().await?;
            Ok(Arc::new(database))
        }
        (StorageBackend::Postgres, None) => Err(smart_vocab_api::ApiError::Internal(
            anyhow::anyhow!("PostgreSQL storage selected without database configuration"),
        )),
        (StorageBackend::Memory, _) => {
            info!("Using in-memory storage; data is lost on shutdown");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Graceful shutdown signal handler
/// Listens for SIGTERM and SIGINT signals
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal, initiating graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM signal, initiating graceful shutdown");
        },
    }
}
