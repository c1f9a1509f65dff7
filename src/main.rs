use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::AppState;
use catalog_core::{
    CatalogService, CoreConfig, DocumentStore,
    config::{data_dir_from_env_value, port_from_env_value},
};

/// Main entry point for the recipe catalog
///
/// Opens the document store and serves the REST API until SIGINT or SIGTERM.
///
/// # Environment Variables
/// - `PORT`: listening port, bound on all interfaces (default: 5000)
/// - `CATALOG_DATA_DIR`: document store root directory (default: "catalog_data")
/// - `RUST_LOG`: extra log filter directives
///
/// # Returns
/// * `Ok(())` - If the server starts and shuts down cleanly
/// * `Err(anyhow::Error)` - If configuration, store setup or serving fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("recipe_catalog_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("catalog_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = port_from_env_value(std::env::var("PORT").ok())?;
    let data_dir = data_dir_from_env_value(std::env::var("CATALOG_DATA_DIR").ok());

    let cfg = Arc::new(CoreConfig::new(data_dir)?);
    let store = DocumentStore::open(cfg).await?;
    let app = api_rest::router(AppState::new(CatalogService::new(store)));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("++ Server is running on port {}", port);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, stopping server");
}
