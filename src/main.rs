//! route-sync
//!
//! Keeps a reverse proxy's live route list, managed through its HTTP config API,
//! in line with a locally persisted set of path-prefix routes.
//!
//! # Architecture Overview
//!
//! ```text
//!   admin UI / route-cli
//!          │  HTTP
//!          ▼
//!   ┌──────────────┐   commands   ┌──────────────────┐   GET/PUT    ┌───────────────┐
//!   │ admin router │─────────────▶│  reconcile worker │────────────▶│ proxy config  │
//!   └──────────────┘   (queue)    │   (Reconciler)    │             │      API      │
//!                                 └───┬──────────┬────┘             └───────────────┘
//!                                     │          │ GET <path>       ┌───────────────┐
//!                                     │          └─────────────────▶│ proxy public  │
//!                                     ▼                             │   listener    │
//!                               routes.json                         └───────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use route_sync::admin::setup_admin_router;
use route_sync::config::{load_config, SyncConfig};
use route_sync::lifecycle::{signals, startup};
use route_sync::observability::{logging, metrics};
use route_sync::Shutdown;

#[derive(Parser)]
#[command(name = "route-sync")]
#[command(about = "Synchronize reverse proxy routes through the proxy's config API", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SyncConfig::default(),
    };

    logging::init(&config.observability)?;

    tracing::info!("route-sync v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        admin_address = %config.admin.bind_address,
        config_url = %config.remote.config_url,
        proxy_url = %config.health_check.proxy_url,
        store = %config.store.path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        if let Ok(addr) = config.observability.metrics_address.parse() {
            metrics::init_metrics(addr);
        } else {
            tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            );
        }
    }

    let shutdown = Shutdown::new();
    let engine = startup::start_engine(&config, &shutdown).await?;

    let listener = TcpListener::bind(&config.admin.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Admin API listening");

    let app = setup_admin_router(engine.handle.clone(), &config.admin);
    let stopped = shutdown.signalled();
    let server = tokio::spawn(async move {
        axum::serve(listener, app).with_graceful_shutdown(stopped).await
    });

    signals::wait_for_termination().await;
    shutdown.trigger();

    server.await??;
    engine.worker.await?;
    engine.monitor.await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
