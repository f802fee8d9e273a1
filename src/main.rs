//! Task Service
//!
//! A small HTTP API for managing tasks, persisted to a single JSON file.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ http::server (axum, request id, trace, timeout)
//!                         │
//!                         ▼
//!                     routing (method + "/tasks/:id" patterns)
//!                         │
//!                         ▼
//!                     tasks::handle (validation, endpoint logic)
//!                         │
//!                         ▼
//!                     store (in-memory snapshot ⇄ db.json)
//! ```

use std::path::PathBuf;

use clap::Parser;
use task_service::config::{load_config, ServiceConfig};
use task_service::lifecycle::{self, signals, Shutdown};
use task_service::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "task-service")]
#[command(about = "HTTP task list backed by a JSON file", long_about = None)]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,

    /// Override the database file path.
    #[arg(long)]
    db: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }
    if let Some(db) = args.db {
        config.storage.path = db;
    }

    logging::init(&config.observability);
    tracing::info!("task-service v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        database = %config.storage.path.display(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let started = lifecycle::start(config).await?;

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    started.server.run(started.listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
