//! Startup orchestration.
//!
//! # Responsibilities
//! - Validate configuration
//! - Open the record store and wait for the initial load
//! - Build the HTTP server and bind its listener
//!
//! # Design Decisions
//! - Subsystems initialize in order, not concurrently
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpListener;

use crate::config::loader::join;
use crate::config::{validate_config, ServiceConfig, ValidationError};
use crate::http::HttpServer;
use crate::routing::PatternError;
use crate::store::{Store, StoreError};
use crate::tasks::Task;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {}", join(.0))]
    Config(Vec<ValidationError>),

    #[error("failed to open database: {0}")]
    Store(#[from] StoreError),

    #[error("invalid route table: {0}")]
    Routes(#[from] PatternError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

/// A server ready to run, with its bound listener.
pub struct Started {
    pub server: HttpServer,
    pub listener: TcpListener,
    pub store: Arc<Store<Task>>,
    pub local_addr: SocketAddr,
}

/// Bring every subsystem up in dependency order.
pub async fn start(config: ServiceConfig) -> Result<Started, StartupError> {
    validate_config(&config).map_err(StartupError::Config)?;

    let store = Arc::new(Store::<Task>::open(config.storage.path.clone()).await?);
    let server = HttpServer::new(config.clone(), store.clone())?;

    let bind_error = |source: std::io::Error| StartupError::Bind {
        address: config.listener.bind_address.clone(),
        source,
    };
    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .map_err(bind_error)?;
    let local_addr = listener.local_addr().map_err(bind_error)?;

    tracing::info!(address = %local_addr, "Listening for connections");

    Ok(Started {
        server,
        listener,
        store,
        local_addr,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_config_is_reported_readably() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "nowhere".to_string();
        config.timeouts.request_secs = 0;

        let err = match start(config).await {
            Err(e) => e,
            Ok(_) => panic!("start accepted an invalid configuration"),
        };

        assert!(matches!(err, StartupError::Config(ref errors) if errors.len() == 2));
        let message = err.to_string();
        assert!(message.starts_with("invalid configuration: "));
        assert!(message.contains("nowhere"));
        assert!(message.contains(", "));
        assert!(!message.contains('['));
    }
}
