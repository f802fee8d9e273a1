//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use task_service::config::ServiceConfig;
use task_service::lifecycle::{self, Shutdown};
use task_service::{Store, Task};
use tempfile::TempDir;

/// A running service bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub store: Arc<Store<Task>>,
    pub db_path: PathBuf,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<()>,
    _dir: Option<TempDir>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the server task to finish.
    pub async fn stop(self) -> Option<TempDir> {
        self.shutdown.trigger();
        let _ = self.handle.await;
        self._dir
    }
}

/// Start a server on a fresh temporary database.
pub async fn start_server() -> TestServer {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("db.json");
    let mut server = start_server_at(db_path).await;
    server._dir = Some(dir);
    server
}

/// Start a server backed by `db_path`.
pub async fn start_server_at(db_path: PathBuf) -> TestServer {
    let mut config = ServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.storage.path = db_path.clone();

    let started = lifecycle::start(config).await.unwrap();
    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let addr = started.local_addr;
    let store = started.store.clone();

    let handle = tokio::spawn(async move {
        let _ = started.server.run(started.listener, server_shutdown).await;
    });

    TestServer {
        addr,
        store,
        db_path,
        shutdown,
        handle,
        _dir: None,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
