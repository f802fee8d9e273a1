//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with a single catch-all dispatcher
//! - Wire up middleware (tracing, timeout, request ID)
//! - Dispatch requests through the task route table
//! - Flush the store once the server has drained

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServiceConfig;
use crate::http::request::{
    propagate_request_id_layer, read_json_body, set_request_id_layer, HandlerRequest, X_REQUEST_ID,
};
use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::routing::{PatternError, Router as TaskRouter};
use crate::store::Store;
use crate::tasks::{self, Endpoint, Task};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<TaskRouter<Endpoint>>,
    pub store: Arc<Store<Task>>,
    pub max_body_bytes: usize,
}

/// HTTP server for the task API.
pub struct HttpServer {
    router: Router,
    store: Arc<Store<Task>>,
}

impl HttpServer {
    /// Create a new HTTP server over an opened store.
    pub fn new(config: ServiceConfig, store: Arc<Store<Task>>) -> Result<Self, PatternError> {
        let state = AppState {
            routes: Arc::new(tasks::routes()?),
            store: store.clone(),
            max_body_bytes: config.limits.max_body_bytes,
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, store })
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServiceConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer())
    }

    /// Serve on `listener` until `shutdown` fires, then flush the store.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            database = %self.store.path().display(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        if let Err(e) = self.store.flush().await {
            tracing::error!(error = %e, "Final database flush failed");
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Match the route, decode the body, run the handler, map the outcome.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start_time = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();
    let method = request.method().clone();
    let raw_path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        path = %raw_path,
        "Dispatching request"
    );

    let (route, outcome) = match state.routes.match_request(&method, &raw_path) {
        Ok(matched) => {
            let endpoint = *matched.handler;
            let label = matched.pattern.as_str();
            let outcome = match read_json_body(request.into_body(), state.max_body_bytes).await {
                Ok(body) => {
                    let handler_request = HandlerRequest {
                        params: matched.params,
                        query: matched.query,
                        body,
                    };
                    tasks::handle(endpoint, &state.store, handler_request).await
                }
                Err(e) => Err(e),
            };
            (label, outcome)
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, method = %method, path = %raw_path, "No route matched");
            ("none", Err(ApiError::from(e)))
        }
    };

    let response = match outcome {
        Ok(reply) => reply.into_response(),
        Err(e) => {
            if !matches!(e, ApiError::Internal(_) | ApiError::NoRouteMatched(_)) {
                tracing::info!(request_id = %request_id, error = %e, "Request rejected");
            }
            e.into_response()
        }
    };

    metrics::record_request(method.as_str(), route, response.status().as_u16(), start_time);
    response
}
