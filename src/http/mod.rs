//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, catch-all dispatch)
//!     → routing (method + path → Endpoint, params, query)
//!     → request.rs (request ID, JSON body decoding)
//!     → tasks::handle (store operations)
//!     → response.rs (Reply / ApiError → status + JSON)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{HandlerRequest, X_REQUEST_ID};
pub use response::{ApiError, Reply};
pub use server::HttpServer;
