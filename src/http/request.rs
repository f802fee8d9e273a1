//! Request handling and transformation.
//!
//! # Responsibilities
//! - Tag every request with an `x-request-id` (UUID v4)
//! - Read and decode the JSON body within the configured size limit
//! - Hand handlers the parsed `(params, query, body)` triple
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - An empty body is `None`, never an error; handlers decide if it is required
//! - Route lookup happens before the body is read, so unknown routes never pay for it

use axum::body::Body;
use axum::http::HeaderName;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde_json::Value;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::http::response::ApiError;
use crate::routing::{PathParams, QueryParams};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Layer generating a request ID for requests that lack one.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID), MakeRequestUuid)
}

/// Layer copying the request ID onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(HeaderName::from_static(X_REQUEST_ID))
}

/// What a matched handler receives from the transport.
#[derive(Debug, Clone, Default)]
pub struct HandlerRequest {
    pub params: PathParams,
    pub query: QueryParams,
    pub body: Option<Value>,
}

impl HandlerRequest {
    /// A bound path parameter. Missing means the route table and the handler disagree.
    pub fn param(&self, name: &str) -> Result<String, ApiError> {
        self.params
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::Internal(format!("route is missing path parameter '{name}'")))
    }
}

/// Buffer `body` up to `limit` bytes and decode it as JSON.
///
/// Only exceeding `limit` is a 413; a body that breaks off mid-stream is a
/// bad request.
pub async fn read_json_body(body: Body, limit: usize) -> Result<Option<Value>, ApiError> {
    let bytes = match Limited::new(body, limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) if e.is::<LengthLimitError>() => return Err(ApiError::PayloadTooLarge { limit }),
        Err(e) => return Err(ApiError::ValidationFailed(format!("failed to read request body: {e}"))),
    };

    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Null) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(e) => Err(ApiError::ValidationFailed(format!("request body is not valid JSON: {e}"))),
    }
}
