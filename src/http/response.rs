//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Carry handler results (status + optional JSON payload) to the transport
//! - Map every error kind to a status code and a JSON error body
//!
//! # Design Decisions
//! - Error bodies are always `{ "error": "<message>" }`
//! - Internal failures are logged in full but reported generically

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::routing::RoutingError;
use crate::store::StoreError;
use crate::tasks::InvalidPayload;

/// Errors surfaced to API clients.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    NoRouteMatched(#[from] RoutingError),

    #[error("{0}")]
    ValidationFailed(String),

    #[error("{0}")]
    Conflict(String),

    #[error("request body exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) | ApiError::NoRouteMatched(_) => StatusCode::NOT_FOUND,
            ApiError::ValidationFailed(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { .. } => ApiError::NotFound(e.to_string()),
            StoreError::Conflict { .. } => ApiError::Conflict(e.to_string()),
            StoreError::PersistenceFailed { .. } | StoreError::Serialize(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<InvalidPayload> for ApiError {
    fn from(e: InvalidPayload) -> Self {
        ApiError::ValidationFailed(e.0)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Internal error");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// A handler's successful outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl Reply {
    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn json<T: Serialize>(status: StatusCode, payload: &T) -> Result<Self, ApiError> {
        let body = serde_json::to_value(payload)
            .map_err(|e| ApiError::Internal(format!("failed to encode response: {e}")))?;
        Ok(Self {
            status,
            body: Some(body),
        })
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::from(RoutingError::NoRouteMatched {
                method: Method::GET,
                path: "/nope".into(),
            })
            .status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::ValidationFailed("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Internal("x".into()).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_store_errors_convert() {
        let err = ApiError::from(StoreError::NotFound {
            collection: "tasks".into(),
            id: "1".into(),
        });
        assert!(matches!(err, ApiError::NotFound(_)));

        let err = ApiError::from(StoreError::PersistenceFailed {
            path: "db.json".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_payload_is_a_bad_request() {
        let err = ApiError::from(InvalidPayload("title is required".into()));
        assert!(matches!(&err, ApiError::ValidationFailed(message) if message == "title is required"));
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_internal_error_body_is_generic() {
        let response = ApiError::Internal("disk on fire".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "Internal server error" }));
        assert!(!String::from_utf8_lossy(&bytes).contains("disk on fire"));
    }
}
