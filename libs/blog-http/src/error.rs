//! Centralized error sink.
//!
//! Every failure in the API ends up as an [`ApiError`] and is rendered by a single
//! `IntoResponse` implementation, so handlers only need `?`.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::catalog::{self, ErrDef};
use crate::trace::current_request_id;

/// Result alias for REST handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Application error with an HTTP status and a catalog code.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
#[must_use]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub trace_id: Option<String>,
}

/// Wire form of an error: `{status: "fail" | "error", code, message, trace_id?}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub status: String,
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            trace_id: None,
        }
    }

    pub fn from_def(def: &ErrDef, message: impl Into<String>) -> Self {
        Self::new(def.status_code(), def.code, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::from_def(&catalog::BAD_REQUEST, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::from_def(&catalog::VALIDATION_FAILED, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::from_def(&catalog::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::from_def(&catalog::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::from_def(&catalog::CONFLICT, message)
    }

    pub fn too_many_requests(message: impl Into<String>) -> Self {
        Self::from_def(&catalog::TOO_MANY_REQUESTS, message)
    }

    /// Generic 500; the caller is expected to have logged the cause.
    pub fn internal() -> Self {
        Self::from_def(&catalog::INTERNAL, "Something went very wrong!")
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// `fail` for client errors, `error` for everything else.
    #[must_use]
    pub fn status_label(&self) -> &'static str {
        if self.status.is_client_error() {
            "fail"
        } else {
            "error"
        }
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            status: self.status_label().to_owned(),
            code: self.code.to_owned(),
            message: self.message.clone(),
            trace_id: self.trace_id.clone(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut err = self;
        if err.trace_id.is_none() {
            err.trace_id = current_request_id();
        }

        if err.status.is_server_error() {
            tracing::error!(code = err.code, message = %err.message, "request failed");
        } else {
            tracing::debug!(code = err.code, status = err.status.as_u16(), "request rejected");
        }

        (err.status, Json(err.to_body())).into_response()
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[test]
    fn client_errors_are_fail() {
        let err = ApiError::bad_request("nope");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.status_label(), "fail");
        assert_eq!(err.code, "bad_request");
    }

    #[test]
    fn server_errors_are_error() {
        let err = ApiError::internal();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.status_label(), "error");
    }

    #[test]
    fn body_carries_trace_id_only_when_set() {
        let plain = serde_json::to_value(ApiError::not_found("gone").to_body()).unwrap();
        assert!(plain.get("trace_id").is_none());

        let traced =
            serde_json::to_value(ApiError::not_found("gone").with_trace_id("t-1").to_body())
                .unwrap();
        assert_eq!(traced["trace_id"], "t-1");
    }

    #[tokio::test]
    async fn renders_envelope_with_status_code() {
        let resp = ApiError::conflict("Duplicate field value: email").into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.status, "fail");
        assert_eq!(body.code, "duplicate_field");
        assert_eq!(body.message, "Duplicate field value: email");
        assert!(body.trace_id.is_none());
    }

    #[tokio::test]
    async fn scoped_request_id_becomes_trace_id() {
        let resp = crate::trace::with_request_id("req-99".to_owned(), async {
            ApiError::bad_request("nope").into_response()
        })
        .await;

        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.trace_id.as_deref(), Some("req-99"));
    }
}
