//! Error-to-HTTP response conversion.
//!
//! Wraps [`sg_core::Error`] so route handlers can return
//! `Result<T, AppError>` and get the gallery's `{success: false, error}`
//! body with the matching status code.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// JSON body of every failed API call.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Always `false`.
    pub success: bool,
    pub error: String,
    pub code: String,
    pub request_id: Option<String>,
}

/// Wrapper so we can implement `IntoResponse` for an external type.
pub struct AppError {
    inner: sg_core::Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: sg_core::Error) -> Self {
        Self {
            inner,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, id: impl Into<String>) -> Self {
        self.request_id = Some(id.into());
        self
    }

    pub fn inner(&self) -> &sg_core::Error {
        &self.inner
    }
}

impl From<sg_core::Error> for AppError {
    fn from(e: sg_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let body = ErrorBody {
            success: false,
            error: self.inner.to_string(),
            code: self.inner.code().to_string(),
            request_id: self.request_id,
        };

        (status, axum::Json(body)).into_response()
    }
}
