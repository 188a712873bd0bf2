//! API error handling
//!
//! Every error response carries a `success: false` flag and a
//! human-readable message. Duplicate conflicts include the existing
//! record's identity as structured data. Diagnostic detail on internal
//! errors is included only outside production mode.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use core_kernel::RequestId;
use domain_request::RequestStatus;

/// API error types
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("A request for this submitter already exists")]
    DuplicateSubmitter {
        existing_id: RequestId,
        status: RequestStatus,
    },

    #[error("Request already in terminal state: {current}")]
    AlreadyDecided { current: RequestStatus },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error")]
    Internal { detail: Option<String> },
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, data, detail) = match self {
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, None, None),
            ApiError::DuplicateSubmitter {
                existing_id,
                status,
            } => (
                StatusCode::CONFLICT,
                Some(json!({
                    "request_id": existing_id.as_uuid(),
                    "status": status,
                })),
                None,
            ),
            ApiError::AlreadyDecided { current } => (
                StatusCode::BAD_REQUEST,
                Some(json!({ "status": current })),
                None,
            ),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, None, None),
            ApiError::Internal { detail } => (StatusCode::INTERNAL_SERVER_ERROR, None, detail),
        };

        let body = ErrorResponse {
            success: false,
            message,
            data,
            detail,
        };

        (status, Json(body)).into_response()
    }
}
