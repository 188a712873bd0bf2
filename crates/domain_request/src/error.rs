//! Request domain errors

use thiserror::Error;

use core_kernel::RequestId;

use crate::ports::StoreError;
use crate::status::RequestStatus;

/// Errors produced by the request lifecycle.
///
/// Validation, duplicate, and conflict errors are all detected before any
/// mutation; dependent-service failures (rendering, notification) never
/// surface here - they are logged at the call site after the transition
/// has committed.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("A request for this submitter already exists")]
    DuplicateSubmitter {
        existing_id: RequestId,
        status: RequestStatus,
    },

    #[error("Request already in terminal state: {current}")]
    AlreadyDecided { current: RequestStatus },

    #[error("Request not found: {0}")]
    NotFound(RequestId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl RequestError {
    pub fn validation(message: impl Into<String>) -> Self {
        RequestError::Validation(message.into())
    }

    /// Returns true when the error is caller-correctable (4xx-class).
    pub fn is_client_error(&self) -> bool {
        !matches!(self, RequestError::Store(_))
    }
}
