//! Read-side handlers for submitters

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use core_kernel::RequestId;
use domain_request::validation;

use crate::dto::{ApiResponse, Decision, RequestDetail, StatusProjection};
use crate::error::ApiError;
use crate::AppState;

/// Full record with its decision history. 404 if absent.
pub async fn get_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RequestDetail>>, ApiError> {
    let id = RequestId::from(id);

    let request = state
        .store
        .find(id)
        .await
        .map_err(|e| state.internal(e))?
        .ok_or_else(|| ApiError::NotFound(format!("Request {id} not found")))?;

    let decisions = state
        .store
        .decisions(id)
        .await
        .map_err(|e| state.internal(e))?
        .into_iter()
        .map(Decision::from)
        .collect();

    Ok(Json(ApiResponse::ok(RequestDetail { request, decisions })))
}

/// Status projection keyed by submitter phone - no audit fields. 404 if
/// the submitter has no request.
pub async fn get_status(
    State(state): State<AppState>,
    Path(submitter_id): Path<String>,
) -> Result<Json<ApiResponse<StatusProjection>>, ApiError> {
    let phone = validation::normalize_phone(&submitter_id)
        .map_err(|e| state.map_request_error(e))?;

    let request = state
        .store
        .find_by_submitter(&phone)
        .await
        .map_err(|e| state.internal(e))?
        .ok_or_else(|| ApiError::NotFound(format!("No request for submitter {phone}")))?;

    Ok(Json(ApiResponse::ok(StatusProjection::from(&request))))
}
