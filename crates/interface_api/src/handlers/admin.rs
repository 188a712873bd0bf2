//! Admin console handlers

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::RequestId;
use domain_request::{RequestFilter, RequestStatus};

use crate::dto::{
    ApiResponse, ApproveRequestDto, DecisionOutcome, ListRequestsQuery, ListResponse,
    RejectRequestDto, RequestSummary,
};
use crate::error::ApiError;
use crate::AppState;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// All requests awaiting verification, newest first.
pub async fn list_pending(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<RequestSummary>>>, ApiError> {
    let pending = state
        .store
        .list_pending()
        .await
        .map_err(|e| state.internal(e))?;

    let summaries = pending.iter().map(RequestSummary::from).collect();
    Ok(Json(ApiResponse::ok(summaries)))
}

/// Filtered, paginated listing with the unpaginated total.
pub async fn list_requests(
    State(state): State<AppState>,
    Query(query): Query<ListRequestsQuery>,
) -> Result<Json<ListResponse<RequestSummary>>, ApiError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.parse::<RequestStatus>()
                .map_err(ApiError::Validation)?,
        ),
        None => None,
    };

    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let page = state
        .store
        .list(RequestFilter {
            status,
            limit,
            offset,
        })
        .await
        .map_err(|e| state.internal(e))?;

    Ok(Json(ListResponse {
        success: true,
        data: page.items.iter().map(RequestSummary::from).collect(),
        total: page.total,
        limit,
        offset,
    }))
}

/// Approves a pending request.
///
/// 200 with the decision outcome, 400 when already decided, 404 when
/// unknown. Rendering and notification run afterwards and never affect
/// this response.
pub async fn approve_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    body: Option<Json<ApproveRequestDto>>,
) -> Result<Json<ApiResponse<DecisionOutcome>>, ApiError> {
    let note = body.and_then(|Json(dto)| dto.note);

    let approved = state
        .lifecycle
        .approve(RequestId::from(id), note)
        .await
        .map_err(|e| state.map_request_error(e))?;

    Ok(Json(ApiResponse::ok(DecisionOutcome::from(&approved))))
}

/// Rejects a pending request; the reason is mandatory.
pub async fn reject_request(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(raw): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<DecisionOutcome>>, ApiError> {
    let body: RejectRequestDto = serde_json::from_value(raw)
        .map_err(|e| ApiError::Validation(format!("invalid request body: {e}")))?;
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let rejected = state
        .lifecycle
        .reject(RequestId::from(id), &body.reason)
        .await
        .map_err(|e| state.map_request_error(e))?;

    Ok(Json(ApiResponse::ok(DecisionOutcome::from(&rejected))))
}
