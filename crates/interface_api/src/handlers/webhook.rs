//! Webhook intake handler

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use validator::Validate;

use domain_request::{validation, SubmitCommand};

use crate::dto::{ApiResponse, RequestSummary, SubmitRequestDto};
use crate::error::ApiError;
use crate::AppState;

/// Accepts an insurance-request submission from the messaging webhook.
///
/// Responses: 201 with the created summary, 400 on missing/invalid
/// fields or withheld consent, 409 when the submitter already has a
/// request.
pub async fn submit_request(
    State(state): State<AppState>,
    Json(raw): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<ApiResponse<RequestSummary>>), ApiError> {
    let body: SubmitRequestDto = serde_json::from_value(raw)
        .map_err(|e| ApiError::Validation(format!("invalid request body: {e}")))?;
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let consent = validation::parse_consent(body.consent.as_ref());
    let submitted_at = validation::parse_submitted_at(body.timestamp.as_ref(), Utc::now())
        .map_err(|e| state.map_request_error(e))?;

    let command = SubmitCommand {
        phone: body.phone,
        submitted_at,
        item_name: body.item_name,
        quantity: body.quantity,
        rate: body.rate,
        consignor: body.consignor,
        consignee: body.consignee,
        vehicle_number: body.vehicle_number,
        image_url: body.image_url,
        consent,
    };

    let created = state
        .lifecycle
        .submit(command)
        .await
        .map_err(|e| state.map_request_error(e))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(RequestSummary::from(&created))),
    ))
}
