//! Request/Response DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use domain_request::{
    DecisionAction, DecisionRecord, InsuranceRequest, PaymentStatus, RequestStatus,
};

/// Webhook submission payload.
///
/// `timestamp` and `consent` stay loosely typed: the messaging source
/// sends booleans or strings for consent and ISO strings or epoch
/// numbers for the timestamp.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequestDto {
    pub phone: String,
    #[serde(default)]
    pub timestamp: Option<serde_json::Value>,
    #[validate(length(min = 1, message = "item name must not be empty"))]
    pub item_name: String,
    pub quantity: u32,
    #[serde(default)]
    pub rate: Option<Decimal>,
    #[serde(default)]
    pub consignor: Option<String>,
    #[serde(default)]
    pub consignee: Option<String>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub consent: Option<serde_json::Value>,
}

/// Optional admin note accompanying an approval.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveRequestDto {
    #[serde(default)]
    pub note: Option<String>,
}

/// Required reason accompanying a rejection.
#[derive(Debug, Deserialize, Validate)]
pub struct RejectRequestDto {
    #[validate(length(min = 10, max = 500, message = "reason must be 10-500 characters"))]
    pub reason: String,
}

/// Admin listing query.
#[derive(Debug, Default, Deserialize)]
pub struct ListRequestsQuery {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub limit: Option<i64>,
    #[serde(default)]
    pub offset: Option<i64>,
}

/// Success envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Paginated listing envelope.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub success: bool,
    pub data: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Summary shown on creation and in admin listings.
#[derive(Debug, Serialize)]
pub struct RequestSummary {
    pub request_id: Uuid,
    pub submitter_phone: String,
    pub item_name: String,
    pub quantity: u32,
    pub rate: Option<Decimal>,
    pub status: RequestStatus,
    pub premium_amount: Option<Decimal>,
    pub submitted_at: DateTime<Utc>,
}

impl From<&InsuranceRequest> for RequestSummary {
    fn from(request: &InsuranceRequest) -> Self {
        Self {
            request_id: *request.id.as_uuid(),
            submitter_phone: request.submitter_phone.clone(),
            item_name: request.item_name.clone(),
            quantity: request.quantity,
            rate: request.rate,
            status: request.status,
            premium_amount: request.premium_amount,
            submitted_at: request.submitted_at,
        }
    }
}

/// Full record with decision history.
#[derive(Debug, Serialize)]
pub struct RequestDetail {
    #[serde(flatten)]
    pub request: InsuranceRequest,
    pub decisions: Vec<Decision>,
}

/// One decision history entry.
#[derive(Debug, Serialize)]
pub struct Decision {
    pub action: DecisionAction,
    pub note: Option<String>,
    pub decided_at: DateTime<Utc>,
}

impl From<DecisionRecord> for Decision {
    fn from(record: DecisionRecord) -> Self {
        Self {
            action: record.action,
            note: record.note,
            decided_at: record.decided_at,
        }
    }
}

/// Status projection for submitters - no internal audit fields.
#[derive(Debug, Serialize)]
pub struct StatusProjection {
    pub request_id: Uuid,
    pub status: RequestStatus,
    pub item_name: String,
    pub premium_amount: Option<Decimal>,
    pub invoice_number: Option<String>,
    pub payment_link: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub rejection_reason: Option<String>,
    pub invoice_document: Option<String>,
}

impl From<&InsuranceRequest> for StatusProjection {
    fn from(request: &InsuranceRequest) -> Self {
        Self {
            request_id: *request.id.as_uuid(),
            status: request.status,
            item_name: request.item_name.clone(),
            premium_amount: request.premium_amount,
            invoice_number: request.invoice_number.clone(),
            payment_link: request.payment_link.clone(),
            payment_status: request.payment_status,
            rejection_reason: request.rejection_reason.clone(),
            invoice_document: request.invoice_document.clone(),
        }
    }
}

/// Decision outcome returned by the admin endpoints.
#[derive(Debug, Serialize)]
pub struct DecisionOutcome {
    pub request_id: Uuid,
    pub status: RequestStatus,
    pub invoice_number: Option<String>,
    pub premium_amount: Option<Decimal>,
    pub payment_link: Option<String>,
    pub payment_status: Option<PaymentStatus>,
    pub rejection_reason: Option<String>,
}

impl From<&InsuranceRequest> for DecisionOutcome {
    fn from(request: &InsuranceRequest) -> Self {
        Self {
            request_id: *request.id.as_uuid(),
            status: request.status,
            invoice_number: request.invoice_number.clone(),
            premium_amount: request.premium_amount,
            payment_link: request.payment_link.clone(),
            payment_status: request.payment_status,
            rejection_reason: request.rejection_reason.clone(),
        }
    }
}
