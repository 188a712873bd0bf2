//! The insurance request aggregate

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::RequestId;

use crate::status::RequestStatus;

/// Payment state of an approved request.
///
/// Payment processing itself is out of scope; approval records the
/// placeholder link and parks the payment in `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// An insurance request submitted through the messaging webhook.
///
/// One active request per submitter: `submitter_phone` is unique across
/// all rows, enforced by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceRequest {
    /// Unique identifier
    pub id: RequestId,
    /// Digits-only normalized submitter phone number
    pub submitter_phone: String,
    /// When the submitter sent the request (webhook-supplied)
    pub submitted_at: DateTime<Utc>,
    /// Insured item description
    pub item_name: String,
    /// Quantity (>= 1)
    pub quantity: u32,
    /// Unit rate; premium treats a missing rate as zero
    pub rate: Option<Decimal>,
    /// Dispatching party
    pub consignor: Option<String>,
    /// Receiving party
    pub consignee: Option<String>,
    /// Carrying vehicle registration
    pub vehicle_number: Option<String>,
    /// Remote consignment image to embed in the invoice
    pub image_url: Option<String>,
    /// Submitter consent; always true for persisted rows
    pub consent: bool,
    /// Lifecycle state
    pub status: RequestStatus,
    /// Capped premium; provisional until approval finalizes it
    pub premium_amount: Option<Decimal>,
    /// Assigned at approval, keys the rendered document
    pub invoice_number: Option<String>,
    /// Placeholder payment link assigned at approval
    pub payment_link: Option<String>,
    /// Set to `Pending` at approval
    pub payment_status: Option<PaymentStatus>,
    /// Set only when rejected
    pub rejection_reason: Option<String>,
    /// Public location of the rendered invoice document
    pub invoice_document: Option<String>,
    /// Created timestamp
    pub created_at: DateTime<Utc>,
    /// Updated timestamp
    pub updated_at: DateTime<Utc>,
}

impl InsuranceRequest {
    /// Builds the pending request a validated submission persists as.
    pub fn pending(new_request: NewRequest) -> Self {
        let now = Utc::now();
        Self {
            id: new_request.id,
            submitter_phone: new_request.submitter_phone,
            submitted_at: new_request.submitted_at,
            item_name: new_request.item_name,
            quantity: new_request.quantity,
            rate: new_request.rate,
            consignor: new_request.consignor,
            consignee: new_request.consignee,
            vehicle_number: new_request.vehicle_number,
            image_url: new_request.image_url,
            consent: true,
            status: RequestStatus::PendingVerification,
            premium_amount: Some(new_request.premium_amount),
            invoice_number: None,
            payment_link: None,
            payment_status: None,
            rejection_reason: None,
            invoice_document: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Validated data for persisting a new pending request.
#[derive(Debug, Clone)]
pub struct NewRequest {
    pub id: RequestId,
    pub submitter_phone: String,
    pub submitted_at: DateTime<Utc>,
    pub item_name: String,
    pub quantity: u32,
    pub rate: Option<Decimal>,
    pub consignor: Option<String>,
    pub consignee: Option<String>,
    pub vehicle_number: Option<String>,
    pub image_url: Option<String>,
    /// Provisional premium computed at validation time
    pub premium_amount: Decimal,
}

/// What an admin decided about a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DecisionAction {
    Approved,
    Rejected,
}

/// One admin decision, recorded in the same transaction as the status
/// transition it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecord {
    pub id: Uuid,
    pub request_id: RequestId,
    pub action: DecisionAction,
    /// Admin note on approval, rejection reason on rejection
    pub note: Option<String>,
    pub decided_at: DateTime<Utc>,
}

/// Generates a unique invoice number.
///
/// Epoch milliseconds plus a random hex suffix, so two approvals landing
/// in the same millisecond on different workers still get distinct
/// numbers. The number doubles as the document file stem.
pub fn generate_invoice_number() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("INV-{}-{:04X}", duration.as_millis(), rand::random::<u16>())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_new_request() -> NewRequest {
        NewRequest {
            id: RequestId::new_v7(),
            submitter_phone: "919876543210".to_string(),
            submitted_at: Utc::now(),
            item_name: "Tender Coconut".to_string(),
            quantity: 45,
            rate: Some(dec!(98.50)),
            consignor: None,
            consignee: None,
            vehicle_number: Some("KA01AB1234".to_string()),
            image_url: None,
            premium_amount: dec!(8.87),
        }
    }

    #[test]
    fn pending_request_starts_in_initial_state() {
        let request = InsuranceRequest::pending(sample_new_request());

        assert_eq!(request.status, RequestStatus::PendingVerification);
        assert_eq!(request.premium_amount, Some(dec!(8.87)));
        assert!(request.consent);
        assert!(request.invoice_number.is_none());
        assert!(request.payment_status.is_none());
        assert!(request.rejection_reason.is_none());
    }

    #[test]
    fn invoice_numbers_are_distinct_and_prefixed() {
        let first = generate_invoice_number();
        let second = generate_invoice_number();

        assert!(first.starts_with("INV-"));
        assert!(second.starts_with("INV-"));
        assert_ne!(first, second);
    }
}
