//! Ports the infrastructure adapters implement
//!
//! The domain defines the traits; `infra_db`, `infra_notify`, and
//! `infra_pdf` provide the production adapters, and `test_utils` provides
//! in-memory implementations. The store trait deliberately exposes
//! *outcome* enums for the two race-sensitive operations: the atomic
//! insert and the conditional status updates are the only authority on
//! duplicates and transition preconditions, so their results distinguish
//! "applied" from "lost the race" without a separate read.

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use core_kernel::RequestId;

use crate::request::{DecisionRecord, InsuranceRequest, NewRequest};
use crate::status::RequestStatus;

/// Errors from the persistent store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request not found: {0}")]
    NotFound(RequestId),

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn backend(message: impl Into<String>) -> Self {
        StoreError::Backend(message.into())
    }
}

/// Result of the atomic pending-insert.
#[derive(Debug, Clone)]
pub enum InsertOutcome {
    /// A new row was created
    Created(InsuranceRequest),
    /// The unique submitter constraint fired; nothing was written
    Duplicate {
        existing_id: RequestId,
        status: RequestStatus,
    },
}

/// Result of a conditional status transition.
#[derive(Debug, Clone)]
pub enum TransitionOutcome {
    /// The row was still pending and the transition committed
    Applied(InsuranceRequest),
    /// The row had already reached a terminal state; nothing was written
    AlreadyDecided { current: RequestStatus },
}

/// Fields written by an approval transition.
#[derive(Debug, Clone)]
pub struct ApprovalUpdate {
    pub invoice_number: String,
    pub premium_amount: Decimal,
    pub payment_link: String,
    /// Optional admin note, recorded in the decision history
    pub note: Option<String>,
}

/// Fields written by a rejection transition.
#[derive(Debug, Clone)]
pub struct RejectionUpdate {
    /// Validated reason (length bounds already enforced)
    pub reason: String,
}

/// Listing filter for the admin console.
#[derive(Debug, Clone, Default)]
pub struct RequestFilter {
    pub status: Option<RequestStatus>,
    pub limit: i64,
    pub offset: i64,
}

/// One page of a filtered listing plus the unpaginated total.
#[derive(Debug, Clone)]
pub struct RequestPage {
    pub items: Vec<InsuranceRequest>,
    pub total: i64,
}

/// Persistent store for insurance requests.
///
/// Implementations must enforce submitter uniqueness and transition
/// preconditions atomically: `insert_pending` is a unique-constraint
/// insert, and the transition methods only apply while the stored status
/// is still `PENDING_VERIFICATION`, writing the decision record in the
/// same transaction.
#[async_trait]
pub trait RequestStore: Send + Sync {
    async fn insert_pending(&self, new_request: NewRequest) -> Result<InsertOutcome, StoreError>;

    async fn find(&self, id: RequestId) -> Result<Option<InsuranceRequest>, StoreError>;

    async fn find_by_submitter(
        &self,
        phone: &str,
    ) -> Result<Option<InsuranceRequest>, StoreError>;

    /// All pending requests, newest first.
    async fn list_pending(&self) -> Result<Vec<InsuranceRequest>, StoreError>;

    async fn list(&self, filter: RequestFilter) -> Result<RequestPage, StoreError>;

    async fn approve_pending(
        &self,
        id: RequestId,
        update: ApprovalUpdate,
    ) -> Result<TransitionOutcome, StoreError>;

    async fn reject_pending(
        &self,
        id: RequestId,
        update: RejectionUpdate,
    ) -> Result<TransitionOutcome, StoreError>;

    /// Post-approval enrichment: records where the rendered invoice lives.
    async fn attach_invoice_document(
        &self,
        id: RequestId,
        location: &str,
    ) -> Result<(), StoreError>;

    /// Decision history, oldest first.
    async fn decisions(&self, id: RequestId) -> Result<Vec<DecisionRecord>, StoreError>;
}

/// Errors from the outbound messaging channel.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("messaging transport error: {0}")]
    Transport(String),

    #[error("messaging endpoint returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// Content of an approval notification.
#[derive(Debug, Clone)]
pub struct ApprovalNotice {
    pub phone: String,
    pub item_name: String,
    pub invoice_number: String,
    pub premium: Decimal,
    pub payment_link: String,
}

/// Content of a rejection notification.
#[derive(Debug, Clone)]
pub struct RejectionNotice {
    pub phone: String,
    pub item_name: String,
    pub reason: String,
}

/// Outbound messaging port.
///
/// Failures are returned to the caller, who treats them as non-fatal:
/// both approval and rejection notifications are fire-and-forget.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_approval(&self, notice: &ApprovalNotice) -> Result<(), NotifyError>;

    async fn send_rejection(&self, notice: &RejectionNotice) -> Result<(), NotifyError>;
}

/// Errors from invoice rendering, distinct from approval failure.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to compose invoice document: {0}")]
    Compose(String),

    #[error("failed to persist invoice document: {0}")]
    Persist(String),
}

/// A rendered invoice document.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// File name under the invoice directory (`<invoice_number>.pdf`)
    pub file_name: String,
    /// Public URL the document is served at
    pub location: String,
}

/// Invoice rendering port.
///
/// Receives the approved request snapshot plus the assigned invoice
/// number and finalized premium. A missing or unreachable image must
/// degrade to a placeholder, never fail the render.
#[async_trait]
pub trait InvoiceRenderer: Send + Sync {
    async fn render(
        &self,
        request: &InsuranceRequest,
        invoice_number: &str,
        premium: Decimal,
    ) -> Result<RenderedDocument, RenderError>;
}
