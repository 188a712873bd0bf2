//! Request domain - the insurance-request lifecycle
//!
//! This crate holds everything with design substance in the system:
//! - The [`InsuranceRequest`] entity and its two-edge lifecycle state
//!   machine (`PENDING_VERIFICATION` -> `APPROVED` | `REJECTED`)
//! - The premium calculator (0.2% of quantity x rate, capped)
//! - Input normalization for webhook payloads (phone, consent, timestamp)
//! - The port traits the infrastructure adapters implement
//!   ([`RequestStore`], [`Notifier`], [`InvoiceRenderer`])
//! - The [`LifecycleService`] orchestrating submit/approve/reject
//!
//! Duplicate detection and transition preconditions are enforced by the
//! store's atomic operations, not by read-then-write checks here; the
//! service treats the store outcome as the single source of truth.

pub mod error;
pub mod lifecycle;
pub mod ports;
pub mod premium;
pub mod request;
pub mod status;
pub mod validation;

pub use error::RequestError;
pub use lifecycle::{LifecycleService, SubmitCommand};
pub use ports::{
    ApprovalNotice, ApprovalUpdate, InsertOutcome, InvoiceRenderer, NotifyError, Notifier,
    RejectionNotice, RejectionUpdate, RenderError, RenderedDocument, RequestFilter, RequestPage,
    RequestStore, StoreError, TransitionOutcome,
};
pub use request::{
    generate_invoice_number, DecisionAction, DecisionRecord, InsuranceRequest, NewRequest,
    PaymentStatus,
};
pub use status::RequestStatus;
