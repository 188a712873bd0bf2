//! Lifecycle orchestration
//!
//! [`LifecycleService`] drives the three operations of the state machine
//! against the ports: submit, approve, reject. The store performs every
//! race-sensitive step atomically; this service maps outcomes to domain
//! errors and runs the non-fatal side effects (invoice rendering,
//! notification) as independent tasks after the transition has committed.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::warn;

use core_kernel::RequestId;

use crate::error::RequestError;
use crate::ports::{
    ApprovalNotice, ApprovalUpdate, InsertOutcome, InvoiceRenderer, Notifier, RejectionNotice,
    RejectionUpdate, RequestStore, TransitionOutcome,
};
use crate::request::{generate_invoice_number, InsuranceRequest, NewRequest};
use crate::{premium, validation};

/// A validated-but-unnormalized submission from the webhook handler.
///
/// Wire-format quirks (consent truthiness, epoch units) are already
/// resolved by the interface layer; phone normalization and the domain
/// invariants are enforced here.
#[derive(Debug, Clone)]
pub struct SubmitCommand {
    pub phone: String,
    pub submitted_at: DateTime<Utc>,
    pub item_name: String,
    pub quantity: u32,
    pub rate: Option<Decimal>,
    pub consignor: Option<String>,
    pub consignee: Option<String>,
    pub vehicle_number: Option<String>,
    pub image_url: Option<String>,
    pub consent: bool,
}

/// Orchestrates the request lifecycle over the store, renderer, and
/// notifier ports.
#[derive(Clone)]
pub struct LifecycleService {
    store: Arc<dyn RequestStore>,
    renderer: Arc<dyn InvoiceRenderer>,
    notifier: Arc<dyn Notifier>,
    /// Base URL the placeholder payment link is built from
    payment_link_base: String,
}

impl LifecycleService {
    pub fn new(
        store: Arc<dyn RequestStore>,
        renderer: Arc<dyn InvoiceRenderer>,
        notifier: Arc<dyn Notifier>,
        payment_link_base: impl Into<String>,
    ) -> Self {
        Self {
            store,
            renderer,
            notifier,
            payment_link_base: payment_link_base.into(),
        }
    }

    /// Submits a new request.
    ///
    /// Consent must be granted and the quantity positive; the premium is
    /// computed provisionally and the row inserted atomically. A duplicate
    /// submitter yields [`RequestError::DuplicateSubmitter`] carrying the
    /// existing record's identity and state - no second row is ever
    /// created.
    pub async fn submit(&self, command: SubmitCommand) -> Result<InsuranceRequest, RequestError> {
        if !command.consent {
            return Err(RequestError::validation(
                "consent is required to create an insurance request",
            ));
        }
        if command.quantity == 0 {
            return Err(RequestError::validation("quantity must be at least 1"));
        }
        if let Some(rate) = command.rate {
            if rate.is_sign_negative() {
                return Err(RequestError::validation("rate must not be negative"));
            }
        }
        let item_name = command.item_name.trim().to_string();
        if item_name.is_empty() {
            return Err(RequestError::validation("item name must not be empty"));
        }

        let phone = validation::normalize_phone(&command.phone)?;
        let premium_amount = premium::compute_premium(command.quantity, command.rate);

        let new_request = NewRequest {
            id: RequestId::new_v7(),
            submitter_phone: phone,
            submitted_at: command.submitted_at,
            item_name,
            quantity: command.quantity,
            rate: command.rate,
            consignor: command.consignor,
            consignee: command.consignee,
            vehicle_number: command.vehicle_number,
            image_url: command.image_url,
            premium_amount,
        };

        match self.store.insert_pending(new_request).await? {
            InsertOutcome::Created(request) => Ok(request),
            InsertOutcome::Duplicate {
                existing_id,
                status,
            } => Err(RequestError::DuplicateSubmitter {
                existing_id,
                status,
            }),
        }
    }

    /// Approves a pending request.
    ///
    /// Assigns the invoice number, finalizes the premium (reusing the
    /// stored provisional value when present), and commits the transition
    /// conditionally - a racing decision loses and reports the conflict.
    /// Rendering and notification run afterwards as independent tasks;
    /// their failures are logged and never fail the approval.
    pub async fn approve(
        &self,
        id: RequestId,
        note: Option<String>,
    ) -> Result<InsuranceRequest, RequestError> {
        let existing = self
            .store
            .find(id)
            .await?
            .ok_or(RequestError::NotFound(id))?;

        let premium_amount =
            premium::finalize_premium(existing.premium_amount, existing.quantity, existing.rate);
        let invoice_number = generate_invoice_number();
        let payment_link = format!("{}/pay/{}", self.payment_link_base, invoice_number);

        let update = ApprovalUpdate {
            invoice_number,
            premium_amount,
            payment_link,
            note,
        };

        match self.store.approve_pending(id, update).await? {
            TransitionOutcome::Applied(approved) => {
                self.spawn_approval_side_effects(approved.clone());
                Ok(approved)
            }
            TransitionOutcome::AlreadyDecided { current } => {
                Err(RequestError::AlreadyDecided { current })
            }
        }
    }

    /// Rejects a pending request.
    ///
    /// The reason length is validated before any store access. The
    /// notification is fire-and-forget: the rejection stays committed
    /// even when it fails.
    pub async fn reject(
        &self,
        id: RequestId,
        reason: &str,
    ) -> Result<InsuranceRequest, RequestError> {
        let reason = validation::validate_rejection_reason(reason)?;

        if self.store.find(id).await?.is_none() {
            return Err(RequestError::NotFound(id));
        }

        let update = RejectionUpdate { reason };
        match self.store.reject_pending(id, update).await? {
            TransitionOutcome::Applied(rejected) => {
                self.spawn_rejection_side_effects(rejected.clone());
                Ok(rejected)
            }
            TransitionOutcome::AlreadyDecided { current } => {
                Err(RequestError::AlreadyDecided { current })
            }
        }
    }

    fn spawn_approval_side_effects(&self, approved: InsuranceRequest) {
        let service = self.clone();
        let for_render = approved.clone();
        tokio::spawn(async move {
            service.render_and_attach(&for_render).await;
        });

        let service = self.clone();
        tokio::spawn(async move {
            service.notify_approval(&approved).await;
        });
    }

    fn spawn_rejection_side_effects(&self, rejected: InsuranceRequest) {
        let service = self.clone();
        tokio::spawn(async move {
            service.notify_rejection(&rejected).await;
        });
    }

    /// Renders the invoice for an approved request and attaches its
    /// location. Failures are logged, never propagated.
    pub async fn render_and_attach(&self, approved: &InsuranceRequest) {
        let invoice_number = approved.invoice_number.clone().unwrap_or_default();
        let premium_amount = approved.premium_amount.unwrap_or_default();

        match self
            .renderer
            .render(approved, &invoice_number, premium_amount)
            .await
        {
            Ok(document) => {
                if let Err(e) = self
                    .store
                    .attach_invoice_document(approved.id, &document.location)
                    .await
                {
                    warn!(
                        request_id = %approved.id,
                        invoice_number = %invoice_number,
                        error = %e,
                        "failed to attach rendered invoice document"
                    );
                }
            }
            Err(e) => {
                warn!(
                    request_id = %approved.id,
                    invoice_number = %invoice_number,
                    error = %e,
                    "invoice rendering failed"
                );
            }
        }
    }

    /// Sends the approval notification. Failures are logged, never
    /// propagated.
    pub async fn notify_approval(&self, approved: &InsuranceRequest) {
        let notice = ApprovalNotice {
            phone: approved.submitter_phone.clone(),
            item_name: approved.item_name.clone(),
            invoice_number: approved.invoice_number.clone().unwrap_or_default(),
            premium: approved.premium_amount.unwrap_or_default(),
            payment_link: approved.payment_link.clone().unwrap_or_default(),
        };

        if let Err(e) = self.notifier.send_approval(&notice).await {
            warn!(
                request_id = %approved.id,
                phone = %approved.submitter_phone,
                error = %e,
                "approval notification failed"
            );
        }
    }

    /// Sends the rejection notification. Failures are logged, never
    /// propagated.
    pub async fn notify_rejection(&self, rejected: &InsuranceRequest) {
        let notice = RejectionNotice {
            phone: rejected.submitter_phone.clone(),
            item_name: rejected.item_name.clone(),
            reason: rejected.rejection_reason.clone().unwrap_or_default(),
        };

        if let Err(e) = self.notifier.send_rejection(&notice).await {
            warn!(
                request_id = %rejected.id,
                phone = %rejected.submitter_phone,
                error = %e,
                "rejection notification failed"
            );
        }
    }
}
