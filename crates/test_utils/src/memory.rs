//! In-memory request store
//!
//! Implements the `RequestStore` port over a mutex-guarded map with the
//! same observable contracts as the PostgreSQL adapter: the insert is the
//! duplicate authority, transitions only apply while the row is still
//! pending, and the decision record lands together with the transition.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use core_kernel::RequestId;
use domain_request::{
    ApprovalUpdate, DecisionAction, DecisionRecord, InsertOutcome, InsuranceRequest, NewRequest,
    PaymentStatus, RejectionUpdate, RequestFilter, RequestPage, RequestStatus, RequestStore,
    StoreError, TransitionOutcome,
};

#[derive(Default)]
struct Inner {
    requests: HashMap<RequestId, InsuranceRequest>,
    decisions: Vec<DecisionRecord>,
}

/// Mutex-guarded in-memory implementation of [`RequestStore`].
#[derive(Default)]
pub struct InMemoryRequestStore {
    inner: Mutex<Inner>,
}

impl InMemoryRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored requests; used to assert that duplicate
    /// submissions never create a second row.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl RequestStore for InMemoryRequestStore {
    async fn insert_pending(&self, new_request: NewRequest) -> Result<InsertOutcome, StoreError> {
        let mut inner = self.inner.lock().unwrap();

        if let Some(existing) = inner
            .requests
            .values()
            .find(|r| r.submitter_phone == new_request.submitter_phone)
        {
            return Ok(InsertOutcome::Duplicate {
                existing_id: existing.id,
                status: existing.status,
            });
        }

        let request = InsuranceRequest::pending(new_request);
        inner.requests.insert(request.id, request.clone());
        Ok(InsertOutcome::Created(request))
    }

    async fn find(&self, id: RequestId) -> Result<Option<InsuranceRequest>, StoreError> {
        Ok(self.inner.lock().unwrap().requests.get(&id).cloned())
    }

    async fn find_by_submitter(
        &self,
        phone: &str,
    ) -> Result<Option<InsuranceRequest>, StoreError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .requests
            .values()
            .find(|r| r.submitter_phone == phone)
            .cloned())
    }

    async fn list_pending(&self) -> Result<Vec<InsuranceRequest>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut pending: Vec<_> = inner
            .requests
            .values()
            .filter(|r| r.status == RequestStatus::PendingVerification)
            .cloned()
            .collect();
        pending.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(pending)
    }

    async fn list(&self, filter: RequestFilter) -> Result<RequestPage, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut matching: Vec<_> = inner
            .requests
            .values()
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let total = matching.len() as i64;
        let items = matching
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect();

        Ok(RequestPage { items, total })
    }

    async fn approve_pending(
        &self,
        id: RequestId,
        update: ApprovalUpdate,
    ) -> Result<TransitionOutcome, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let request = inner
            .requests
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        if request.status != RequestStatus::PendingVerification {
            return Ok(TransitionOutcome::AlreadyDecided {
                current: request.status,
            });
        }

        request.status = RequestStatus::Approved;
        request.invoice_number = Some(update.invoice_number);
        request.premium_amount = Some(update.premium_amount);
        request.payment_link = Some(update.payment_link);
        request.payment_status = Some(PaymentStatus::Pending);
        request.updated_at = Utc::now();
        let approved = request.clone();

        inner.decisions.push(DecisionRecord {
            id: Uuid::new_v4(),
            request_id: id,
            action: DecisionAction::Approved,
            note: update.note,
            decided_at: Utc::now(),
        });

        Ok(TransitionOutcome::Applied(approved))
    }

    async fn reject_pending(
        &self,
        id: RequestId,
        update: RejectionUpdate,
    ) -> Result<TransitionOutcome, StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let request = inner
            .requests
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;

        if request.status != RequestStatus::PendingVerification {
            return Ok(TransitionOutcome::AlreadyDecided {
                current: request.status,
            });
        }

        request.status = RequestStatus::Rejected;
        request.rejection_reason = Some(update.reason.clone());
        request.updated_at = Utc::now();
        let rejected = request.clone();

        inner.decisions.push(DecisionRecord {
            id: Uuid::new_v4(),
            request_id: id,
            action: DecisionAction::Rejected,
            note: Some(update.reason),
            decided_at: Utc::now(),
        });

        Ok(TransitionOutcome::Applied(rejected))
    }

    async fn attach_invoice_document(
        &self,
        id: RequestId,
        location: &str,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let request = inner
            .requests
            .get_mut(&id)
            .ok_or(StoreError::NotFound(id))?;
        request.invoice_document = Some(location.to_string());
        request.updated_at = Utc::now();
        Ok(())
    }

    async fn decisions(&self, id: RequestId) -> Result<Vec<DecisionRecord>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let mut records: Vec<_> = inner
            .decisions
            .iter()
            .filter(|d| d.request_id == id)
            .cloned()
            .collect();
        records.sort_by(|a, b| a.decided_at.cmp(&b.decided_at));
        Ok(records)
    }
}
