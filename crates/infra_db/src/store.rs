//! PostgreSQL request store
//!
//! Implements the `RequestStore` port. The two race-sensitive operations
//! lean on the database for atomicity: submissions are unique-constraint
//! inserts, decisions are conditional updates, and the decision record is
//! written in the same transaction as the transition it belongs to.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use core_kernel::RequestId;
use domain_request::{
    ApprovalUpdate, DecisionAction, DecisionRecord, InsertOutcome, InsuranceRequest, NewRequest,
    PaymentStatus, RejectionUpdate, RequestFilter, RequestPage, RequestStatus, RequestStore,
    StoreError, TransitionOutcome,
};

use crate::error::DatabaseError;

const SELECT_REQUEST: &str = "SELECT * FROM insurance_requests";

/// PostgreSQL-backed implementation of the `RequestStore` port.
#[derive(Debug, Clone)]
pub struct PgRequestStore {
    pool: PgPool,
}

impl PgRequestStore {
    /// Creates a new store over the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn current_status(&self, id: RequestId) -> Result<Option<RequestStatus>, StoreError> {
        let status = sqlx::query_scalar::<_, DbRequestStatus>(
            "SELECT status FROM insurance_requests WHERE request_id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(status.map(RequestStatus::from))
    }

    async fn record_decision(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        request_id: RequestId,
        action: DbDecisionAction,
        note: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO request_decisions (decision_id, request_id, action, note, decided_at)
            VALUES ($1, $2, $3, $4, now())
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request_id.as_uuid())
        .bind(action)
        .bind(note)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl RequestStore for PgRequestStore {
    async fn insert_pending(&self, new_request: NewRequest) -> Result<InsertOutcome, StoreError> {
        // The unique index on submitter_phone decides duplicates; a prior
        // existence check would only reintroduce the race.
        let inserted = sqlx::query_as::<_, RequestRow>(
            r#"
            INSERT INTO insurance_requests (
                request_id, submitter_phone, submitted_at, item_name, quantity,
                rate, consignor, consignee, vehicle_number, image_url,
                consent, status, premium_amount
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, TRUE, 'pending_verification', $11)
            ON CONFLICT (submitter_phone) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(new_request.id.as_uuid())
        .bind(&new_request.submitter_phone)
        .bind(new_request.submitted_at)
        .bind(&new_request.item_name)
        .bind(new_request.quantity as i32)
        .bind(new_request.rate)
        .bind(&new_request.consignor)
        .bind(&new_request.consignee)
        .bind(&new_request.vehicle_number)
        .bind(&new_request.image_url)
        .bind(new_request.premium_amount)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        if let Some(row) = inserted {
            debug!(request_id = %new_request.id, "inserted pending request");
            return Ok(InsertOutcome::Created(row.into()));
        }

        let existing = sqlx::query_as::<_, RequestRow>(
            "SELECT * FROM insurance_requests WHERE submitter_phone = $1",
        )
        .bind(&new_request.submitter_phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?
        .ok_or_else(|| {
            StoreError::backend("conflicting request disappeared during duplicate lookup")
        })?;

        Ok(InsertOutcome::Duplicate {
            existing_id: RequestId::from(existing.request_id),
            status: RequestStatus::from(existing.status),
        })
    }

    async fn find(&self, id: RequestId) -> Result<Option<InsuranceRequest>, StoreError> {
        let row = sqlx::query_as::<_, RequestRow>(&format!(
            "{SELECT_REQUEST} WHERE request_id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(row.map(InsuranceRequest::from))
    }

    async fn find_by_submitter(
        &self,
        phone: &str,
    ) -> Result<Option<InsuranceRequest>, StoreError> {
        let row = sqlx::query_as::<_, RequestRow>(&format!(
            "{SELECT_REQUEST} WHERE submitter_phone = $1"
        ))
        .bind(phone)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(row.map(InsuranceRequest::from))
    }

    async fn list_pending(&self) -> Result<Vec<InsuranceRequest>, StoreError> {
        let rows = sqlx::query_as::<_, RequestRow>(&format!(
            "{SELECT_REQUEST} WHERE status = 'pending_verification' ORDER BY submitted_at DESC"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(rows.into_iter().map(InsuranceRequest::from).collect())
    }

    async fn list(&self, filter: RequestFilter) -> Result<RequestPage, StoreError> {
        let limit = filter.limit.max(0);
        let offset = filter.offset.max(0);

        let (rows, total) = match filter.status {
            Some(status) => {
                let db_status = DbRequestStatus::from(status);
                let rows = sqlx::query_as::<_, RequestRow>(&format!(
                    "{SELECT_REQUEST} WHERE status = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3"
                ))
                .bind(db_status)
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(DatabaseError::from)?;

                let total = sqlx::query_scalar::<_, i64>(
                    "SELECT COUNT(*) FROM insurance_requests WHERE status = $1",
                )
                .bind(db_status)
                .fetch_one(&self.pool)
                .await
                .map_err(DatabaseError::from)?;

                (rows, total)
            }
            None => {
                let rows = sqlx::query_as::<_, RequestRow>(&format!(
                    "{SELECT_REQUEST} ORDER BY created_at DESC LIMIT $1 OFFSET $2"
                ))
                .bind(limit)
                .bind(offset)
                .fetch_all(&self.pool)
                .await
                .map_err(DatabaseError::from)?;

                let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM insurance_requests")
                    .fetch_one(&self.pool)
                    .await
                    .map_err(DatabaseError::from)?;

                (rows, total)
            }
        };

        Ok(RequestPage {
            items: rows.into_iter().map(InsuranceRequest::from).collect(),
            total,
        })
    }

    async fn approve_pending(
        &self,
        id: RequestId,
        update: ApprovalUpdate,
    ) -> Result<TransitionOutcome, StoreError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        // Transition only if the stored status still matches the
        // precondition; zero rows updated means a racing decision won.
        let updated = sqlx::query_as::<_, RequestRow>(
            r#"
            UPDATE insurance_requests
            SET status = 'approved',
                invoice_number = $2,
                premium_amount = $3,
                payment_link = $4,
                payment_status = 'pending',
                updated_at = now()
            WHERE request_id = $1 AND status = 'pending_verification'
            RETURNING *
            "#,
        )
        .bind(id.as_uuid())
        .bind(&update.invoice_number)
        .bind(update.premium_amount)
        .bind(&update.payment_link)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        match updated {
            Some(row) => {
                Self::record_decision(&mut tx, id, DbDecisionAction::Approved, update.note.as_deref())
                    .await
                    .map_err(DatabaseError::from)?;
                tx.commit().await.map_err(DatabaseError::from)?;

                debug!(request_id = %id, invoice_number = %update.invoice_number, "request approved");
                Ok(TransitionOutcome::Applied(row.into()))
            }
            None => {
                tx.rollback().await.map_err(DatabaseError::from)?;
                match self.current_status(id).await? {
                    Some(current) => Ok(TransitionOutcome::AlreadyDecided { current }),
                    None => Err(StoreError::NotFound(id)),
                }
            }
        }
    }

    async fn reject_pending(
        &self,
        id: RequestId,
        update: RejectionUpdate,
    ) -> Result<TransitionOutcome, StoreError> {
        let mut tx = self.pool.begin().await.map_err(DatabaseError::from)?;

        let updated = sqlx::query_as::<_, RequestRow>(
            r#"
            UPDATE insurance_requests
            SET status = 'rejected',
                rejection_reason = $2,
                updated_at = now()
            WHERE request_id = $1 AND status = 'pending_verification'
            RETURNING *
            "#,
        )
        .bind(id.as_uuid())
        .bind(&update.reason)
        .fetch_optional(&mut *tx)
        .await
        .map_err(DatabaseError::from)?;

        match updated {
            Some(row) => {
                Self::record_decision(&mut tx, id, DbDecisionAction::Rejected, Some(&update.reason))
                    .await
                    .map_err(DatabaseError::from)?;
                tx.commit().await.map_err(DatabaseError::from)?;

                debug!(request_id = %id, "request rejected");
                Ok(TransitionOutcome::Applied(row.into()))
            }
            None => {
                tx.rollback().await.map_err(DatabaseError::from)?;
                match self.current_status(id).await? {
                    Some(current) => Ok(TransitionOutcome::AlreadyDecided { current }),
                    None => Err(StoreError::NotFound(id)),
                }
            }
        }
    }

    async fn attach_invoice_document(
        &self,
        id: RequestId,
        location: &str,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE insurance_requests
            SET invoice_document = $2, updated_at = now()
            WHERE request_id = $1
            "#,
        )
        .bind(id.as_uuid())
        .bind(location)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn decisions(&self, id: RequestId) -> Result<Vec<DecisionRecord>, StoreError> {
        let rows = sqlx::query_as::<_, DecisionRow>(
            r#"
            SELECT decision_id, request_id, action, note, decided_at
            FROM request_decisions
            WHERE request_id = $1
            ORDER BY decided_at
            "#,
        )
        .bind(id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::from)?;

        Ok(rows.into_iter().map(DecisionRecord::from).collect())
    }
}

/// Request lifecycle state as stored in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
enum DbRequestStatus {
    PendingVerification,
    Approved,
    Rejected,
}

impl From<DbRequestStatus> for RequestStatus {
    fn from(status: DbRequestStatus) -> Self {
        match status {
            DbRequestStatus::PendingVerification => RequestStatus::PendingVerification,
            DbRequestStatus::Approved => RequestStatus::Approved,
            DbRequestStatus::Rejected => RequestStatus::Rejected,
        }
    }
}

impl From<RequestStatus> for DbRequestStatus {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::PendingVerification => DbRequestStatus::PendingVerification,
            RequestStatus::Approved => DbRequestStatus::Approved,
            RequestStatus::Rejected => DbRequestStatus::Rejected,
        }
    }
}

/// Payment state as stored in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "snake_case")]
enum DbPaymentStatus {
    Pending,
    Paid,
}

impl From<DbPaymentStatus> for PaymentStatus {
    fn from(status: DbPaymentStatus) -> Self {
        match status {
            DbPaymentStatus::Pending => PaymentStatus::Pending,
            DbPaymentStatus::Paid => PaymentStatus::Paid,
        }
    }
}

/// Decision action as stored in PostgreSQL
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "decision_action", rename_all = "snake_case")]
enum DbDecisionAction {
    Approved,
    Rejected,
}

impl From<DbDecisionAction> for DecisionAction {
    fn from(action: DbDecisionAction) -> Self {
        match action {
            DbDecisionAction::Approved => DecisionAction::Approved,
            DbDecisionAction::Rejected => DecisionAction::Rejected,
        }
    }
}

/// Database row for an insurance request
#[derive(Debug, sqlx::FromRow)]
struct RequestRow {
    request_id: Uuid,
    submitter_phone: String,
    submitted_at: DateTime<Utc>,
    item_name: String,
    quantity: i32,
    rate: Option<Decimal>,
    consignor: Option<String>,
    consignee: Option<String>,
    vehicle_number: Option<String>,
    image_url: Option<String>,
    consent: bool,
    status: DbRequestStatus,
    premium_amount: Option<Decimal>,
    invoice_number: Option<String>,
    payment_link: Option<String>,
    payment_status: Option<DbPaymentStatus>,
    rejection_reason: Option<String>,
    invoice_document: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<RequestRow> for InsuranceRequest {
    fn from(row: RequestRow) -> Self {
        InsuranceRequest {
            id: RequestId::from(row.request_id),
            submitter_phone: row.submitter_phone,
            submitted_at: row.submitted_at,
            item_name: row.item_name,
            quantity: row.quantity as u32,
            rate: row.rate,
            consignor: row.consignor,
            consignee: row.consignee,
            vehicle_number: row.vehicle_number,
            image_url: row.image_url,
            consent: row.consent,
            status: RequestStatus::from(row.status),
            premium_amount: row.premium_amount,
            invoice_number: row.invoice_number,
            payment_link: row.payment_link,
            payment_status: row.payment_status.map(PaymentStatus::from),
            rejection_reason: row.rejection_reason,
            invoice_document: row.invoice_document,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Database row for a decision
#[derive(Debug, sqlx::FromRow)]
struct DecisionRow {
    decision_id: Uuid,
    request_id: Uuid,
    action: DbDecisionAction,
    note: Option<String>,
    decided_at: DateTime<Utc>,
}

impl From<DecisionRow> for DecisionRecord {
    fn from(row: DecisionRow) -> Self {
        DecisionRecord {
            id: row.decision_id,
            request_id: RequestId::from(row.request_id),
            action: DecisionAction::from(row.action),
            note: row.note,
            decided_at: row.decided_at,
        }
    }
}
