//! Test doubles for the outbound ports

use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use domain_request::{
    ApprovalNotice, InsuranceRequest, InvoiceRenderer, NotifyError, Notifier, RejectionNotice,
    RenderError, RenderedDocument,
};

/// Records every notification instead of sending it.
#[derive(Default)]
pub struct RecordingNotifier {
    approvals: Mutex<Vec<ApprovalNotice>>,
    rejections: Mutex<Vec<RejectionNotice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn approvals(&self) -> Vec<ApprovalNotice> {
        self.approvals.lock().unwrap().clone()
    }

    pub fn rejections(&self) -> Vec<RejectionNotice> {
        self.rejections.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_approval(&self, notice: &ApprovalNotice) -> Result<(), NotifyError> {
        self.approvals.lock().unwrap().push(notice.clone());
        Ok(())
    }

    async fn send_rejection(&self, notice: &RejectionNotice) -> Result<(), NotifyError> {
        self.rejections.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

/// Always fails, for exercising the fire-and-forget contract.
#[derive(Default)]
pub struct FailingNotifier;

#[async_trait]
impl Notifier for FailingNotifier {
    async fn send_approval(&self, _notice: &ApprovalNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("connection refused".to_string()))
    }

    async fn send_rejection(&self, _notice: &RejectionNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("connection refused".to_string()))
    }
}

/// Pretends to render, returning a deterministic location.
#[derive(Default)]
pub struct StubRenderer {
    rendered: Mutex<Vec<String>>,
}

impl StubRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invoice numbers this stub has "rendered".
    pub fn rendered(&self) -> Vec<String> {
        self.rendered.lock().unwrap().clone()
    }
}

#[async_trait]
impl InvoiceRenderer for StubRenderer {
    async fn render(
        &self,
        _request: &InsuranceRequest,
        invoice_number: &str,
        _premium: Decimal,
    ) -> Result<RenderedDocument, RenderError> {
        self.rendered
            .lock()
            .unwrap()
            .push(invoice_number.to_string());
        Ok(RenderedDocument {
            file_name: format!("{invoice_number}.pdf"),
            location: format!("https://files.test/invoices/{invoice_number}.pdf"),
        })
    }
}

/// Always fails to render.
#[derive(Default)]
pub struct FailingRenderer;

#[async_trait]
impl InvoiceRenderer for FailingRenderer {
    async fn render(
        &self,
        _request: &InsuranceRequest,
        _invoice_number: &str,
        _premium: Decimal,
    ) -> Result<RenderedDocument, RenderError> {
        Err(RenderError::Compose("font table corrupted".to_string()))
    }
}
