//! Test data builders
//!
//! Builder for constructing test requests with sensible defaults, so
//! tests specify only the fields they care about.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use core_kernel::RequestId;
use domain_request::{InsuranceRequest, NewRequest, SubmitCommand};

/// Builder for test request data.
///
/// Defaults describe the documented example consignment: 45 units of
/// Tender Coconut at ₹98.50, submitted with consent.
pub struct TestRequestBuilder {
    id: RequestId,
    phone: String,
    submitted_at: DateTime<Utc>,
    item_name: String,
    quantity: u32,
    rate: Option<Decimal>,
    consignor: Option<String>,
    consignee: Option<String>,
    vehicle_number: Option<String>,
    image_url: Option<String>,
    consent: bool,
    premium_amount: Decimal,
}

impl Default for TestRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRequestBuilder {
    pub fn new() -> Self {
        Self {
            id: RequestId::new_v7(),
            phone: "919876543210".to_string(),
            submitted_at: Utc::now(),
            item_name: "Tender Coconut".to_string(),
            quantity: 45,
            rate: Some(dec!(98.50)),
            consignor: Some("Malnad Traders".to_string()),
            consignee: Some("City Fresh Mart".to_string()),
            vehicle_number: Some("KA01AB1234".to_string()),
            image_url: None,
            consent: true,
            premium_amount: dec!(8.87),
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_item_name(mut self, item_name: impl Into<String>) -> Self {
        self.item_name = item_name.into();
        self
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_rate(mut self, rate: Option<Decimal>) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_consent(mut self, consent: bool) -> Self {
        self.consent = consent;
        self
    }

    pub fn with_submitted_at(mut self, submitted_at: DateTime<Utc>) -> Self {
        self.submitted_at = submitted_at;
        self
    }

    pub fn with_premium_amount(mut self, premium_amount: Decimal) -> Self {
        self.premium_amount = premium_amount;
        self
    }

    /// Builds the command a webhook handler would pass to the lifecycle.
    pub fn build_command(&self) -> SubmitCommand {
        SubmitCommand {
            phone: self.phone.clone(),
            submitted_at: self.submitted_at,
            item_name: self.item_name.clone(),
            quantity: self.quantity,
            rate: self.rate,
            consignor: self.consignor.clone(),
            consignee: self.consignee.clone(),
            vehicle_number: self.vehicle_number.clone(),
            image_url: self.image_url.clone(),
            consent: self.consent,
        }
    }

    /// Builds the validated insert payload.
    pub fn build_new_request(&self) -> NewRequest {
        NewRequest {
            id: self.id,
            submitter_phone: self.phone.clone(),
            submitted_at: self.submitted_at,
            item_name: self.item_name.clone(),
            quantity: self.quantity,
            rate: self.rate,
            consignor: self.consignor.clone(),
            consignee: self.consignee.clone(),
            vehicle_number: self.vehicle_number.clone(),
            image_url: self.image_url.clone(),
            premium_amount: self.premium_amount,
        }
    }

    /// Builds a pending entity directly.
    pub fn build_pending(&self) -> InsuranceRequest {
        InsuranceRequest::pending(self.build_new_request())
    }
}
