//! Notification message templates

use core_kernel::format_inr;
use domain_request::{ApprovalNotice, RejectionNotice};

/// Approval message: invoice number, formatted premium, payment link.
pub fn approval_message(notice: &ApprovalNotice) -> String {
    format!(
        "Your insurance request for {item} has been approved.\n\
         Invoice number: {invoice}\n\
         Premium: {premium}\n\
         Pay here: {link}",
        item = notice.item_name,
        invoice = notice.invoice_number,
        premium = format_inr(notice.premium),
        link = notice.payment_link,
    )
}

/// Rejection message carrying the admin's reason.
pub fn rejection_message(notice: &RejectionNotice) -> String {
    format!(
        "Your insurance request for {item} could not be approved.\n\
         Reason: {reason}\n\
         You may submit a corrected request.",
        item = notice.item_name,
        reason = notice.reason,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn approval_message_includes_decision_details() {
        let notice = ApprovalNotice {
            phone: "919876543210".to_string(),
            item_name: "Tender Coconut".to_string(),
            invoice_number: "INV-1722945600000-0A1B".to_string(),
            premium: dec!(8.87),
            payment_link: "https://pay.example.com/pay/INV-1722945600000-0A1B".to_string(),
        };

        let message = approval_message(&notice);
        assert!(message.contains("INV-1722945600000-0A1B"));
        assert!(message.contains("₹8.87"));
        assert!(message.contains("https://pay.example.com/pay/INV-1722945600000-0A1B"));
    }

    #[test]
    fn rejection_message_includes_reason() {
        let notice = RejectionNotice {
            phone: "919876543210".to_string(),
            item_name: "Tender Coconut".to_string(),
            reason: "vehicle registration could not be verified".to_string(),
        };

        let message = rejection_message(&notice);
        assert!(message.contains("could not be approved"));
        assert!(message.contains("vehicle registration could not be verified"));
    }
}
