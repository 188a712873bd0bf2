//! HTTP notifier tests against a mock messaging endpoint

use rust_decimal_macros::dec;
use serde_json::json;
use wiremock::matchers::{body_partial_json, body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use domain_request::{ApprovalNotice, NotifyError, Notifier, RejectionNotice};
use infra_notify::{HttpNotifier, NotifyConfig};

fn approval_notice() -> ApprovalNotice {
    ApprovalNotice {
        phone: "919876543210".to_string(),
        item_name: "Tender Coconut".to_string(),
        invoice_number: "INV-1722945600000-0A1B".to_string(),
        premium: dec!(8.87),
        payment_link: "https://pay.example.com/pay/INV-1722945600000-0A1B".to_string(),
    }
}

fn notifier_for(server: &MockServer) -> HttpNotifier {
    HttpNotifier::new(NotifyConfig {
        endpoint: format!("{}/v1/messages", server.uri()),
        api_token: "test-token".to_string(),
        timeout_secs: 5,
    })
}

#[tokio::test]
async fn approval_notification_posts_a_text_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("authorization", "Bearer test-token"))
        .and(body_partial_json(json!({
            "to": "919876543210",
            "type": "text",
        })))
        .and(body_string_contains("INV-1722945600000-0A1B"))
        .and(body_string_contains("₹8.87"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    notifier_for(&server)
        .send_approval(&approval_notice())
        .await
        .unwrap();
}

#[tokio::test]
async fn rejection_notification_carries_the_reason() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains("vehicle registration could not be verified"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let notice = RejectionNotice {
        phone: "919876543210".to_string(),
        item_name: "Tender Coconut".to_string(),
        reason: "vehicle registration could not be verified".to_string(),
    };

    notifier_for(&server).send_rejection(&notice).await.unwrap();
}

#[tokio::test]
async fn non_success_responses_surface_as_api_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = notifier_for(&server)
        .send_approval(&approval_notice())
        .await
        .unwrap_err();

    match err {
        NotifyError::Api { status, body } => {
            assert_eq!(status, 500);
            assert!(body.contains("upstream exploded"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let notifier = HttpNotifier::new(NotifyConfig {
        // Port 9 is discard; nothing listens there in test environments
        endpoint: "http://127.0.0.1:9/v1/messages".to_string(),
        api_token: "test-token".to_string(),
        timeout_secs: 1,
    });

    let err = notifier
        .send_approval(&approval_notice())
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::Transport(_)));
}
