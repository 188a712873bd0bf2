//! HTTP surface tests
//!
//! Drives the full router against the in-memory store, covering the
//! webhook intake, submitter queries, admin decisions, and the
//! static invoice mount.

use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};

use domain_request::LifecycleService;
use interface_api::{config::ApiConfig, create_router, AppState};
use test_utils::{InMemoryRequestStore, RecordingNotifier, StubRenderer};

struct TestApp {
    server: TestServer,
    store: Arc<InMemoryRequestStore>,
    invoice_dir: tempfile::TempDir,
}

fn spawn_app() -> TestApp {
    let store = Arc::new(InMemoryRequestStore::new());
    let invoice_dir = tempfile::tempdir().unwrap();

    let config = ApiConfig {
        invoice_dir: invoice_dir.path().display().to_string(),
        production: false,
        ..ApiConfig::default()
    };

    let lifecycle = LifecycleService::new(
        store.clone(),
        Arc::new(StubRenderer::new()),
        Arc::new(RecordingNotifier::new()),
        config.public_base_url.clone(),
    );

    let state = AppState {
        lifecycle,
        store: store.clone(),
        config,
    };

    TestApp {
        server: TestServer::new(create_router(state)).unwrap(),
        store,
        invoice_dir,
    }
}

fn valid_submission(phone: &str) -> Value {
    json!({
        "phone": phone,
        "timestamp": "2025-06-01T09:30:00Z",
        "item_name": "Tender Coconut",
        "quantity": 45,
        "rate": 98.50,
        "vehicle_number": "KA01AB1234",
        "consent": true,
    })
}

async fn submit(app: &TestApp, phone: &str) -> Value {
    let response = app
        .server
        .post("/insurance/request")
        .json(&valid_submission(phone))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    response.json::<Value>()
}

// ============================================================================
// Webhook intake
// ============================================================================

#[tokio::test]
async fn submit_returns_the_created_summary() {
    let app = spawn_app();

    let body = submit(&app, "919876543210").await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["status"], json!("PENDING_VERIFICATION"));
    assert_eq!(body["data"]["premium_amount"], json!("8.87"));
    assert_eq!(body["data"]["submitter_phone"], json!("919876543210"));
}

#[tokio::test]
async fn duplicate_submission_returns_conflict_with_existing_identity() {
    let app = spawn_app();

    let first = submit(&app, "919876543210").await;

    let response = app
        .server
        .post("/insurance/request")
        .json(&valid_submission("+91 98765 43210"))
        .await;

    assert_eq!(response.status_code(), StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"]["request_id"], first["data"]["request_id"]);
    assert_eq!(body["data"]["status"], json!("PENDING_VERIFICATION"));
    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn consent_strings_are_interpreted() {
    let app = spawn_app();

    let mut granted = valid_submission("919876543210");
    granted["consent"] = json!("TRUE");
    let response = app.server.post("/insurance/request").json(&granted).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let mut withheld = valid_submission("918012345678");
    withheld["consent"] = json!("no");
    let response = app.server.post("/insurance/request").json(&withheld).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let mut omitted = valid_submission("917011112222");
    omitted.as_object_mut().unwrap().remove("consent");
    let response = app.server.post("/insurance/request").json(&omitted).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert_eq!(app.store.len(), 1);
}

#[tokio::test]
async fn invalid_submissions_are_rejected() {
    let app = spawn_app();

    let mut zero_quantity = valid_submission("919876543210");
    zero_quantity["quantity"] = json!(0);
    let response = app
        .server
        .post("/insurance/request")
        .json(&zero_quantity)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let mut bad_phone = valid_submission("12345");
    bad_phone["phone"] = json!("12345");
    let response = app.server.post("/insurance/request").json(&bad_phone).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let missing_fields = json!({ "phone": "919876543210", "consent": true });
    let response = app
        .server
        .post("/insurance/request")
        .json(&missing_fields)
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert!(app.store.is_empty());
}

#[tokio::test]
async fn epoch_timestamps_are_accepted() {
    let app = spawn_app();

    let mut submission = valid_submission("919876543210");
    submission["timestamp"] = json!(1_719_829_800);
    let response = app
        .server
        .post("/insurance/request")
        .json(&submission)
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body = response.json::<Value>();
    assert_eq!(
        body["data"]["submitted_at"],
        json!("2024-07-01T10:30:00Z")
    );
}

// ============================================================================
// Submitter queries
// ============================================================================

#[tokio::test]
async fn request_detail_includes_decision_history() {
    let app = spawn_app();
    let created = submit(&app, "919876543210").await;
    let id = created["data"]["request_id"].as_str().unwrap().to_string();

    let response = app.server.get(&format!("/insurance/request/{id}")).await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body = response.json::<Value>();
    assert_eq!(body["data"]["status"], json!("PENDING_VERIFICATION"));
    assert_eq!(body["data"]["decisions"], json!([]));
}

#[tokio::test]
async fn unknown_request_is_not_found() {
    let app = spawn_app();

    let response = app
        .server
        .get("/insurance/request/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["success"], json!(false));
}

#[tokio::test]
async fn status_projection_excludes_audit_fields() {
    let app = spawn_app();
    submit(&app, "919876543210").await;

    let response = app.server.get("/insurance/status/919876543210").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let data = &response.json::<Value>()["data"];
    assert_eq!(data["status"], json!("PENDING_VERIFICATION"));
    assert!(data.get("created_at").is_none());
    assert!(data.get("updated_at").is_none());
    assert!(data.get("decisions").is_none());

    let missing = app.server.get("/insurance/status/918000000000").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

// ============================================================================
// Admin decisions
// ============================================================================

#[tokio::test]
async fn approve_assigns_invoice_number_and_payment_placeholders() {
    let app = spawn_app();
    let created = submit(&app, "919876543210").await;
    let id = created["data"]["request_id"].as_str().unwrap().to_string();

    let response = app
        .server
        .post(&format!("/admin/approve/{id}"))
        .json(&json!({ "note": "verified over call" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let data = &response.json::<Value>()["data"];
    assert_eq!(data["status"], json!("APPROVED"));
    assert_eq!(data["payment_status"], json!("PENDING"));
    assert_eq!(data["premium_amount"], json!("8.87"));
    let invoice_number = data["invoice_number"].as_str().unwrap();
    assert!(invoice_number.starts_with("INV-"));
    assert!(data["payment_link"]
        .as_str()
        .unwrap()
        .ends_with(&format!("/pay/{invoice_number}")));
}

#[tokio::test]
async fn deciding_twice_reports_the_conflict() {
    let app = spawn_app();
    let created = submit(&app, "919876543210").await;
    let id = created["data"]["request_id"].as_str().unwrap().to_string();

    let first = app.server.post(&format!("/admin/approve/{id}")).await;
    assert_eq!(first.status_code(), StatusCode::OK);

    let again = app.server.post(&format!("/admin/approve/{id}")).await;
    assert_eq!(again.status_code(), StatusCode::BAD_REQUEST);
    let body = again.json::<Value>();
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"]["status"], json!("APPROVED"));

    let reject = app
        .server
        .post(&format!("/admin/reject/{id}"))
        .json(&json!({ "reason": "attempting to reject an approved request" }))
        .await;
    assert_eq!(reject.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn approve_unknown_request_is_not_found() {
    let app = spawn_app();

    let response = app
        .server
        .post("/admin/approve/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reject_validates_the_reason_length() {
    let app = spawn_app();
    let created = submit(&app, "919876543210").await;
    let id = created["data"]["request_id"].as_str().unwrap().to_string();

    let short = app
        .server
        .post(&format!("/admin/reject/{id}"))
        .json(&json!({ "reason": "too vague" }))
        .await;
    assert_eq!(short.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .server
        .post(&format!("/admin/reject/{id}"))
        .json(&json!({ "reason": "vehicle registration could not be verified" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["status"], json!("REJECTED"));
    assert_eq!(
        data["rejection_reason"],
        json!("vehicle registration could not be verified")
    );

    // The decision shows up in the detail history
    let detail = app.server.get(&format!("/insurance/request/{id}")).await;
    let decisions = detail.json::<Value>()["data"]["decisions"].clone();
    assert_eq!(decisions.as_array().unwrap().len(), 1);
    assert_eq!(decisions[0]["action"], json!("REJECTED"));
}

// ============================================================================
// Admin listings
// ============================================================================

#[tokio::test]
async fn pending_listing_is_newest_first() {
    let app = spawn_app();

    let mut older = valid_submission("919876543210");
    older["timestamp"] = json!("2025-06-01T08:00:00Z");
    app.server.post("/insurance/request").json(&older).await;

    let mut newer = valid_submission("918012345678");
    newer["timestamp"] = json!("2025-06-01T09:00:00Z");
    app.server.post("/insurance/request").json(&newer).await;

    let response = app.server.get("/admin/pending").await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let data = response.json::<Value>()["data"].clone();
    let listed = data.as_array().unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["submitter_phone"], json!("918012345678"));
    assert_eq!(listed[1]["submitter_phone"], json!("919876543210"));
}

#[tokio::test]
async fn filtered_listing_reports_the_total() {
    let app = spawn_app();

    for phone in ["919876543210", "918012345678", "917011112222"] {
        submit(&app, phone).await;
    }
    let pending = app.server.get("/admin/pending").await.json::<Value>();
    let id = pending["data"][0]["request_id"].as_str().unwrap().to_string();
    app.server.post(&format!("/admin/approve/{id}")).await;

    let approved = app
        .server
        .get("/admin/requests")
        .add_query_param("status", "APPROVED")
        .await;
    let body = approved.json::<Value>();
    assert_eq!(body["total"], json!(1));
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let paged = app
        .server
        .get("/admin/requests")
        .add_query_param("limit", "2")
        .await;
    let body = paged.json::<Value>();
    assert_eq!(body["total"], json!(3));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["limit"], json!(2));

    let bad_status = app
        .server
        .get("/admin/requests")
        .add_query_param("status", "SHIPPED")
        .await;
    assert_eq!(bad_status.status_code(), StatusCode::BAD_REQUEST);
}

// ============================================================================
// Static invoices and health
// ============================================================================

#[tokio::test]
async fn rendered_invoices_are_served_statically() {
    let app = spawn_app();

    std::fs::write(
        app.invoice_dir.path().join("INV-1722945600000-0A1B.pdf"),
        b"%PDF-1.4 test",
    )
    .unwrap();

    let response = app.server.get("/invoices/INV-1722945600000-0A1B.pdf").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let missing = app.server.get("/invoices/INV-0.pdf").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoints_respond() {
    let app = spawn_app();

    let health = app.server.get("/health").await;
    assert_eq!(health.status_code(), StatusCode::OK);

    let ready = app.server.get("/health/ready").await;
    assert_eq!(ready.status_code(), StatusCode::OK);
}
