//! HTTP API Layer
//!
//! REST API for the transit insurance system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: webhook intake, submitter queries, admin decisions
//! - **Middleware**: request tracing and audit logging
//! - **DTOs**: request/response data transfer objects with validation
//! - **Error Handling**: `success`/`message` envelopes, detail suppressed
//!   in production
//!
//! Rendered invoices are served statically under `/invoices`, named by
//! invoice number.

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use domain_request::{LifecycleService, RequestError, RequestStore};

use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::handlers::{admin, health, query, webhook};
use crate::middleware::audit_middleware;

/// Inbound requests processed concurrently before new ones queue.
const MAX_IN_FLIGHT_REQUESTS: usize = 512;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: LifecycleService,
    pub store: Arc<dyn RequestStore>,
    pub config: ApiConfig,
}

impl AppState {
    /// Maps domain errors onto the API taxonomy.
    pub fn map_request_error(&self, error: RequestError) -> ApiError {
        match error {
            RequestError::Validation(message) => ApiError::Validation(message),
            RequestError::DuplicateSubmitter {
                existing_id,
                status,
            } => ApiError::DuplicateSubmitter {
                existing_id,
                status,
            },
            RequestError::AlreadyDecided { current } => ApiError::AlreadyDecided { current },
            RequestError::NotFound(id) => ApiError::NotFound(format!("Request {id} not found")),
            RequestError::Store(e) => self.internal(e),
        }
    }

    /// Internal error with diagnostic detail outside production mode.
    pub fn internal(&self, error: impl std::fmt::Display) -> ApiError {
        ApiError::Internal {
            detail: (!self.config.production).then(|| error.to_string()),
        }
    }
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let insurance_routes = Router::new()
        .route("/request", post(webhook::submit_request))
        .route("/request/:id", get(query::get_request))
        .route("/status/:submitter_id", get(query::get_status));

    let admin_routes = Router::new()
        .route("/pending", get(admin::list_pending))
        .route("/requests", get(admin::list_requests))
        .route("/approve/:id", post(admin::approve_request))
        .route("/reject/:id", post(admin::reject_request));

    Router::new()
        .merge(public_routes)
        .nest("/insurance", insurance_routes)
        .nest("/admin", admin_routes)
        .nest_service("/invoices", ServeDir::new(state.config.invoice_path()))
        .layer(axum_middleware::from_fn(audit_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(ConcurrencyLimitLayer::new(MAX_IN_FLIGHT_REQUESTS))
        .layer(cors_layer(&state.config))
        .with_state(state)
}

fn cors_layer(config: &ApiConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match config.allowed_origin.parse::<HeaderValue>() {
        Ok(origin) if !config.allowed_origin.is_empty() => layer.allow_origin(origin),
        _ => layer.allow_origin(Any),
    }
}
