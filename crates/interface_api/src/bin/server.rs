//! Transit Insure - API Server Binary
//!
//! Starts the HTTP API server for the transit insurance system.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin transit-api
//!
//! # Run with environment variables
//! API_HOST=0.0.0.0 API_PORT=8080 DATABASE_URL=postgres://... cargo run --bin transit-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` / `API_PORT` - listen address (default: 0.0.0.0:8080)
//! * `API_DATABASE_URL` / `DATABASE_URL` - PostgreSQL connection string
//! * `API_PUBLIC_BASE_URL` - base URL for payment and document links
//! * `API_INVOICE_DIR` - directory rendered invoices are written to
//! * `API_ASSETS_DIR` - directory searched for local consignment images
//! * `API_COMPANY_NAME` / `API_COMPANY_ADDRESS` / `API_COMPANY_PHONE` - branding
//! * `API_MESSAGING_ENDPOINT` / `API_MESSAGING_TOKEN` - outbound messaging
//! * `API_MESSAGING_TIMEOUT_SECS` - notification timeout (default: 15)
//! * `API_IMAGE_TIMEOUT_SECS` - image download budget (default: 10)
//! * `API_ALLOWED_ORIGIN` - allowed browser origin (default: any)
//! * `API_PRODUCTION` - suppress error detail when true
//! * `API_LOG_LEVEL` - trace, debug, info, warn, error (default: info)

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use domain_request::LifecycleService;
use infra_db::{create_pool, DatabaseConfig, PgRequestStore};
use infra_notify::{HttpNotifier, NotifyConfig};
use infra_pdf::{CompanyInfo, PdfInvoiceRenderer, RenderConfig};
use interface_api::{config::ApiConfig, create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = load_config();
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Starting Transit Insure API Server"
    );

    let pool = create_pool(DatabaseConfig::new(&config.database_url)).await?;
    infra_db::run_migrations(&pool).await?;

    let store = Arc::new(PgRequestStore::new(pool));
    let notifier = Arc::new(HttpNotifier::new(NotifyConfig {
        endpoint: config.messaging_endpoint.clone(),
        api_token: config.messaging_token.clone(),
        timeout_secs: config.messaging_timeout_secs,
    }));
    let renderer = Arc::new(PdfInvoiceRenderer::new(RenderConfig {
        invoice_dir: config.invoice_path(),
        assets_dir: config.assets_path(),
        public_base_url: config.public_base_url.clone(),
        image_timeout_secs: config.image_timeout_secs,
        company: CompanyInfo {
            name: config.company_name.clone(),
            address: config.company_address.clone(),
            phone: config.company_phone.clone(),
        },
    }));

    let lifecycle = LifecycleService::new(
        store.clone(),
        renderer,
        notifier,
        config.public_base_url.clone(),
    );

    let state = AppState {
        lifecycle,
        store,
        config: config.clone(),
    };
    let app = create_router(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Loads API configuration from environment variables.
///
/// Tries the prefixed environment source first, then falls back to
/// individual variables with defaults.
fn load_config() -> ApiConfig {
    ApiConfig::from_env().unwrap_or_else(|_| {
        let defaults = ApiConfig::default();
        ApiConfig {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("API_DATABASE_URL"))
                .unwrap_or(defaults.database_url),
            public_base_url: std::env::var("API_PUBLIC_BASE_URL")
                .unwrap_or(defaults.public_base_url),
            invoice_dir: std::env::var("API_INVOICE_DIR").unwrap_or(defaults.invoice_dir),
            assets_dir: std::env::var("API_ASSETS_DIR").unwrap_or(defaults.assets_dir),
            company_name: std::env::var("API_COMPANY_NAME").unwrap_or(defaults.company_name),
            company_address: std::env::var("API_COMPANY_ADDRESS")
                .unwrap_or(defaults.company_address),
            company_phone: std::env::var("API_COMPANY_PHONE").unwrap_or(defaults.company_phone),
            messaging_endpoint: std::env::var("API_MESSAGING_ENDPOINT")
                .unwrap_or(defaults.messaging_endpoint),
            messaging_token: std::env::var("API_MESSAGING_TOKEN")
                .unwrap_or(defaults.messaging_token),
            messaging_timeout_secs: std::env::var("API_MESSAGING_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.messaging_timeout_secs),
            image_timeout_secs: std::env::var("API_IMAGE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.image_timeout_secs),
            allowed_origin: std::env::var("API_ALLOWED_ORIGIN").unwrap_or(defaults.allowed_origin),
            production: std::env::var("API_PRODUCTION")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.production),
            log_level: std::env::var("API_LOG_LEVEL")
                .or_else(|_| std::env::var("RUST_LOG"))
                .unwrap_or(defaults.log_level),
        }
    })
}

/// Initializes the tracing subscriber for structured logging.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// This enables graceful shutdown of the server, allowing in-flight
/// requests to complete before the process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
