//! API configuration

use serde::Deserialize;
use std::path::PathBuf;

/// API configuration, environment-driven with the `API_` prefix.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Base public URL document and payment links are derived from
    pub public_base_url: String,
    /// Directory rendered invoices are written to and served from
    pub invoice_dir: String,
    /// Directory searched for local consignment images
    pub assets_dir: String,
    /// Company branding on rendered invoices
    pub company_name: String,
    pub company_address: String,
    pub company_phone: String,
    /// Outbound messaging endpoint and credentials
    pub messaging_endpoint: String,
    pub messaging_token: String,
    /// Outbound messaging timeout in seconds
    pub messaging_timeout_secs: u64,
    /// Consignment image download budget in seconds
    pub image_timeout_secs: u64,
    /// Allowed browser origin; empty allows any
    pub allowed_origin: String,
    /// Suppresses diagnostic detail in error responses when true
    pub production: bool,
    /// Log level
    pub log_level: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/transit_insure".to_string(),
            public_base_url: "http://localhost:8080".to_string(),
            invoice_dir: "invoices".to_string(),
            assets_dir: "assets".to_string(),
            company_name: "Transit Insure Pvt Ltd".to_string(),
            company_address: "14 Residency Road, Bengaluru 560025".to_string(),
            company_phone: "918044556677".to_string(),
            messaging_endpoint: String::new(),
            messaging_token: String::new(),
            messaging_timeout_secs: 15,
            image_timeout_secs: 10,
            allowed_origin: String::new(),
            production: false,
            log_level: "info".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Invoice directory as a path
    pub fn invoice_path(&self) -> PathBuf {
        PathBuf::from(&self.invoice_dir)
    }

    /// Assets directory as a path
    pub fn assets_path(&self) -> PathBuf {
        PathBuf::from(&self.assets_dir)
    }
}
