//! HTTP notifier
//!
//! Sends templated text messages through the messaging provider's REST
//! API. The client carries the configured timeout; timeouts and transport
//! failures map to `NotifyError::Transport`, non-2xx responses to
//! `NotifyError::Api`.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use domain_request::{ApprovalNotice, NotifyError, Notifier, RejectionNotice};

use crate::templates;

/// Configuration for the outbound messaging endpoint.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    /// Full URL messages are POSTed to
    pub endpoint: String,
    /// Bearer token for the messaging provider
    pub api_token: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for NotifyConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            api_token: String::new(),
            timeout_secs: 15,
        }
    }
}

/// Outbound text message payload.
#[derive(Debug, Serialize)]
struct OutboundMessage<'a> {
    to: &'a str,
    #[serde(rename = "type")]
    message_type: &'a str,
    text: TextBody<'a>,
}

#[derive(Debug, Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

/// HTTP implementation of the `Notifier` port.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    config: NotifyConfig,
    client: reqwest::Client,
}

impl HttpNotifier {
    /// Creates a notifier with a client honoring the configured timeout.
    pub fn new(config: NotifyConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();
        Self { config, client }
    }

    async fn send_text(&self, to: &str, body: &str) -> Result<(), NotifyError> {
        let payload = OutboundMessage {
            to,
            message_type: "text",
            text: TextBody { body },
        };

        let response = self
            .client
            .post(&self.config.endpoint)
            .bearer_auth(&self.config.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| NotifyError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Api {
                status: status.as_u16(),
                body,
            });
        }

        debug!(to = %to, "notification delivered");
        Ok(())
    }
}

#[async_trait]
impl Notifier for HttpNotifier {
    async fn send_approval(&self, notice: &ApprovalNotice) -> Result<(), NotifyError> {
        let message = templates::approval_message(notice);
        self.send_text(&notice.phone, &message).await
    }

    async fn send_rejection(&self, notice: &RejectionNotice) -> Result<(), NotifyError> {
        let message = templates::rejection_message(notice);
        self.send_text(&notice.phone, &message).await
    }
}
