//! Messaging-app delivery via an HTTP API.
//!
//! Posts one JSON payload per recipient to the configured endpoint with an
//! API-key header. The invitation HTML is not sent over messaging; the
//! subject line doubles as the message text, with the join link appended by
//! the caller when there is one.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use smartmeet_core::entities::{DeliveryMethod, Recipient};

use crate::{OutboundInvite, Result, Transport, TransportError};

/// Messaging API settings.
#[derive(Clone, Debug)]
pub struct MessagingConfig {
    /// Endpoint to POST messages to.
    pub api_url: String,
    /// API key sent as `X-API-Key`.
    pub api_key: String,
}

/// Messaging transport over a provider HTTP API.
pub struct MessagingApi {
    client: reqwest::Client,
    config: MessagingConfig,
}

#[derive(Serialize)]
struct MessagePayload<'a> {
    to: &'a str,
    message: &'a str,
}

impl MessagingApi {
    /// Build a messaging transport from config.
    pub fn new(config: MessagingConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl Transport for MessagingApi {
    fn method(&self) -> DeliveryMethod {
        DeliveryMethod::Messaging
    }

    async fn send(&self, invite: &OutboundInvite) -> Result<()> {
        let Recipient::Phone(to) = &invite.recipient else {
            return Err(TransportError::WrongRecipientKind {
                recipient: invite.recipient.address().to_string(),
                method: "messaging",
            });
        };

        let response = self
            .client
            .post(&self.config.api_url)
            .header("X-API-Key", &self.config.api_key)
            .json(&MessagePayload {
                to,
                message: &invite.subject,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Rejected {
                detail: format!("messaging api returned {status}: {body}"),
            });
        }

        debug!(to, "invitation message accepted by provider");
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
