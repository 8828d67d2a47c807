//! # smartmeet-transport
//!
//! Delivery transports for rendered invitations. The [`Transport`] trait is
//! the seam the server sends through; implementations stay thin — one
//! recipient per call, no retries, no queueing. Delivery bookkeeping
//! (status, recipient history) belongs to the caller.

#![deny(unsafe_code)]

pub mod messaging;
pub mod smtp;
pub mod stub;

use async_trait::async_trait;
use thiserror::Error;

use smartmeet_core::entities::{DeliveryMethod, Recipient};

pub use messaging::{MessagingApi, MessagingConfig};
pub use smtp::{SmtpConfig, SmtpMailer};
pub use stub::StubTransport;

/// A rendered invitation addressed to one recipient.
#[derive(Clone, Debug)]
pub struct OutboundInvite {
    /// Where to deliver.
    pub recipient: Recipient,
    /// Email subject / message headline.
    pub subject: String,
    /// Rendered HTML body.
    pub html: String,
}

/// Transport failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// SMTP-level failure.
    #[error("smtp error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// The recipient address could not be parsed.
    #[error("bad address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be constructed.
    #[error("message build error: {0}")]
    Message(#[from] lettre::error::Error),

    /// HTTP-level failure talking to the messaging API.
    #[error("messaging api error: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote end refused the delivery.
    #[error("delivery rejected: {detail}")]
    Rejected {
        /// What the remote reported.
        detail: String,
    },

    /// The recipient kind does not match this transport.
    #[error("recipient {recipient} cannot be delivered over {method}")]
    WrongRecipientKind {
        /// The offending address.
        recipient: String,
        /// This transport's method.
        method: &'static str,
    },
}

/// Result alias for transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// A delivery channel for rendered invitations.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Which delivery method this transport implements.
    fn method(&self) -> DeliveryMethod;

    /// Deliver one invitation.
    async fn send(&self, invite: &OutboundInvite) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
