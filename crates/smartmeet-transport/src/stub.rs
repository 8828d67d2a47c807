//! Recording stub transport.
//!
//! Used by tests and by demo mode when no SMTP or messaging credentials are
//! configured: sends are recorded in memory instead of leaving the process.

use async_trait::async_trait;
use parking_lot::Mutex;

use smartmeet_core::entities::DeliveryMethod;

use crate::{OutboundInvite, Result, Transport, TransportError};

/// In-memory transport that records every send.
pub struct StubTransport {
    method: DeliveryMethod,
    sent: Mutex<Vec<OutboundInvite>>,
    fail_with: Option<String>,
}

impl StubTransport {
    /// A stub that accepts every delivery.
    pub fn new(method: DeliveryMethod) -> Self {
        Self {
            method,
            sent: Mutex::new(Vec::new()),
            fail_with: None,
        }
    }

    /// A stub that rejects every delivery with the given detail.
    pub fn failing(method: DeliveryMethod, detail: &str) -> Self {
        Self {
            method,
            sent: Mutex::new(Vec::new()),
            fail_with: Some(detail.to_string()),
        }
    }

    /// Everything sent so far, in order.
    pub fn sent(&self) -> Vec<OutboundInvite> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl Transport for StubTransport {
    fn method(&self) -> DeliveryMethod {
        self.method
    }

    async fn send(&self, invite: &OutboundInvite) -> Result<()> {
        if let Some(detail) = &self.fail_with {
            return Err(TransportError::Rejected {
                detail: detail.clone(),
            });
        }
        self.sent.lock().push(invite.clone());
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use smartmeet_core::entities::Recipient;

    fn invite(to: &str) -> OutboundInvite {
        OutboundInvite {
            recipient: Recipient::Email(to.into()),
            subject: "s".into(),
            html: "<div></div>".into(),
        }
    }

    #[tokio::test]
    async fn records_sends_in_order() {
        let stub = StubTransport::new(DeliveryMethod::Email);
        stub.send(&invite("a@x.com")).await.unwrap();
        stub.send(&invite("b@x.com")).await.unwrap();

        let sent = stub.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].recipient.address(), "a@x.com");
        assert_eq!(sent[1].recipient.address(), "b@x.com");
    }

    #[tokio::test]
    async fn failing_stub_rejects_and_records_nothing() {
        let stub = StubTransport::failing(DeliveryMethod::Email, "relay down");
        let err = stub.send(&invite("a@x.com")).await.unwrap_err();
        assert!(matches!(err, TransportError::Rejected { .. }));
        assert!(stub.sent().is_empty());
    }
}
