//! SMTP delivery via `lettre`.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport as _};
use tracing::debug;

use smartmeet_core::entities::{DeliveryMethod, Recipient};

use crate::{OutboundInvite, Result, Transport, TransportError};

/// SMTP connection settings.
#[derive(Clone, Debug)]
pub struct SmtpConfig {
    /// Relay host.
    pub host: String,
    /// Relay port.
    pub port: u16,
    /// Username; unauthenticated relay when absent.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// From address.
    pub from: String,
}

/// Email transport over an SMTP relay.
pub struct SmtpMailer {
    transport: SmtpTransport,
    from: String,
}

impl SmtpMailer {
    /// Build a mailer from config. Credentials are optional; without them
    /// the relay is used unauthenticated (local/dev relays).
    pub fn new(config: &SmtpConfig) -> Result<Self> {
        let transport = match (&config.username, &config.password) {
            (Some(user), Some(pass)) => SmtpTransport::relay(&config.host)?
                .port(config.port)
                .credentials(Credentials::new(user.clone(), pass.clone()))
                .build(),
            _ => SmtpTransport::builder_dangerous(&config.host)
                .port(config.port)
                .build(),
        };
        Ok(Self {
            transport,
            from: config.from.clone(),
        })
    }

    fn build_message(&self, to: &str, invite: &OutboundInvite) -> Result<Message> {
        Ok(Message::builder()
            .from(self.from.parse()?)
            .to(to.parse()?)
            .subject(&invite.subject)
            .header(ContentType::TEXT_HTML)
            .body(wrap_html(&invite.html))?)
    }
}

#[async_trait]
impl Transport for SmtpMailer {
    fn method(&self) -> DeliveryMethod {
        DeliveryMethod::Email
    }

    async fn send(&self, invite: &OutboundInvite) -> Result<()> {
        let Recipient::Email(to) = &invite.recipient else {
            return Err(TransportError::WrongRecipientKind {
                recipient: invite.recipient.address().to_string(),
                method: "email",
            });
        };

        let message = self.build_message(to, invite)?;
        let transport = self.transport.clone();
        // lettre's SmtpTransport is blocking; keep it off the runtime.
        let response = tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| TransportError::Rejected {
                detail: format!("send task failed: {e}"),
            })??;

        debug!(to, code = %response.code(), "invitation email accepted by relay");
        Ok(())
    }
}

/// Wrap the card HTML in a full document shell for email clients.
fn wrap_html(card: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<body style=\"margin: 0; padding: 2rem; background: #f1f3f5;\">\n{card}\n</body>\n</html>\n"
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "localhost".into(),
            port: 2525,
            username: None,
            password: None,
            from: "invites@smartmeet.test".into(),
        }
    }

    fn invite() -> OutboundInvite {
        OutboundInvite {
            recipient: Recipient::Email("amy@example.com".into()),
            subject: "Meeting Request: Q3".into(),
            html: "<div>card</div>".into(),
        }
    }

    #[test]
    fn builds_unauthenticated_mailer() {
        assert!(SmtpMailer::new(&config()).is_ok());
    }

    #[test]
    fn builds_a_well_formed_message() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let message = mailer.build_message("amy@example.com", &invite()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Meeting Request: Q3"));
        assert!(raw.contains("To: amy@example.com"));
    }

    #[test]
    fn rejects_malformed_from_address() {
        let mut bad = config();
        bad.from = "not an address".into();
        let mailer = SmtpMailer::new(&bad).unwrap();
        assert!(mailer.build_message("amy@example.com", &invite()).is_err());
    }

    #[tokio::test]
    async fn refuses_phone_recipients() {
        let mailer = SmtpMailer::new(&config()).unwrap();
        let mut wrong = invite();
        wrong.recipient = Recipient::Phone("+15550100".into());
        let err = mailer.send(&wrong).await.unwrap_err();
        assert!(matches!(err, TransportError::WrongRecipientKind { .. }));
    }

    #[test]
    fn wrap_html_produces_full_document() {
        let doc = wrap_html("<div>x</div>");
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<div>x</div>"));
        assert!(doc.trim_end().ends_with("</html>"));
    }
}
