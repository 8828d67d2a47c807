//! Distribution routes: send a template over email or messaging, and list
//! the send history.
//!
//! A send attempts delivery per recipient, then records one distribution
//! whose status reflects the outcome: `sent` when at least one recipient was
//! delivered to, `failed` when every attempt failed. Every attempted
//! recipient is appended to the template's history either way.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use smartmeet_core::entities::{
    DeliveryMethod, DeliveryStatus, Distribution, Recipient, Template,
};
use smartmeet_core::validation::{validate_email, validate_phone};
use smartmeet_store::{DistributionFilter, NewDistribution};
use smartmeet_templates::TemplateKind;
use smartmeet_transport::{OutboundInvite, Transport};

use crate::errors::ApiError;
use crate::state::AppState;

/// Body for the send routes.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SendRequest {
    /// Template to send.
    pub template_id: String,
    /// Addresses to deliver to (emails or phone numbers per route).
    pub recipients: Vec<String>,
    /// When present, the template must belong to this user.
    pub owner_id: Option<String>,
}

/// Outcome of a send.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendResponse {
    /// The recorded distribution.
    pub distribution: Distribution,
    /// Recipients delivered to.
    pub delivered: usize,
    /// Recipients that failed.
    pub failed: usize,
}

/// Query params for `GET /api/distributions`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    /// Restrict to distributions whose resolved owner matches.
    pub owner: Option<String>,
    /// Restrict by delivery status.
    pub status: Option<String>,
    /// Restrict by delivery method.
    pub method: Option<String>,
}

/// `POST /api/distributions/email`
pub async fn send_email(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<(StatusCode, Json<SendResponse>), ApiError> {
    let recipients = parse_recipients(&req.recipients, DeliveryMethod::Email)?;
    let mailer = Arc::clone(&state.mailer);
    send(&state, &req, DeliveryMethod::Email, recipients, mailer).await
}

/// `POST /api/distributions/messaging`
pub async fn send_messaging(
    State(state): State<AppState>,
    Json(req): Json<SendRequest>,
) -> Result<(StatusCode, Json<SendResponse>), ApiError> {
    let recipients = parse_recipients(&req.recipients, DeliveryMethod::Messaging)?;
    let messenger = Arc::clone(&state.messenger);
    send(&state, &req, DeliveryMethod::Messaging, recipients, messenger).await
}

/// `GET /api/distributions`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Distribution>>, ApiError> {
    let status = query
        .status
        .as_deref()
        .map(|s| {
            DeliveryStatus::parse(s)
                .ok_or_else(|| ApiError::bad_request(format!("unknown status: {s}")))
        })
        .transpose()?;
    let method = query
        .method
        .as_deref()
        .map(|s| {
            DeliveryMethod::parse(s)
                .ok_or_else(|| ApiError::bad_request(format!("unknown method: {s}")))
        })
        .transpose()?;

    let filter = DistributionFilter {
        owner: query.owner,
        status,
        method,
    };
    Ok(Json(state.store.distributions(&filter)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal
// ─────────────────────────────────────────────────────────────────────────────

async fn send(
    state: &AppState,
    req: &SendRequest,
    method: DeliveryMethod,
    recipients: Vec<Recipient>,
    transport: Arc<dyn Transport>,
) -> Result<(StatusCode, Json<SendResponse>), ApiError> {
    let template = state
        .store
        .template(&req.template_id, req.owner_id.as_deref())?;
    let subject = subject_for(&template);

    let mut delivered = 0usize;
    let mut failed = 0usize;
    for recipient in &recipients {
        let invite = OutboundInvite {
            recipient: recipient.clone(),
            subject: subject.clone(),
            html: template.content.clone(),
        };
        match transport.send(&invite).await {
            Ok(()) => delivered += 1,
            Err(err) => {
                warn!(
                    recipient = recipient.address(),
                    method = method.as_str(),
                    error = %err,
                    "delivery failed"
                );
                failed += 1;
            }
        }
    }

    let status = if delivered > 0 {
        DeliveryStatus::Sent
    } else {
        DeliveryStatus::Failed
    };
    let distribution = state.store.record_distribution(&NewDistribution {
        template_id: req.template_id.clone(),
        method,
        recipients,
        status,
    })?;

    Ok((
        StatusCode::CREATED,
        Json(SendResponse {
            distribution,
            delivered,
            failed,
        }),
    ))
}

fn parse_recipients(raw: &[String], method: DeliveryMethod) -> Result<Vec<Recipient>, ApiError> {
    if raw.is_empty() {
        return Err(ApiError::bad_request("recipients must not be empty"));
    }
    raw.iter()
        .map(|addr| {
            let addr = addr.trim();
            match method {
                DeliveryMethod::Email if validate_email(addr) => {
                    Ok(Recipient::Email(addr.to_string()))
                }
                DeliveryMethod::Messaging if validate_phone(addr) => {
                    Ok(Recipient::Phone(addr.to_string()))
                }
                DeliveryMethod::Email => {
                    Err(ApiError::bad_request(format!("invalid email address: {addr}")))
                }
                DeliveryMethod::Messaging => {
                    Err(ApiError::bad_request(format!("invalid phone number: {addr}")))
                }
            }
        })
        .collect()
}

fn subject_for(template: &Template) -> String {
    template
        .template_kind
        .as_deref()
        .and_then(TemplateKind::parse)
        .map_or_else(
            || format!("Meeting Invitation: {}", template.meeting_topic),
            |kind| kind.subject(&template.meeting_topic),
        )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::testing;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1_000_000)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn email_send_delivers_and_records_sent() {
        let ctx = testing::context();
        let template = testing::seed_template(&ctx, "usr_1", "Kickoff");

        let response = testing::router(ctx.state.clone())
            .oneshot(post(
                "/api/distributions/email",
                &json!({
                    "templateId": template.id,
                    "recipients": ["amy@example.com", "bob@example.com"]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["delivered"], 2);
        assert_eq!(json["failed"], 0);
        assert_eq!(json["distribution"]["status"], "sent");
        assert_eq!(json["distribution"]["method"], "email");

        let sent = ctx.mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].recipient.address(), "amy@example.com");
        assert!(sent[0].subject.contains("Kickoff"));
    }

    #[tokio::test]
    async fn email_send_rejects_invalid_address_before_delivery() {
        let ctx = testing::context();
        let template = testing::seed_template(&ctx, "usr_1", "Kickoff");

        let response = testing::router(ctx.state.clone())
            .oneshot(post(
                "/api/distributions/email",
                &json!({
                    "templateId": template.id,
                    "recipients": ["not-an-email"]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(ctx.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn send_with_wrong_owner_is_404() {
        let ctx = testing::context();
        let template = testing::seed_template(&ctx, "usr_1", "Kickoff");

        let response = testing::router(ctx.state.clone())
            .oneshot(post(
                "/api/distributions/email",
                &json!({
                    "templateId": template.id,
                    "recipients": ["amy@example.com"],
                    "ownerId": "usr_other"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(ctx.mailer.sent().is_empty());
    }

    #[tokio::test]
    async fn failed_delivery_records_failed_status() {
        let ctx = testing::failing_context("relay down");
        let template = testing::seed_template(&ctx, "usr_1", "Kickoff");

        let response = testing::router(ctx.state.clone())
            .oneshot(post(
                "/api/distributions/email",
                &json!({
                    "templateId": template.id,
                    "recipients": ["amy@example.com"]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["delivered"], 0);
        assert_eq!(json["failed"], 1);
        assert_eq!(json["distribution"]["status"], "failed");

        // The attempted recipient still lands in the template's history.
        let history = ctx
            .state
            .store
            .recipients_for_template(&template.id)
            .unwrap();
        assert_eq!(history.len(), 1);
    }

    #[tokio::test]
    async fn messaging_send_uses_phone_recipients() {
        let ctx = testing::context();
        let template = testing::seed_template(&ctx, "usr_1", "Kickoff");

        let response = testing::router(ctx.state.clone())
            .oneshot(post(
                "/api/distributions/messaging",
                &json!({
                    "templateId": template.id,
                    "recipients": ["+14155550100"]
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        assert_eq!(json["distribution"]["method"], "messaging");
        assert_eq!(ctx.messenger.sent().len(), 1);
        assert_eq!(
            ctx.messenger.sent()[0].recipient,
            smartmeet_core::entities::Recipient::Phone("+14155550100".into())
        );
    }

    #[tokio::test]
    async fn list_filters_by_status_and_rejects_unknown_values() {
        let ctx = testing::context();
        let template = testing::seed_template(&ctx, "usr_1", "Kickoff");
        testing::router(ctx.state.clone())
            .oneshot(post(
                "/api/distributions/email",
                &json!({
                    "templateId": template.id,
                    "recipients": ["amy@example.com"]
                }),
            ))
            .await
            .unwrap();

        let response = testing::router(ctx.state.clone())
            .oneshot(
                Request::builder()
                    .uri("/api/distributions?status=sent&method=email")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json.as_array().unwrap().len(), 1);

        let response = testing::router(ctx.state.clone())
            .oneshot(
                Request::builder()
                    .uri("/api/distributions?status=teleported")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
