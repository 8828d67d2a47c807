//! Template routes: generate, list, fetch, update, delete, and the kind
//! catalog.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use smartmeet_core::entities::{Priority, Template};
use smartmeet_core::validation::duration_to_mins;
use smartmeet_store::{NewTemplate, TemplateChanges, TemplateWrite};
use smartmeet_templates::{self as templates, InviteForm, TemplateKind, TemplateKindInfo};

use crate::errors::ApiError;
use crate::state::AppState;

/// Body for `POST /api/templates/generate`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    /// User generating the template.
    pub user_id: String,
    /// Template kind id; the configured default when absent.
    pub template_type: Option<String>,
    /// Meeting topic (required).
    pub meeting_topic: String,
    /// Speaker or host.
    pub speaker_name: Option<String>,
    /// Meeting date (`YYYY-MM-DD`).
    pub meeting_date: Option<String>,
    /// Meeting time (`HH:MM`).
    pub meeting_time: Option<String>,
    /// Human-entered duration (`"30 minutes"`, `"1 hour"`).
    pub duration: Option<String>,
    /// Join link.
    pub meeting_link: Option<String>,
    /// Physical location.
    pub location: Option<String>,
    /// Attendee display names.
    pub attendees: Vec<String>,
    /// Agenda / additional notes.
    pub notes: Option<String>,
    /// Priority label; medium when absent or unknown.
    pub priority: Option<String>,
}

/// Owner scoping for list and fetch.
#[derive(Debug, Default, Deserialize)]
pub struct OwnerQuery {
    /// Restrict to templates owned by this user.
    pub owner: Option<String>,
}

/// `POST /api/templates/generate`
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<(StatusCode, Json<Template>), ApiError> {
    if req.user_id.trim().is_empty() {
        return Err(ApiError::bad_request("userId is required"));
    }
    if req.meeting_topic.trim().is_empty() {
        return Err(ApiError::bad_request("meetingTopic is required"));
    }

    let kind = match &req.template_type {
        None => state.default_kind,
        Some(id) => TemplateKind::parse(id)
            .ok_or_else(|| ApiError::bad_request(format!("unknown template type: {id}")))?,
    };

    let duration_mins = match &req.duration {
        None => 30,
        Some(label) => i64::from(duration_to_mins(label).ok_or_else(|| {
            ApiError::bad_request(format!("cannot parse duration: {label}"))
        })?),
    };

    let priority = req
        .priority
        .as_deref()
        .map_or(Priority::Medium, Priority::parse);

    let form = InviteForm {
        meeting_topic: req.meeting_topic.clone(),
        speaker_name: req.speaker_name.clone(),
        meeting_date: req.meeting_date.clone(),
        meeting_time: req.meeting_time.clone(),
        duration_label: req.duration.clone(),
        meeting_link: req.meeting_link.clone(),
        location: req.location.clone(),
        attendees: req.attendees.clone(),
        notes: req.notes.clone(),
        priority,
    };
    let invite = templates::render(kind, &form);

    let new = NewTemplate {
        owner_id: req.user_id,
        title: invite.title,
        content: invite.html,
        meeting_topic: req.meeting_topic,
        speaker_name: req.speaker_name,
        meeting_date: req.meeting_date,
        meeting_time: req.meeting_time,
        duration_mins,
        meeting_link: req.meeting_link,
        location: req.location,
        attendees: req.attendees,
        notes: req.notes,
        template_kind: Some(kind.id().to_string()),
        priority,
    };

    match state.store.create_template(&new)? {
        TemplateWrite::Created(template) => Ok((StatusCode::CREATED, Json(template))),
        TemplateWrite::Unavailable => Err(ApiError::unavailable(
            "template storage is unavailable on this backing store",
        )),
    }
}

/// `GET /api/templates`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Vec<Template>>, ApiError> {
    Ok(Json(state.store.templates(query.owner.as_deref())?))
}

/// `GET /api/templates/available`
pub async fn available() -> Json<Vec<TemplateKindInfo>> {
    Json(templates::available())
}

/// `GET /api/templates/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<OwnerQuery>,
) -> Result<Json<Template>, ApiError> {
    Ok(Json(state.store.template(&id, query.owner.as_deref())?))
}

/// `PATCH /api/templates/{id}`
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(changes): Json<TemplateChanges>,
) -> Result<Json<Template>, ApiError> {
    Ok(Json(state.store.update_template(&id, &changes)?))
}

/// `DELETE /api/templates/{id}`
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_template(&id)? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("template not found: {id}")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
