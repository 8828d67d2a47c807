//! Meeting routes: list, upcoming, and single-meeting fetch with attendees.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;

use smartmeet_core::entities::Meeting;
use smartmeet_store::NewMeeting;

use crate::errors::ApiError;
use crate::state::AppState;

/// Query params for `GET /api/meetings`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListQuery {
    /// Restrict to one organization.
    pub organization_id: Option<String>,
}

/// Body for `POST /api/meetings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMeetingRequest {
    /// Owning organization.
    #[serde(default)]
    pub organization_id: Option<String>,
    /// Human-facing meeting code.
    pub meeting_code: String,
    /// Title.
    pub title: String,
    /// Scheduled start (RFC 3339).
    pub scheduled_at: String,
    /// Duration in minutes; 30 when absent.
    #[serde(default)]
    pub duration_mins: Option<i64>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// `GET /api/meetings`
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Meeting>>, ApiError> {
    Ok(Json(state.store.meetings(query.organization_id.as_deref())?))
}

/// `GET /api/meetings/upcoming`
pub async fn upcoming(State(state): State<AppState>) -> Result<Json<Vec<Meeting>>, ApiError> {
    Ok(Json(state.store.upcoming_meetings()?))
}

/// `GET /api/meetings/{id}`
pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Meeting>, ApiError> {
    Ok(Json(state.store.meeting_with_attendees(&id)?))
}

/// `POST /api/meetings`
pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateMeetingRequest>,
) -> Result<(axum::http::StatusCode, Json<Meeting>), ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::bad_request("title is required"));
    }
    let meeting = state.store.schedule_meeting(&NewMeeting {
        organization_id: req.organization_id,
        meeting_code: req.meeting_code,
        title: req.title,
        scheduled_at: req.scheduled_at,
        duration_mins: req.duration_mins.unwrap_or(30),
        description: req.description,
    })?;
    Ok((axum::http::StatusCode::CREATED, Json(meeting)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
