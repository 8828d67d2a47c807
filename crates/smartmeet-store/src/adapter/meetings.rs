//! Scheduled meetings — the non-template `meetings` rows.

use serde_json::{json, Value};

use smartmeet_core::entities::{Meeting, Recipient};

use crate::adapter::{distributions, new_id, now_rfc3339, tables};
use crate::client::{Row, StoreClient};
use crate::errors::{Result, StoreError};
use crate::rows::{decode, MeetingRow};

/// Fields for scheduling a meeting.
#[derive(Clone, Debug)]
pub struct NewMeeting {
    /// Owning organization, when known.
    pub organization_id: Option<String>,
    /// Human-facing meeting code.
    pub meeting_code: String,
    /// Title.
    pub title: String,
    /// Scheduled start (RFC 3339).
    pub scheduled_at: String,
    /// Duration in minutes.
    pub duration_mins: i64,
    /// Free-form description.
    pub description: Option<String>,
}

/// Schedule a meeting.
pub fn create(client: &StoreClient, new: &NewMeeting) -> Result<Meeting> {
    let row = object(json!({
        "id": new_id("mtg"),
        "organization_id": new.organization_id,
        "meeting_code": new.meeting_code,
        "title": new.title,
        "scheduled_at": new.scheduled_at,
        "duration_mins": new.duration_mins,
        "description": new.description,
        "is_template": 0,
        "created_at": now_rfc3339(),
    }));
    let inserted: MeetingRow = client.insert(tables::MEETINGS, row).and_then(decode)?;
    Ok(assemble(inserted))
}

/// Fetch one meeting by id.
pub fn get(client: &StoreClient, id: &str) -> Result<Meeting> {
    let row = client
        .select(tables::MEETINGS)
        .eq("id", id)
        .eq("is_template", 0)
        .fetch_one()?
        .ok_or_else(|| StoreError::MeetingNotFound(id.to_string()))?;
    Ok(assemble(decode(row)?))
}

/// Fetch one meeting with its attendee list populated.
pub fn get_with_attendees(client: &StoreClient, id: &str) -> Result<Meeting> {
    let mut meeting = get(client, id)?;
    let attendees: Vec<Recipient> = distributions::recipients_for(client, id)?;
    meeting.attendees = Some(attendees);
    Ok(meeting)
}

/// List meetings, optionally restricted to one organization, newest first.
pub fn list(client: &StoreClient, organization_id: Option<&str>) -> Result<Vec<Meeting>> {
    let mut query = client
        .select(tables::MEETINGS)
        .eq("is_template", 0)
        .order_desc("scheduled_at");
    if let Some(org) = organization_id {
        query = query.eq("organization_id", org);
    }
    query
        .fetch()?
        .into_iter()
        .map(|row| Ok(assemble(decode(row)?)))
        .collect()
}

/// Meetings starting at or after now, soonest first.
pub fn upcoming(client: &StoreClient) -> Result<Vec<Meeting>> {
    client
        .select(tables::MEETINGS)
        .eq("is_template", 0)
        .gte("scheduled_at", now_rfc3339())
        .order_asc("scheduled_at")
        .fetch()?
        .into_iter()
        .map(|row| Ok(assemble(decode(row)?)))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal
// ─────────────────────────────────────────────────────────────────────────────

fn assemble(row: MeetingRow) -> Meeting {
    Meeting {
        id: row.id,
        organization_id: row.organization_id,
        meeting_code: row.meeting_code,
        title: row.title,
        scheduled_at: row.scheduled_at,
        duration_mins: row.duration_mins,
        description: row.description,
        attendees: None,
    }
}

fn object(value: Value) -> Row {
    let Value::Object(map) = value else {
        unreachable!("literal is always an object");
    };
    map
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
