//! Template entity — backed by a flagged `meetings` row plus its
//! `meeting_minutes` row.
//!
//! The physical split: the meeting row carries title, schedule, duration and
//! kind; the minutes row carries the rendered HTML (`full_mom`), the notes
//! (`summary`) and the owner (`created_by`). Presentation metadata with no
//! physical column (speaker, time, link, location, attendee names, priority)
//! rides in a JSON envelope stored in `meetings.description`, so a created
//! template reads back with every field intact.
//!
//! A template is only a template when BOTH rows exist: a flagged meeting row
//! without minutes is treated as not found, never returned half-populated.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use smartmeet_core::entities::{Priority, Template};

use crate::adapter::{new_id, now_rfc3339, tables};
use crate::client::{Row, StoreClient};
use crate::composite;
use crate::errors::{Result, StoreError};
use crate::rows::{decode, MeetingRow, MinutesRow};

/// Fields for creating a template.
#[derive(Clone, Debug, Default)]
pub struct NewTemplate {
    /// Owning user (contact id).
    pub owner_id: String,
    /// List title.
    pub title: String,
    /// Rendered HTML body.
    pub content: String,
    /// Meeting topic.
    pub meeting_topic: String,
    /// Speaker or host.
    pub speaker_name: Option<String>,
    /// Meeting date (`YYYY-MM-DD`).
    pub meeting_date: Option<String>,
    /// Meeting time (`HH:MM`).
    pub meeting_time: Option<String>,
    /// Duration in minutes.
    pub duration_mins: i64,
    /// Join link.
    pub meeting_link: Option<String>,
    /// Physical location.
    pub location: Option<String>,
    /// Planned attendee display names.
    pub attendees: Vec<String>,
    /// Free-form notes / agenda.
    pub notes: Option<String>,
    /// Template kind identifier.
    pub template_kind: Option<String>,
    /// Priority badge.
    pub priority: Priority,
}

/// Partial update; absent fields are left untouched. There is nothing to
/// reject: unknown inbound fields simply have no slot here.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateChanges {
    /// New list title.
    pub title: Option<String>,
    /// New HTML body.
    pub content: Option<String>,
    /// New notes.
    pub notes: Option<String>,
    /// New meeting date.
    pub meeting_date: Option<String>,
    /// New meeting time.
    pub meeting_time: Option<String>,
    /// New duration.
    pub duration_mins: Option<i64>,
    /// New speaker.
    pub speaker_name: Option<String>,
    /// New join link.
    pub meeting_link: Option<String>,
    /// New location.
    pub location: Option<String>,
    /// New priority.
    pub priority: Option<Priority>,
}

/// Outcome of a template create.
///
/// `Unavailable` is the degraded result when the backing store predates the
/// template flag column: the feature is disabled, not broken.
#[derive(Debug)]
pub enum TemplateWrite {
    /// The template was written and reassembled.
    Created(Template),
    /// Template storage is unavailable on this backing store.
    Unavailable,
}

/// Create a template: meeting row first, minutes row second.
///
/// Schema drift on the template flag degrades to
/// [`TemplateWrite::Unavailable`] with a warning. A minutes-row failure
/// after the meeting row committed surfaces as
/// [`StoreError::PartialWrite`].
pub fn create(client: &StoreClient, new: &NewTemplate) -> Result<TemplateWrite> {
    let id = new_id("mtg");
    let created_at = now_rfc3339();
    let code = format!(
        "TEMPLATE_{}",
        chrono::Utc::now().format("%Y%m%d_%H%M%S")
    );

    let envelope = Envelope {
        meeting_topic: new.meeting_topic.clone(),
        speaker_name: new.speaker_name.clone(),
        meeting_date: new.meeting_date.clone(),
        meeting_time: new.meeting_time.clone(),
        meeting_link: new.meeting_link.clone(),
        location: new.location.clone(),
        attendees: new.attendees.clone(),
        priority: new.priority.as_str().to_string(),
    };

    let meeting_row = object(json!({
        "id": id,
        "meeting_code": code,
        "title": new.title,
        "scheduled_at": scheduled_at(&new.meeting_date, &new.meeting_time, &created_at),
        "duration_mins": new.duration_mins,
        "description": serde_json::to_string(&envelope)?,
        "is_template": 1,
        "template_type": new.template_kind,
        "created_at": created_at,
    }));

    let meeting: MeetingRow = match client.insert(tables::MEETINGS, meeting_row) {
        Ok(row) => decode(row)?,
        Err(err) if err.is_schema_drift() => {
            warn!(error = %err, "template storage unavailable, degrading");
            return Ok(TemplateWrite::Unavailable);
        }
        Err(err) => return Err(err),
    };

    let minutes_row = object(json!({
        "meeting_id": meeting.id,
        "summary": new.notes,
        "full_mom": new.content,
        "created_by": new.owner_id,
        "created_at": created_at,
    }));
    let minutes: MinutesRow = composite::dependent(
        "template",
        &meeting.id,
        client.insert(tables::MINUTES, minutes_row).and_then(decode),
    )?;

    Ok(TemplateWrite::Created(assemble(&meeting, &minutes)))
}

/// Fetch one template by id.
///
/// Returns [`StoreError::TemplateNotFound`] when the meeting row is absent,
/// when its minutes row is absent, or when `require_owner` is given and
/// does not match the minutes author.
pub fn get(client: &StoreClient, id: &str, require_owner: Option<&str>) -> Result<Template> {
    let meeting_row = client
        .select(tables::MEETINGS)
        .eq("id", id)
        .eq("is_template", 1)
        .fetch_one()?
        .ok_or_else(|| StoreError::TemplateNotFound(id.to_string()))?;
    let meeting: MeetingRow = decode(meeting_row)?;

    let minutes_row = client
        .select(tables::MINUTES)
        .eq("meeting_id", id)
        .fetch_one()?
        .ok_or_else(|| StoreError::TemplateNotFound(id.to_string()))?;
    let minutes: MinutesRow = decode(minutes_row)?;

    if let Some(owner) = require_owner {
        if minutes.created_by.as_deref() != Some(owner) {
            return Err(StoreError::TemplateNotFound(id.to_string()));
        }
    }

    Ok(assemble(&meeting, &minutes))
}

/// List templates, optionally scoped to one owner.
///
/// The owner filter resolves the minutes rows authored by that owner first
/// and short-circuits to an empty list when there are none, skipping the
/// meeting query entirely. Schema drift on the flag column degrades to an
/// empty list with a warning.
pub fn list(client: &StoreClient, owner: Option<&str>) -> Result<Vec<Template>> {
    let minutes: Vec<MinutesRow> = match owner {
        Some(owner) => {
            let rows = client
                .select(tables::MINUTES)
                .eq("created_by", owner)
                .fetch()?;
            if rows.is_empty() {
                return Ok(Vec::new());
            }
            rows.into_iter().map(decode).collect::<Result<_>>()?
        }
        None => Vec::new(),
    };

    let mut query = client
        .select(tables::MEETINGS)
        .eq("is_template", 1)
        .order_desc("created_at");
    if owner.is_some() {
        let ids: Vec<&str> = minutes.iter().map(|m| m.meeting_id.as_str()).collect();
        query = query.in_set("id", ids);
    }
    let meeting_rows = match query.fetch() {
        Ok(rows) => rows,
        Err(err) if err.is_schema_drift() => {
            warn!(error = %err, "template storage unavailable, returning empty list");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };
    let meetings: Vec<MeetingRow> = meeting_rows
        .into_iter()
        .map(decode)
        .collect::<Result<_>>()?;

    let mut by_meeting: HashMap<String, MinutesRow> = if owner.is_some() {
        minutes
            .into_iter()
            .map(|m| (m.meeting_id.clone(), m))
            .collect()
    } else {
        let ids: Vec<&str> = meetings.iter().map(|m| m.id.as_str()).collect();
        client
            .select(tables::MINUTES)
            .in_set("meeting_id", ids)
            .fetch()?
            .into_iter()
            .map(|row| {
                let minutes: MinutesRow = decode(row)?;
                Ok((minutes.meeting_id.clone(), minutes))
            })
            .collect::<Result<_>>()?
    };

    // Flagged meetings without minutes are not templates; skip them.
    Ok(meetings
        .iter()
        .filter_map(|meeting| {
            by_meeting
                .remove(&meeting.id)
                .map(|minutes| assemble(meeting, &minutes))
        })
        .collect())
}

/// Apply a partial update, splitting fields by destination table.
pub fn update(client: &StoreClient, id: &str, changes: &TemplateChanges) -> Result<Template> {
    let current = get(client, id, None)?;

    let mut envelope = Envelope::from(&current);
    let mut envelope_touched = false;
    for (slot, change) in [
        (&mut envelope.meeting_date, &changes.meeting_date),
        (&mut envelope.meeting_time, &changes.meeting_time),
        (&mut envelope.speaker_name, &changes.speaker_name),
        (&mut envelope.meeting_link, &changes.meeting_link),
        (&mut envelope.location, &changes.location),
    ] {
        if let Some(value) = change {
            *slot = Some(value.clone());
            envelope_touched = true;
        }
    }
    if let Some(priority) = changes.priority {
        envelope.priority = priority.as_str().to_string();
        envelope_touched = true;
    }

    let mut meeting_patch = Row::new();
    if let Some(title) = &changes.title {
        let _ = meeting_patch.insert("title".into(), json!(title));
    }
    if let Some(duration) = changes.duration_mins {
        let _ = meeting_patch.insert("duration_mins".into(), json!(duration));
    }
    if envelope_touched {
        let _ = meeting_patch.insert("description".into(), json!(serde_json::to_string(&envelope)?));
        if changes.meeting_date.is_some() || changes.meeting_time.is_some() {
            let _ = meeting_patch.insert(
                "scheduled_at".into(),
                json!(scheduled_at(
                    &envelope.meeting_date,
                    &envelope.meeting_time,
                    &now_rfc3339(),
                )),
            );
        }
    }
    if !meeting_patch.is_empty() {
        let _ = client
            .update(tables::MEETINGS, meeting_patch)
            .eq("id", id)
            .execute()?;
    }

    let mut minutes_patch = Row::new();
    if let Some(content) = &changes.content {
        let _ = minutes_patch.insert("full_mom".into(), json!(content));
    }
    if let Some(notes) = &changes.notes {
        let _ = minutes_patch.insert("summary".into(), json!(notes));
    }
    if !minutes_patch.is_empty() {
        let _ = client
            .update(tables::MINUTES, minutes_patch)
            .eq("meeting_id", id)
            .execute()?;
    }

    get(client, id, None)
}

/// Delete a template: minutes row first, then the meeting row.
///
/// Returns true only if the meeting-row delete affected at least one row.
/// Distribution history for the template is left in place.
pub fn delete(client: &StoreClient, id: &str) -> Result<bool> {
    let _ = client.delete(tables::MINUTES).eq("meeting_id", id).execute()?;
    let affected = client
        .delete(tables::MEETINGS)
        .eq("id", id)
        .eq("is_template", 1)
        .execute()?;
    Ok(affected > 0)
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal
// ─────────────────────────────────────────────────────────────────────────────

/// Presentation metadata with no physical column, stored as JSON in
/// `meetings.description`.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Envelope {
    meeting_topic: String,
    speaker_name: Option<String>,
    meeting_date: Option<String>,
    meeting_time: Option<String>,
    meeting_link: Option<String>,
    location: Option<String>,
    attendees: Vec<String>,
    priority: String,
}

impl From<&Template> for Envelope {
    fn from(template: &Template) -> Self {
        Self {
            meeting_topic: template.meeting_topic.clone(),
            speaker_name: template.speaker_name.clone(),
            meeting_date: template.meeting_date.clone(),
            meeting_time: template.meeting_time.clone(),
            meeting_link: template.meeting_link.clone(),
            location: template.location.clone(),
            attendees: template.attendees.clone(),
            priority: template.priority.as_str().to_string(),
        }
    }
}

fn assemble(meeting: &MeetingRow, minutes: &MinutesRow) -> Template {
    let envelope: Envelope = meeting
        .description
        .as_deref()
        .and_then(|raw| serde_json::from_str(raw).ok())
        .unwrap_or_default();

    Template {
        id: meeting.id.clone(),
        title: meeting.title.clone(),
        content: minutes.full_mom.clone().unwrap_or_default(),
        owner_id: minutes.created_by.clone().unwrap_or_default(),
        meeting_topic: if envelope.meeting_topic.is_empty() {
            meeting.title.clone()
        } else {
            envelope.meeting_topic
        },
        speaker_name: envelope.speaker_name,
        meeting_date: envelope.meeting_date,
        meeting_time: envelope.meeting_time,
        duration_mins: meeting.duration_mins,
        meeting_link: envelope.meeting_link,
        location: envelope.location,
        attendees: envelope.attendees,
        notes: minutes.summary.clone(),
        template_kind: meeting.template_type.clone(),
        priority: Priority::parse(&envelope.priority),
    }
}

/// Combine date and time into a store timestamp; fall back to the creation
/// instant when either part is missing.
fn scheduled_at(date: &Option<String>, time: &Option<String>, fallback: &str) -> String {
    match (date, time) {
        (Some(date), Some(time)) => format!("{date}T{time}:00Z"),
        (Some(date), None) => format!("{date}T00:00:00Z"),
        _ => fallback.to_string(),
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

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use crate::testing;
    use assert_matches::assert_matches;

    fn sample(owner: &str, topic: &str) -> NewTemplate {
        NewTemplate {
            owner_id: owner.to_string(),
            title: topic.to_string(),
            content: format!("<html>{topic}</html>"),
            meeting_topic: topic.to_string(),
            speaker_name: Some("Avery Chen".into()),
            meeting_date: Some("2026-09-15".into()),
            meeting_time: Some("14:30".into()),
            duration_mins: 45,
            meeting_link: Some("https://meet.example/kickoff".into()),
            location: None,
            attendees: vec!["Sam".into(), "Riley".into()],
            notes: Some("Bring the roadmap".into()),
            template_kind: Some("client_meeting".into()),
            priority: Priority::High,
        }
    }

    fn created(client: &StoreClient, owner: &str, topic: &str) -> Template {
        match create(client, &sample(owner, topic)).unwrap() {
            TemplateWrite::Created(template) => template,
            TemplateWrite::Unavailable => panic!("template storage unexpectedly unavailable"),
        }
    }

    #[test]
    fn create_then_get_round_trips_every_field() {
        let client = testing::client();
        let template = created(&client, "con_owner", "Q3 Kickoff");

        let fetched = get(&client, &template.id, None).unwrap();
        assert_eq!(fetched.title, "Q3 Kickoff");
        assert_eq!(fetched.content, "<html>Q3 Kickoff</html>");
        assert_eq!(fetched.owner_id, "con_owner");
        assert_eq!(fetched.speaker_name.as_deref(), Some("Avery Chen"));
        assert_eq!(fetched.meeting_date.as_deref(), Some("2026-09-15"));
        assert_eq!(fetched.meeting_time.as_deref(), Some("14:30"));
        assert_eq!(fetched.duration_mins, 45);
        assert_eq!(fetched.meeting_link.as_deref(), Some("https://meet.example/kickoff"));
        assert_eq!(fetched.attendees, vec!["Sam", "Riley"]);
        assert_eq!(fetched.notes.as_deref(), Some("Bring the roadmap"));
        assert_eq!(fetched.template_kind.as_deref(), Some("client_meeting"));
        assert_eq!(fetched.priority, Priority::High);
    }

    #[test]
    fn create_on_drifted_store_degrades_to_unavailable() {
        let client = testing::drifted_client();
        let outcome = create(&client, &sample("con_owner", "Kickoff")).unwrap();
        assert_matches!(outcome, TemplateWrite::Unavailable);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let client = testing::client();
        let err = get(&client, "mtg_missing", None).unwrap_err();
        assert_matches!(err, StoreError::TemplateNotFound(_));
    }

    #[test]
    fn get_with_missing_minutes_is_not_found() {
        let client = testing::client();
        let template = created(&client, "con_owner", "Kickoff");

        // Minutes removed out-of-band: the flagged meeting row alone is
        // not a template.
        client
            .delete(tables::MINUTES)
            .eq("meeting_id", template.id.as_str())
            .execute()
            .unwrap();

        let err = get(&client, &template.id, None).unwrap_err();
        assert_matches!(err, StoreError::TemplateNotFound(_));
    }

    #[test]
    fn get_with_wrong_owner_is_not_found() {
        let client = testing::client();
        let template = created(&client, "con_a", "Kickoff");

        assert!(get(&client, &template.id, Some("con_a")).is_ok());
        let err = get(&client, &template.id, Some("con_b")).unwrap_err();
        assert_matches!(err, StoreError::TemplateNotFound(_));
    }

    #[test]
    fn list_scopes_to_owner() {
        let client = testing::client();
        created(&client, "con_a", "A one");
        created(&client, "con_a", "A two");
        created(&client, "con_b", "B one");

        let for_a = list(&client, Some("con_a")).unwrap();
        assert_eq!(for_a.len(), 2);
        assert!(for_a.iter().all(|t| t.owner_id == "con_a"));

        let all = list(&client, None).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn list_for_unknown_owner_is_empty() {
        let client = testing::client();
        created(&client, "con_a", "A one");
        assert!(list(&client, Some("con_nobody")).unwrap().is_empty());
    }

    #[test]
    fn list_skips_flagged_meetings_without_minutes() {
        let client = testing::client();
        let template = created(&client, "con_a", "Kickoff");
        created(&client, "con_a", "Retro");

        client
            .delete(tables::MINUTES)
            .eq("meeting_id", template.id.as_str())
            .execute()
            .unwrap();

        let all = list(&client, None).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].title, "Retro");
    }

    #[test]
    fn list_on_drifted_store_is_empty() {
        let client = testing::drifted_client();
        assert!(list(&client, None).unwrap().is_empty());
    }

    #[test]
    fn update_splits_fields_across_tables() {
        let client = testing::client();
        let template = created(&client, "con_a", "Kickoff");

        let changes = TemplateChanges {
            title: Some("Kickoff v2".into()),
            content: Some("<html>v2</html>".into()),
            notes: Some("Updated agenda".into()),
            meeting_time: Some("16:00".into()),
            priority: Some(Priority::Urgent),
            ..TemplateChanges::default()
        };
        let updated = update(&client, &template.id, &changes).unwrap();

        assert_eq!(updated.title, "Kickoff v2");
        assert_eq!(updated.content, "<html>v2</html>");
        assert_eq!(updated.notes.as_deref(), Some("Updated agenda"));
        assert_eq!(updated.meeting_time.as_deref(), Some("16:00"));
        assert_eq!(updated.priority, Priority::Urgent);
        // Untouched fields survive.
        assert_eq!(updated.meeting_date.as_deref(), Some("2026-09-15"));
        assert_eq!(updated.speaker_name.as_deref(), Some("Avery Chen"));
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let client = testing::client();
        let err = update(&client, "mtg_missing", &TemplateChanges::default()).unwrap_err();
        assert_matches!(err, StoreError::TemplateNotFound(_));
    }

    #[test]
    fn delete_reports_whether_meeting_row_existed() {
        let client = testing::client();
        let template = created(&client, "con_a", "Kickoff");

        assert!(delete(&client, &template.id).unwrap());
        assert!(!delete(&client, &template.id).unwrap());
        assert_matches!(
            get(&client, &template.id, None).unwrap_err(),
            StoreError::TemplateNotFound(_)
        );
    }
}
