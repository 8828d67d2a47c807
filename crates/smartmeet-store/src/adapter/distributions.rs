//! Distribution entity — backed by a `social_posts` row plus the
//! template's accumulating `meeting_attendees` row.
//!
//! Each send creates its own post row; recipients accumulate on a single
//! attendee row per template via read-merge-write. The merge appends, never
//! dedupes, and preserves order, so the attendee row is a full send history.
//! Callers that can race on the same template must serialize the append
//! (the [`InviteStore`](crate::store::InviteStore) facade holds a
//! per-template lock for this).
//!
//! A distribution has no owner column; its owner is the author of the
//! template's minutes row, resolved on read. A broken chain resolves to no
//! owner rather than an error.

use serde_json::{json, Value};

use smartmeet_core::entities::{DeliveryMethod, DeliveryStatus, Distribution, Recipient};

use crate::adapter::{new_id, now_rfc3339, tables};
use crate::client::{Row, StoreClient};
use crate::composite;
use crate::errors::{Result, StoreError};
use crate::rows::{decode, AttendeeRow, MinutesRow, SocialPostRow};

/// Fields for recording a send.
#[derive(Clone, Debug)]
pub struct NewDistribution {
    /// Template the invitation was sent from.
    pub template_id: String,
    /// Delivery method.
    pub method: DeliveryMethod,
    /// Recipients of this send, appended to the template's history.
    pub recipients: Vec<Recipient>,
    /// Outcome status of this send.
    pub status: DeliveryStatus,
}

/// Record a send: post row first, recipient append second.
///
/// A recipient-append failure after the post row committed surfaces as
/// [`StoreError::PartialWrite`].
pub fn create(client: &StoreClient, new: &NewDistribution) -> Result<Distribution> {
    let created_at = now_rfc3339();
    let post_row = object(json!({
        "id": new_id("post"),
        "meeting_id": new.template_id,
        "platforms": serde_json::to_string(&[new.method.as_str()])?,
        "status": new.status.as_str(),
        "published_at": matches!(new.status, DeliveryStatus::Sent).then(|| created_at.clone()),
        "created_at": created_at,
        "updated_at": created_at,
    }));
    let post: SocialPostRow = client.insert(tables::SOCIAL_POSTS, post_row).and_then(decode)?;

    let recipients = if new.recipients.is_empty() {
        recipients_for(client, &new.template_id)?
    } else {
        composite::dependent(
            "distribution",
            &post.id,
            append_recipients(client, &new.template_id, &new.recipients),
        )?
    };

    let owner = resolve_owner(client, &new.template_id)?;
    Ok(from_parts(&post, recipients, owner))
}

/// Fetch one distribution by id, resolving recipients and owner.
pub fn get(client: &StoreClient, id: &str) -> Result<Distribution> {
    let post_row = client
        .select(tables::SOCIAL_POSTS)
        .eq("id", id)
        .fetch_one()?
        .ok_or_else(|| StoreError::DistributionNotFound(id.to_string()))?;
    let post: SocialPostRow = decode(post_row)?;

    let recipients = recipients_for(client, &post.meeting_id)?;
    let owner = resolve_owner(client, &post.meeting_id)?;
    Ok(from_parts(&post, recipients, owner))
}

/// Update a distribution's status. Moving to `Sent` stamps `published_at`.
pub fn set_status(client: &StoreClient, id: &str, status: DeliveryStatus) -> Result<Distribution> {
    let now = now_rfc3339();
    let mut patch = Row::new();
    let _ = patch.insert("status".into(), json!(status.as_str()));
    let _ = patch.insert("updated_at".into(), json!(now));
    if matches!(status, DeliveryStatus::Sent) {
        let _ = patch.insert("published_at".into(), json!(now));
    }

    let affected = client
        .update(tables::SOCIAL_POSTS, patch)
        .eq("id", id)
        .execute()?;
    if affected == 0 {
        return Err(StoreError::DistributionNotFound(id.to_string()));
    }
    get(client, id)
}

/// The accumulated recipient history for a template. Empty when no send has
/// recorded recipients yet.
pub fn recipients_for(client: &StoreClient, template_id: &str) -> Result<Vec<Recipient>> {
    let row = client
        .select(tables::ATTENDEES)
        .eq("meeting_id", template_id)
        .fetch_one()?;
    match row {
        Some(row) => {
            let attendees: AttendeeRow = decode(row)?;
            Ok(parse_recipients(&attendees.attendees))
        }
        None => Ok(Vec::new()),
    }
}

/// Append recipients to the template's attendee row (read-merge-write).
/// Returns the merged list.
pub fn append_recipients(
    client: &StoreClient,
    template_id: &str,
    new: &[Recipient],
) -> Result<Vec<Recipient>> {
    let existing = client
        .select(tables::ATTENDEES)
        .eq("meeting_id", template_id)
        .fetch_one()?;

    match existing {
        Some(row) => {
            let attendees: AttendeeRow = decode(row)?;
            let mut merged = parse_recipients(&attendees.attendees);
            merged.extend_from_slice(new);

            let mut patch = Row::new();
            let _ = patch.insert("attendees".into(), json!(serde_json::to_string(&merged)?));
            let _ = patch.insert("updated_at".into(), json!(now_rfc3339()));
            let _ = client
                .update(tables::ATTENDEES, patch)
                .eq("meeting_id", template_id)
                .execute()?;
            Ok(merged)
        }
        None => {
            let merged = new.to_vec();
            let row = object(json!({
                "meeting_id": template_id,
                "attendees": serde_json::to_string(&merged)?,
                "updated_at": now_rfc3339(),
            }));
            let _ = client.insert(tables::ATTENDEES, row)?;
            Ok(merged)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal
// ─────────────────────────────────────────────────────────────────────────────

/// Resolve the two-hop owner chain: post → template minutes → author.
pub(crate) fn resolve_owner(client: &StoreClient, template_id: &str) -> Result<Option<String>> {
    let row = client
        .select(tables::MINUTES)
        .eq("meeting_id", template_id)
        .fetch_one()?;
    match row {
        Some(row) => {
            let minutes: MinutesRow = decode(row)?;
            Ok(minutes.created_by)
        }
        None => Ok(None),
    }
}

pub(crate) fn from_parts(
    post: &SocialPostRow,
    recipients: Vec<Recipient>,
    owner: Option<String>,
) -> Distribution {
    Distribution {
        id: post.id.clone(),
        template_id: post.meeting_id.clone(),
        method: parse_method(&post.platforms),
        recipients,
        status: DeliveryStatus::parse(&post.status).unwrap_or(DeliveryStatus::Pending),
        sent_at: post.published_at.clone(),
        created_at: post.created_at.clone(),
        owner_id: owner,
    }
}

/// First platform entry names the method; anything unrecognized reads as
/// email, the original delivery channel.
pub(crate) fn parse_method(platforms: &str) -> DeliveryMethod {
    serde_json::from_str::<Vec<String>>(platforms)
        .ok()
        .and_then(|list| list.first().and_then(|m| DeliveryMethod::parse(m)))
        .unwrap_or(DeliveryMethod::Email)
}

pub(crate) fn parse_recipients(raw: &str) -> Vec<Recipient> {
    serde_json::from_str(raw).unwrap_or_default()
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
