//! Physical row types for the fixed backing-store tables.
//!
//! These represent the raw row shape — not the logical entities. Reassembly
//! into [`smartmeet_core::entities`] types happens in the adapter layer, and
//! nothing above the adapter ever sees these structs.

use serde::Deserialize;
use serde_json::Value;

use crate::client::Row;
use crate::errors::Result;

/// Decode a client row into a typed physical row.
pub fn decode<T: serde::de::DeserializeOwned>(row: Row) -> Result<T> {
    Ok(serde_json::from_value(Value::Object(row))?)
}

/// Raw row from the `contacts` table.
#[derive(Clone, Debug, Deserialize)]
pub struct ContactRow {
    /// Contact id.
    pub id: String,
    /// Email address (unique at the store).
    pub email: String,
    /// Display name.
    pub name: Option<String>,
    /// `internal` or `external`.
    pub member_type: String,
    /// Owning organization id.
    pub organization_id: Option<String>,
    /// Free-form status.
    pub status: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Raw row from the `organizations` table.
#[derive(Clone, Debug, Deserialize)]
pub struct OrganizationRow {
    /// Organization id.
    pub id: String,
    /// Organization name.
    pub name: String,
    /// Email domain.
    pub domain: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Raw row from the `meetings` table. Backs both scheduled meetings
/// (`is_template = 0`) and templates (`is_template = 1`).
#[derive(Clone, Debug, Deserialize)]
pub struct MeetingRow {
    /// Meeting id.
    pub id: String,
    /// Owning organization id.
    pub organization_id: Option<String>,
    /// Natural key; synthetic `TEMPLATE_…` code for template rows.
    pub meeting_code: String,
    /// Title.
    pub title: String,
    /// Scheduled start.
    pub scheduled_at: String,
    /// Duration in minutes.
    pub duration_mins: i64,
    /// Description; template rows store a JSON metadata envelope here.
    pub description: Option<String>,
    /// Template flag (0/1).
    pub is_template: i64,
    /// Template kind identifier for template rows.
    pub template_type: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Raw row from the `meeting_minutes` table (one per meeting).
#[derive(Clone, Debug, Deserialize)]
pub struct MinutesRow {
    /// Owning meeting id (primary key).
    pub meeting_id: String,
    /// Notes; templates keep their free-form notes here.
    pub summary: Option<String>,
    /// Full body; templates keep their rendered HTML here.
    pub full_mom: Option<String>,
    /// Authoring contact id.
    pub created_by: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// Raw row from the `social_posts` table. Backs distributions.
#[derive(Clone, Debug, Deserialize)]
pub struct SocialPostRow {
    /// Post id.
    pub id: String,
    /// Meeting (template) the post belongs to. Logical reference only.
    pub meeting_id: String,
    /// Delivery platforms as a JSON array string.
    pub platforms: String,
    /// `pending`, `sent` or `failed`.
    pub status: String,
    /// When delivery completed.
    pub published_at: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Last status change.
    pub updated_at: Option<String>,
}

/// Raw row from the `meeting_attendees` table (one accumulating list
/// per meeting).
#[derive(Clone, Debug, Deserialize)]
pub struct AttendeeRow {
    /// Owning meeting id (primary key).
    pub meeting_id: String,
    /// Recipient list as a JSON array string.
    pub attendees: String,
    /// Last append.
    pub updated_at: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
