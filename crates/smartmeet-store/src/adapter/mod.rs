//! Schema adapter — logical CRUD per entity over the fixed physical schema.
//!
//! Each submodule owns one logical entity and is stateless: functions take
//! the [`StoreClient`](crate::client::StoreClient) and translate between the
//! entity shape and however many physical rows back it. Table and column
//! names stop here; nothing above this layer sees them.

pub mod contacts;
pub mod distributions;
pub mod filter;
pub mod meetings;
pub mod organizations;
pub mod templates;

use chrono::Utc;
use uuid::Uuid;

/// Table names of the fixed external schema.
pub(crate) mod tables {
    pub const CONTACTS: &str = "contacts";
    pub const ORGANIZATIONS: &str = "organizations";
    pub const MEETINGS: &str = "meetings";
    pub const MINUTES: &str = "meeting_minutes";
    pub const SOCIAL_POSTS: &str = "social_posts";
    pub const ATTENDEES: &str = "meeting_attendees";
}

/// Generate a prefixed, time-ordered id (`con_`, `org_`, `mtg_`, `post_`).
pub(crate) fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::now_v7().simple())
}

/// Current instant as an RFC 3339 string, the store's timestamp format.
pub(crate) fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
