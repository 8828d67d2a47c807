//! Logical entity shapes.
//!
//! All types serialize to camelCase JSON for the API surface. None of them
//! carry physical table or column names — reshaping to and from the backing
//! store happens entirely inside `smartmeet-store`.

use serde::{Deserialize, Serialize};

/// Contact classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberType {
    /// Employee of the hosting organization.
    Internal,
    /// Client, partner, vendor or other outside party.
    External,
}

impl MemberType {
    /// Stable string form used by the backing store and query params.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Internal => "internal",
            Self::External => "external",
        }
    }

    /// Parse from the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "internal" => Some(Self::Internal),
            "external" => Some(Self::External),
            _ => None,
        }
    }
}

/// How a distribution is delivered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    /// SMTP email.
    Email,
    /// Messaging-app API (phone-number recipients).
    Messaging,
}

impl DeliveryMethod {
    /// Stable string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Messaging => "messaging",
        }
    }

    /// Parse from the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "email" => Some(Self::Email),
            "messaging" => Some(Self::Messaging),
            _ => None,
        }
    }
}

/// Lifecycle state of a distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    /// Created but not yet handed to a transport.
    Pending,
    /// At least one recipient was delivered to.
    Sent,
    /// Every delivery attempt failed.
    Failed,
}

impl DeliveryStatus {
    /// Stable string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Sent => "sent",
            Self::Failed => "failed",
        }
    }

    /// Parse from the stable string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "sent" => Some(Self::Sent),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Invitation priority, rendered as a colored badge.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    /// Low priority (green badge).
    Low,
    /// Medium priority (amber badge). The default.
    #[default]
    Medium,
    /// High priority (red badge).
    High,
    /// Urgent (red badge).
    Urgent,
}

impl Priority {
    /// Display label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }

    /// Badge color hex used by the invitation renderer.
    pub fn color(self) -> &'static str {
        match self {
            Self::Low => "#28a745",
            Self::Medium => "#ffc107",
            Self::High | Self::Urgent => "#dc3545",
        }
    }

    /// Parse a label, case-insensitively. Unknown labels fall back to Medium.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            "urgent" => Self::Urgent,
            _ => Self::Medium,
        }
    }
}

/// A distribution recipient — either an email address or a phone number.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recipient {
    /// Email recipient.
    Email(String),
    /// Phone-number recipient (messaging delivery).
    Phone(String),
}

impl Recipient {
    /// The raw address, regardless of kind.
    pub fn address(&self) -> &str {
        match self {
            Self::Email(s) | Self::Phone(s) => s,
        }
    }
}

/// A person in the directory. Users and contacts share this shape — a user
/// is a contact with `member_type = internal`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Contact id.
    pub id: String,
    /// Email address (unique).
    pub email: String,
    /// Display name.
    pub name: String,
    /// Internal member or external contact.
    pub member_type: MemberType,
    /// Owning organization, when known.
    pub organization_id: Option<String>,
    /// Free-form status (`active`, ...).
    pub status: Option<String>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
}

/// Authentication-facing view of a contact.
pub type User = Contact;

/// An organization contacts belong to.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    /// Organization id.
    pub id: String,
    /// Organization name.
    pub name: String,
    /// Email domain, when known.
    pub domain: Option<String>,
}

/// A scheduled meeting (non-template rows in the backing store).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    /// Meeting id.
    pub id: String,
    /// Owning organization, when known.
    pub organization_id: Option<String>,
    /// Human-facing meeting code.
    pub meeting_code: String,
    /// Meeting title.
    pub title: String,
    /// Scheduled start (RFC 3339).
    pub scheduled_at: String,
    /// Duration in minutes.
    pub duration_mins: i64,
    /// Free-form description.
    pub description: Option<String>,
    /// Attendee list, populated by the with-attendees read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attendees: Option<Vec<Recipient>>,
}

/// A generated invitation template.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Template id.
    pub id: String,
    /// Title shown in lists (usually the meeting topic).
    pub title: String,
    /// Rendered HTML body.
    pub content: String,
    /// User that generated the template.
    pub owner_id: String,
    /// Topic of the meeting being invited to.
    pub meeting_topic: String,
    /// Speaker or host name.
    pub speaker_name: Option<String>,
    /// Meeting date (`YYYY-MM-DD`).
    pub meeting_date: Option<String>,
    /// Meeting time (`HH:MM`).
    pub meeting_time: Option<String>,
    /// Duration in minutes.
    pub duration_mins: i64,
    /// Join link, when the meeting is remote.
    pub meeting_link: Option<String>,
    /// Physical location, when in person.
    pub location: Option<String>,
    /// Planned attendee display list.
    pub attendees: Vec<String>,
    /// Additional notes / agenda.
    pub notes: Option<String>,
    /// Template kind identifier (e.g. `client_meeting`).
    pub template_kind: Option<String>,
    /// Priority badge.
    pub priority: Priority,
}

/// A record of sending a template to a set of recipients.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    /// Distribution id.
    pub id: String,
    /// Template that was sent.
    pub template_id: String,
    /// Delivery method.
    pub method: DeliveryMethod,
    /// Accumulated recipient list for the template.
    pub recipients: Vec<Recipient>,
    /// Delivery status.
    pub status: DeliveryStatus,
    /// When the send completed, if it did.
    pub sent_at: Option<String>,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Owner resolved via the template's author. `None` when the owner
    /// chain could not be resolved.
    pub owner_id: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
