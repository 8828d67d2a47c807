//! The fixed set of invitation template kinds.

use serde::Serialize;

/// Every invitation template the system offers. The set is fixed; adding a
/// kind means adding a variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TemplateKind {
    /// Formal internal meeting.
    FormalInternal,
    /// Casual internal chat.
    CasualInternal,
    /// Meeting with a client.
    ClientMeeting,
    /// Meeting with a partner.
    PartnerMeeting,
    /// Meeting with a vendor.
    VendorMeeting,
    /// Investor update.
    InvestorMeeting,
    /// Daily standup.
    TeamStandup,
    /// Project review.
    ProjectReview,
}

/// Catalog entry for the template picker.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateKindInfo {
    /// Stable kind identifier.
    pub id: &'static str,
    /// Human-facing name.
    pub name: &'static str,
}

impl TemplateKind {
    /// All kinds, in catalog order.
    pub const ALL: [Self; 8] = [
        Self::FormalInternal,
        Self::CasualInternal,
        Self::ClientMeeting,
        Self::PartnerMeeting,
        Self::VendorMeeting,
        Self::InvestorMeeting,
        Self::TeamStandup,
        Self::ProjectReview,
    ];

    /// Stable identifier, stored with templates.
    pub fn id(self) -> &'static str {
        match self {
            Self::FormalInternal => "formal_internal",
            Self::CasualInternal => "casual_internal",
            Self::ClientMeeting => "client_meeting",
            Self::PartnerMeeting => "partner_meeting",
            Self::VendorMeeting => "vendor_meeting",
            Self::InvestorMeeting => "investor_meeting",
            Self::TeamStandup => "team_standup",
            Self::ProjectReview => "project_review",
        }
    }

    /// Human-facing name.
    pub fn label(self) -> &'static str {
        match self {
            Self::FormalInternal => "Formal Internal Meeting",
            Self::CasualInternal => "Casual Internal Meeting",
            Self::ClientMeeting => "Client Meeting",
            Self::PartnerMeeting => "Partner Meeting",
            Self::VendorMeeting => "Vendor Meeting",
            Self::InvestorMeeting => "Investor Meeting",
            Self::TeamStandup => "Team Standup",
            Self::ProjectReview => "Project Review",
        }
    }

    /// Uppercase badge shown in the card header.
    pub fn badge(self) -> &'static str {
        match self {
            Self::FormalInternal => "TEAM MEETING",
            Self::CasualInternal => "QUICK CHAT",
            Self::ClientMeeting => "CLIENT MEETING",
            Self::PartnerMeeting => "PARTNER MEETING",
            Self::VendorMeeting => "VENDOR MEETING",
            Self::InvestorMeeting => "INVESTOR MEETING",
            Self::TeamStandup => "TEAM STANDUP",
            Self::ProjectReview => "PROJECT REVIEW",
        }
    }

    /// Email subject line for a given meeting topic.
    pub fn subject(self, topic: &str) -> String {
        let prefix = match self {
            Self::FormalInternal => "Meeting Invitation",
            Self::CasualInternal => "Quick Chat",
            Self::ClientMeeting => "Meeting Request",
            Self::PartnerMeeting => "Partnership Discussion",
            Self::VendorMeeting => "Vendor Discussion",
            Self::InvestorMeeting => "Investor Update",
            Self::TeamStandup => "Daily Standup",
            Self::ProjectReview => "Project Review",
        };
        format!("{prefix}: {topic}")
    }

    /// Parse a stable identifier.
    pub fn parse(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }
}

/// The catalog, for the picker endpoint.
pub fn available() -> Vec<TemplateKindInfo> {
    TemplateKind::ALL
        .into_iter()
        .map(|kind| TemplateKindInfo {
            id: kind.id(),
            name: kind.label(),
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
