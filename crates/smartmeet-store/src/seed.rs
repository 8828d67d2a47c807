//! Demo data seeding.
//!
//! Populates a demo organization and a small contact directory so a fresh
//! install has recipients to send to. Idempotent: contacts are keyed by
//! email and existing rows are skipped, so running the seed on every boot
//! is safe.

use tracing::info;

use smartmeet_core::entities::MemberType;

use crate::adapter::contacts::NewContact;
use crate::errors::Result;
use crate::store::InviteStore;

const DEMO_ORGANIZATION: &str = "Smartmeet Demo";

const DEMO_CONTACTS: &[(&str, &str, MemberType)] = &[
    ("amy.lee@smartmeet.test", "Amy Lee", MemberType::Internal),
    ("raj.patel@smartmeet.test", "Raj Patel", MemberType::Internal),
    ("sofia.mora@smartmeet.test", "Sofia Mora", MemberType::Internal),
    ("client@acme.test", "Jordan Price", MemberType::External),
    ("partner@northwind.test", "Casey Brook", MemberType::External),
];

/// Seed the demo organization and contacts. Returns how many contacts were
/// newly inserted.
pub fn seed_demo_data(store: &InviteStore) -> Result<usize> {
    let organization = store.get_or_create_organization(DEMO_ORGANIZATION, Some("smartmeet.test"))?;

    let mut inserted = 0;
    for (email, name, member_type) in DEMO_CONTACTS {
        if store.contact_by_email(email)?.is_some() {
            continue;
        }
        let _ = store.create_contact(&NewContact {
            email: (*email).to_string(),
            name: (*name).to_string(),
            member_type: *member_type,
            organization_id: Some(organization.id.clone()),
        })?;
        inserted += 1;
    }

    if inserted > 0 {
        info!(inserted, organization = %organization.name, "seeded demo contacts");
    }
    Ok(inserted)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_populates_directory() {
        let store = InviteStore::in_memory().unwrap();
        let inserted = seed_demo_data(&store).unwrap();
        assert_eq!(inserted, DEMO_CONTACTS.len());

        let internal = store.contacts(Some(MemberType::Internal)).unwrap();
        assert_eq!(internal.len(), 3);
        assert_eq!(store.organizations().unwrap().len(), 1);
    }

    #[test]
    fn seed_is_idempotent() {
        let store = InviteStore::in_memory().unwrap();
        assert_eq!(seed_demo_data(&store).unwrap(), DEMO_CONTACTS.len());
        assert_eq!(seed_demo_data(&store).unwrap(), 0);
        assert_eq!(store.organizations().unwrap().len(), 1);
    }
}
