//! The [`InviteStore`] facade — the one type the rest of the application
//! talks to.
//!
//! Owns the store client and the per-template append locks. Every method is
//! a thin delegation to the stateless adapter modules; the only policy that
//! lives here is serializing the recipient read-merge-write per template so
//! concurrent sends against the same template cannot lose appends.

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use smartmeet_core::entities::{
    Contact, DeliveryStatus, Distribution, Meeting, MemberType, Organization, Recipient, Template,
    User,
};

use crate::adapter::contacts::{self, NewContact};
use crate::adapter::distributions::{self, NewDistribution};
use crate::adapter::filter::{self, DistributionFilter};
use crate::adapter::meetings::{self, NewMeeting};
use crate::adapter::organizations::{self, NewOrganization};
use crate::adapter::templates::{self, NewTemplate, TemplateChanges, TemplateWrite};
use crate::client::{self, ConnectionConfig, ConnectionPool, StoreClient};
use crate::errors::Result;
use crate::migrations::run_migrations;

/// Facade over the persistence adapter.
pub struct InviteStore {
    client: StoreClient,
    recipient_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl InviteStore {
    /// Open (or create) a file-backed store and run pending migrations.
    pub fn open(path: &str, config: &ConnectionConfig) -> Result<Self> {
        let pool = client::new_file(path, config)?;
        Self::from_pool(pool)
    }

    /// An in-memory store with the full schema, for tests and demo mode.
    pub fn in_memory() -> Result<Self> {
        let pool = client::new_in_memory(&ConnectionConfig::default())?;
        Self::from_pool(pool)
    }

    /// Wrap an existing pool, running pending migrations first.
    pub fn from_pool(pool: ConnectionPool) -> Result<Self> {
        let conn = pool.get()?;
        let _ = run_migrations(&conn)?;
        drop(conn);
        Ok(Self {
            client: StoreClient::new(pool),
            recipient_locks: DashMap::new(),
        })
    }

    // ── Templates ────────────────────────────────────────────────────────

    /// Create a template. See [`templates::create`] for the degradation
    /// and partial-write semantics.
    pub fn create_template(&self, new: &NewTemplate) -> Result<TemplateWrite> {
        templates::create(&self.client, new)
    }

    /// Fetch a template, optionally requiring a specific owner.
    pub fn template(&self, id: &str, require_owner: Option<&str>) -> Result<Template> {
        templates::get(&self.client, id, require_owner)
    }

    /// List templates, optionally scoped to one owner.
    pub fn templates(&self, owner: Option<&str>) -> Result<Vec<Template>> {
        templates::list(&self.client, owner)
    }

    /// Apply a partial template update.
    pub fn update_template(&self, id: &str, changes: &TemplateChanges) -> Result<Template> {
        templates::update(&self.client, id, changes)
    }

    /// Delete a template. Returns whether the meeting row existed.
    pub fn delete_template(&self, id: &str) -> Result<bool> {
        templates::delete(&self.client, id)
    }

    // ── Distributions ────────────────────────────────────────────────────

    /// Record a send, serializing the recipient append per template.
    pub fn record_distribution(&self, new: &NewDistribution) -> Result<Distribution> {
        let lock = self.append_lock(&new.template_id);
        let _guard = lock.lock();
        distributions::create(&self.client, new)
    }

    /// Fetch one distribution.
    pub fn distribution(&self, id: &str) -> Result<Distribution> {
        distributions::get(&self.client, id)
    }

    /// Update a distribution's delivery status.
    pub fn set_distribution_status(
        &self,
        id: &str,
        status: DeliveryStatus,
    ) -> Result<Distribution> {
        distributions::set_status(&self.client, id, status)
    }

    /// List distributions matching the filter.
    pub fn distributions(&self, filter: &DistributionFilter) -> Result<Vec<Distribution>> {
        filter::list(&self.client, filter)
    }

    /// Count distributions matching the filter.
    pub fn count_distributions(&self, filter: &DistributionFilter) -> Result<usize> {
        filter::count(&self.client, filter)
    }

    /// The accumulated recipient history for a template.
    pub fn recipients_for_template(&self, template_id: &str) -> Result<Vec<Recipient>> {
        distributions::recipients_for(&self.client, template_id)
    }

    // ── Contacts / users ─────────────────────────────────────────────────

    /// Create a contact.
    pub fn create_contact(&self, new: &NewContact) -> Result<Contact> {
        contacts::create(&self.client, new)
    }

    /// Fetch one contact.
    pub fn contact(&self, id: &str) -> Result<Contact> {
        contacts::get(&self.client, id)
    }

    /// Look a contact up by email.
    pub fn contact_by_email(&self, email: &str) -> Result<Option<Contact>> {
        contacts::find_by_email(&self.client, email)
    }

    /// List contacts, optionally restricted to one member type.
    pub fn contacts(&self, member_type: Option<MemberType>) -> Result<Vec<Contact>> {
        contacts::list(&self.client, member_type)
    }

    /// Get-or-create a user by email.
    pub fn find_or_create_user(&self, email: &str, display_name: &str) -> Result<User> {
        contacts::find_or_create_user(&self.client, email, display_name)
    }

    // ── Organizations ────────────────────────────────────────────────────

    /// Create an organization.
    pub fn create_organization(&self, new: &NewOrganization) -> Result<Organization> {
        organizations::create(&self.client, new)
    }

    /// Fetch one organization.
    pub fn organization(&self, id: &str) -> Result<Organization> {
        organizations::get(&self.client, id)
    }

    /// List all organizations.
    pub fn organizations(&self) -> Result<Vec<Organization>> {
        organizations::list(&self.client)
    }

    /// Look an organization up by name, creating it when absent.
    pub fn get_or_create_organization(
        &self,
        name: &str,
        domain: Option<&str>,
    ) -> Result<Organization> {
        organizations::get_or_create(&self.client, name, domain)
    }

    // ── Meetings ─────────────────────────────────────────────────────────

    /// Schedule a meeting.
    pub fn schedule_meeting(&self, new: &NewMeeting) -> Result<Meeting> {
        meetings::create(&self.client, new)
    }

    /// Fetch one meeting.
    pub fn meeting(&self, id: &str) -> Result<Meeting> {
        meetings::get(&self.client, id)
    }

    /// Fetch one meeting with its attendee list populated.
    pub fn meeting_with_attendees(&self, id: &str) -> Result<Meeting> {
        meetings::get_with_attendees(&self.client, id)
    }

    /// List meetings, optionally restricted to one organization.
    pub fn meetings(&self, organization_id: Option<&str>) -> Result<Vec<Meeting>> {
        meetings::list(&self.client, organization_id)
    }

    /// Meetings starting at or after now.
    pub fn upcoming_meetings(&self) -> Result<Vec<Meeting>> {
        meetings::upcoming(&self.client)
    }

    // ── Internal ─────────────────────────────────────────────────────────

    fn append_lock(&self, template_id: &str) -> Arc<Mutex<()>> {
        self.recipient_locks
            .entry(template_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
#[allow(unused_results)]
mod tests {
    use super::*;
    use smartmeet_core::entities::DeliveryMethod;

    fn store() -> InviteStore {
        InviteStore::in_memory().unwrap()
    }

    fn template(store: &InviteStore, owner: &str) -> Template {
        let new = NewTemplate {
            owner_id: owner.to_string(),
            title: "Kickoff".into(),
            content: "<html></html>".into(),
            meeting_topic: "Kickoff".into(),
            duration_mins: 30,
            ..NewTemplate::default()
        };
        match store.create_template(&new).unwrap() {
            TemplateWrite::Created(t) => t,
            TemplateWrite::Unavailable => panic!("template storage unavailable"),
        }
    }

    #[test]
    fn facade_wires_create_and_fetch_paths() {
        let store = store();
        let user = store.find_or_create_user("amy@example.com", "Amy").unwrap();
        let created = template(&store, &user.id);

        assert_eq!(store.template(&created.id, None).unwrap().id, created.id);
        assert_eq!(store.templates(Some(&user.id)).unwrap().len(), 1);
        assert!(store.delete_template(&created.id).unwrap());
    }

    #[test]
    fn concurrent_sends_to_one_template_lose_no_appends() {
        let store = Arc::new(store());
        let created = template(&store, "con_owner");

        let mut handles = Vec::new();
        for i in 0..4 {
            let store = Arc::clone(&store);
            let template_id = created.id.clone();
            handles.push(std::thread::spawn(move || {
                store
                    .record_distribution(&NewDistribution {
                        template_id,
                        method: DeliveryMethod::Email,
                        recipients: vec![
                            Recipient::Email(format!("a{i}@x.com")),
                            Recipient::Email(format!("b{i}@x.com")),
                        ],
                        status: DeliveryStatus::Sent,
                    })
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let history = store.recipients_for_template(&created.id).unwrap();
        assert_eq!(history.len(), 8);
    }

    #[test]
    fn open_creates_a_file_backed_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invites.db");
        let store =
            InviteStore::open(path.to_str().unwrap(), &ConnectionConfig::default()).unwrap();
        assert!(store.organizations().unwrap().is_empty());
        assert!(path.exists());
    }
}
