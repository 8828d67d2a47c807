//! Contact entity and the identity resolver.
//!
//! Users and contacts share one physical representation: a user is a
//! `contacts` row with `member_type = internal`. The get-or-create path
//! closes the check-then-insert race at the store, not in memory — the
//! UNIQUE email constraint rejects the losing insert and the loser re-reads
//! the winner's row.

use serde_json::{json, Value};

use smartmeet_core::entities::{Contact, MemberType, User};
use smartmeet_core::validation::validate_email;

use crate::adapter::{new_id, now_rfc3339, tables};
use crate::client::{Row, StoreClient};
use crate::errors::{Result, StoreError};
use crate::rows::{decode, ContactRow};

/// Fields for creating a contact.
#[derive(Clone, Debug)]
pub struct NewContact {
    /// Email address (unique at the store).
    pub email: String,
    /// Display name.
    pub name: String,
    /// Internal member or external contact.
    pub member_type: MemberType,
    /// Owning organization, when known.
    pub organization_id: Option<String>,
}

/// Create a contact. A duplicate email surfaces as
/// [`StoreError::Conflict`].
pub fn create(client: &StoreClient, new: &NewContact) -> Result<Contact> {
    let email = new.email.trim();
    if !validate_email(email) {
        return Err(StoreError::Validation(format!(
            "not a valid email address: {email}"
        )));
    }

    let row = object(json!({
        "id": new_id("con"),
        "email": email,
        "name": new.name,
        "member_type": new.member_type.as_str(),
        "organization_id": new.organization_id,
        "status": "active",
        "created_at": now_rfc3339(),
    }));
    let inserted: ContactRow = client.insert(tables::CONTACTS, row).and_then(decode)?;
    Ok(assemble(inserted))
}

/// Fetch one contact by id.
pub fn get(client: &StoreClient, id: &str) -> Result<Contact> {
    let row = client
        .select(tables::CONTACTS)
        .eq("id", id)
        .fetch_one()?
        .ok_or_else(|| StoreError::ContactNotFound(id.to_string()))?;
    Ok(assemble(decode(row)?))
}

/// List contacts, optionally restricted to one member type.
pub fn list(client: &StoreClient, member_type: Option<MemberType>) -> Result<Vec<Contact>> {
    let mut query = client.select(tables::CONTACTS).order_desc("created_at");
    if let Some(member_type) = member_type {
        query = query.eq("member_type", member_type.as_str());
    }
    query
        .fetch()?
        .into_iter()
        .map(|row| Ok(assemble(decode(row)?)))
        .collect()
}

/// Look a contact up by email.
pub fn find_by_email(client: &StoreClient, email: &str) -> Result<Option<Contact>> {
    let row = client
        .select(tables::CONTACTS)
        .eq("email", email.trim())
        .fetch_one()?;
    row.map(|row| Ok(assemble(decode(row)?))).transpose()
}

/// Get-or-create a user by email (the identity resolver).
///
/// Looks up by email, and inserts an internal contact when absent. When two
/// callers race on the same new email, the store's UNIQUE constraint rejects
/// one insert; that caller re-reads and returns the committed row instead of
/// failing.
pub fn find_or_create_user(client: &StoreClient, email: &str, display_name: &str) -> Result<User> {
    if let Some(existing) = find_by_email(client, email)? {
        return Ok(existing);
    }

    let new = NewContact {
        email: email.to_string(),
        name: display_name.to_string(),
        member_type: MemberType::Internal,
        organization_id: None,
    };
    match create(client, &new) {
        Ok(user) => Ok(user),
        Err(err) if err.is_conflict() => find_by_email(client, email)?
            .ok_or(err),
        Err(err) => Err(err),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal
// ─────────────────────────────────────────────────────────────────────────────

fn assemble(row: ContactRow) -> Contact {
    Contact {
        id: row.id,
        email: row.email,
        name: row.name.unwrap_or_default(),
        member_type: MemberType::parse(&row.member_type).unwrap_or(MemberType::External),
        organization_id: row.organization_id,
        status: row.status,
        created_at: row.created_at,
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

    fn external(email: &str, name: &str) -> NewContact {
        NewContact {
            email: email.into(),
            name: name.into(),
            member_type: MemberType::External,
            organization_id: None,
        }
    }

    #[test]
    fn create_then_get() {
        let client = testing::client();
        let contact = create(&client, &external("amy@example.com", "Amy")).unwrap();
        assert!(contact.id.starts_with("con_"));

        let fetched = get(&client, &contact.id).unwrap();
        assert_eq!(fetched.email, "amy@example.com");
        assert_eq!(fetched.member_type, MemberType::External);
        assert_eq!(fetched.status.as_deref(), Some("active"));
    }

    #[test]
    fn create_rejects_malformed_email_before_writing() {
        let client = testing::client();
        let err = create(&client, &external("not-an-email", "X")).unwrap_err();
        assert_matches!(err, StoreError::Validation(_));
        assert!(list(&client, None).unwrap().is_empty());
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let client = testing::client();
        create(&client, &external("amy@example.com", "Amy")).unwrap();
        let err = create(&client, &external("amy@example.com", "Amy again")).unwrap_err();
        assert!(err.is_conflict());
    }

    #[test]
    fn list_filters_by_member_type() {
        let client = testing::client();
        create(&client, &external("out@example.com", "Out")).unwrap();
        find_or_create_user(&client, "in@example.com", "In").unwrap();

        let internal = list(&client, Some(MemberType::Internal)).unwrap();
        assert_eq!(internal.len(), 1);
        assert_eq!(internal[0].email, "in@example.com");
        assert_eq!(list(&client, None).unwrap().len(), 2);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let client = testing::client();
        assert_matches!(
            get(&client, "con_missing").unwrap_err(),
            StoreError::ContactNotFound(_)
        );
    }

    #[test]
    fn find_or_create_reuses_existing_row() {
        let client = testing::client();
        let first = find_or_create_user(&client, "amy@example.com", "Amy").unwrap();
        let second = find_or_create_user(&client, "amy@example.com", "Amy B").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.name, "Amy");
        assert_eq!(list(&client, None).unwrap().len(), 1);
    }

    #[test]
    fn find_or_create_flags_new_users_internal() {
        let client = testing::client();
        let user = find_or_create_user(&client, "new@example.com", "New").unwrap();
        assert_eq!(user.member_type, MemberType::Internal);
    }

    #[test]
    fn find_or_create_recovers_from_losing_the_insert_race() {
        let client = testing::client();
        // Simulate the losing side: the row appears between lookup and
        // insert. The conflict path must re-read and return it.
        create(&client, &external("race@example.com", "Winner")).unwrap();
        let err = create(&client, &external("race@example.com", "Loser")).unwrap_err();
        assert!(err.is_conflict());

        let resolved = find_or_create_user(&client, "race@example.com", "Loser").unwrap();
        assert_eq!(resolved.name, "Winner");
    }
}
