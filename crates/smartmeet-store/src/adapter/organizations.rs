//! Organization entity — one physical row, the simple case.

use serde_json::{json, Value};

use smartmeet_core::entities::Organization;

use crate::adapter::{new_id, now_rfc3339, tables};
use crate::client::{Row, StoreClient};
use crate::errors::{Result, StoreError};
use crate::rows::{decode, OrganizationRow};

/// Fields for creating an organization.
#[derive(Clone, Debug)]
pub struct NewOrganization {
    /// Organization name.
    pub name: String,
    /// Email domain, when known.
    pub domain: Option<String>,
}

/// Create an organization.
pub fn create(client: &StoreClient, new: &NewOrganization) -> Result<Organization> {
    let name = new.name.trim();
    if name.is_empty() {
        return Err(StoreError::Validation(
            "organization name must not be empty".into(),
        ));
    }
    let row = object(json!({
        "id": new_id("org"),
        "name": name,
        "domain": new.domain,
        "created_at": now_rfc3339(),
    }));
    let inserted: OrganizationRow = client
        .insert(tables::ORGANIZATIONS, row)
        .and_then(decode)?;
    Ok(assemble(inserted))
}

/// Fetch one organization by id.
pub fn get(client: &StoreClient, id: &str) -> Result<Organization> {
    let row = client
        .select(tables::ORGANIZATIONS)
        .eq("id", id)
        .fetch_one()?
        .ok_or_else(|| StoreError::OrganizationNotFound(id.to_string()))?;
    Ok(assemble(decode(row)?))
}

/// List all organizations by name.
pub fn list(client: &StoreClient) -> Result<Vec<Organization>> {
    client
        .select(tables::ORGANIZATIONS)
        .order_asc("name")
        .fetch()?
        .into_iter()
        .map(|row| Ok(assemble(decode(row)?)))
        .collect()
}

/// Look an organization up by exact name, creating it when absent.
pub fn get_or_create(client: &StoreClient, name: &str, domain: Option<&str>) -> Result<Organization> {
    let existing = client
        .select(tables::ORGANIZATIONS)
        .eq("name", name.trim())
        .fetch_one()?;
    if let Some(row) = existing {
        return Ok(assemble(decode(row)?));
    }
    create(
        client,
        &NewOrganization {
            name: name.to_string(),
            domain: domain.map(ToString::to_string),
        },
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Internal
// ─────────────────────────────────────────────────────────────────────────────

fn assemble(row: OrganizationRow) -> Organization {
    Organization {
        id: row.id,
        name: row.name,
        domain: row.domain,
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

    #[test]
    fn create_then_get() {
        let client = testing::client();
        let org = create(
            &client,
            &NewOrganization {
                name: "Acme".into(),
                domain: Some("acme.test".into()),
            },
        )
        .unwrap();
        assert!(org.id.starts_with("org_"));

        let fetched = get(&client, &org.id).unwrap();
        assert_eq!(fetched.name, "Acme");
        assert_eq!(fetched.domain.as_deref(), Some("acme.test"));
    }

    #[test]
    fn create_rejects_blank_name() {
        let client = testing::client();
        let err = create(
            &client,
            &NewOrganization {
                name: "   ".into(),
                domain: None,
            },
        )
        .unwrap_err();
        assert_matches!(err, StoreError::Validation(_));
    }

    #[test]
    fn list_is_sorted_by_name() {
        let client = testing::client();
        for name in ["Zenith", "Acme", "Midway"] {
            create(
                &client,
                &NewOrganization {
                    name: name.into(),
                    domain: None,
                },
            )
            .unwrap();
        }
        let names: Vec<String> = list(&client).unwrap().into_iter().map(|o| o.name).collect();
        assert_eq!(names, ["Acme", "Midway", "Zenith"]);
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let client = testing::client();
        assert_matches!(
            get(&client, "org_missing").unwrap_err(),
            StoreError::OrganizationNotFound(_)
        );
    }

    #[test]
    fn get_or_create_is_idempotent_by_name() {
        let client = testing::client();
        let first = get_or_create(&client, "Acme", Some("acme.test")).unwrap();
        let second = get_or_create(&client, "Acme", None).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(list(&client).unwrap().len(), 1);
    }
}
