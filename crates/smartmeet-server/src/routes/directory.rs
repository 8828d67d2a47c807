//! Directory routes: contacts, organizations, and the auth endpoint.
//!
//! Auth is deliberately minimal: `POST /api/auth` resolves an email to a
//! user, creating one on first sight. No sessions, no passwords.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use smartmeet_core::entities::{Contact, MemberType, Organization, User};
use smartmeet_core::validation::validate_email;
use smartmeet_store::{NewContact, NewOrganization};

use crate::errors::ApiError;
use crate::state::AppState;

/// Query params for `GET /api/contacts`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactsQuery {
    /// Restrict to one member type (`internal` or `external`).
    pub member_type: Option<String>,
}

/// Body for `POST /api/contacts`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    /// Email address (unique).
    pub email: String,
    /// Display name.
    pub name: String,
    /// `internal` or `external`; external when absent.
    #[serde(default)]
    pub member_type: Option<String>,
    /// Owning organization.
    #[serde(default)]
    pub organization_id: Option<String>,
}

/// Body for `POST /api/organizations`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrganizationRequest {
    /// Organization name.
    pub name: String,
    /// Email domain, when known.
    #[serde(default)]
    pub domain: Option<String>,
}

/// Body for `POST /api/auth`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthRequest {
    /// Email to resolve.
    pub email: String,
    /// Display name used when the user does not exist yet.
    #[serde(default)]
    pub name: Option<String>,
}

/// `GET /api/contacts`
pub async fn list_contacts(
    State(state): State<AppState>,
    Query(query): Query<ContactsQuery>,
) -> Result<Json<Vec<Contact>>, ApiError> {
    let member_type = query
        .member_type
        .as_deref()
        .map(|s| {
            MemberType::parse(s)
                .ok_or_else(|| ApiError::bad_request(format!("unknown member type: {s}")))
        })
        .transpose()?;
    Ok(Json(state.store.contacts(member_type)?))
}

/// `POST /api/contacts`
pub async fn create_contact(
    State(state): State<AppState>,
    Json(req): Json<CreateContactRequest>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let member_type = match req.member_type.as_deref() {
        None => MemberType::External,
        Some(s) => MemberType::parse(s)
            .ok_or_else(|| ApiError::bad_request(format!("unknown member type: {s}")))?,
    };
    let contact = state.store.create_contact(&NewContact {
        email: req.email,
        name: req.name,
        member_type,
        organization_id: req.organization_id,
    })?;
    Ok((StatusCode::CREATED, Json(contact)))
}

/// `GET /api/organizations`
pub async fn list_organizations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Organization>>, ApiError> {
    Ok(Json(state.store.organizations()?))
}

/// `POST /api/organizations`
pub async fn create_organization(
    State(state): State<AppState>,
    Json(req): Json<CreateOrganizationRequest>,
) -> Result<(StatusCode, Json<Organization>), ApiError> {
    let organization = state.store.create_organization(&NewOrganization {
        name: req.name,
        domain: req.domain,
    })?;
    Ok((StatusCode::CREATED, Json(organization)))
}

/// `POST /api/auth`
pub async fn auth(
    State(state): State<AppState>,
    Json(req): Json<AuthRequest>,
) -> Result<Json<User>, ApiError> {
    let email = req.email.trim();
    if !validate_email(email) {
        return Err(ApiError::bad_request(format!(
            "not a valid email address: {email}"
        )));
    }
    let name = req
        .name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| email.split('@').next().unwrap_or(email));
    Ok(Json(state.store.find_or_create_user(email, name)?))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
