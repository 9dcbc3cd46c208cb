//! Contact API handlers.
//!
//! ```text
//! GET  /api/contacts/check?phone=11999990000
//! POST /api/contacts/add {"name":"Alice","phone":"(11) 99999-0000"}
//! GET  /api/contacts/list
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{ContactRecord, ContactSubmission, DuplicateCheck, Error};

use super::ApiResult;
use super::auth::{AdminCaller, ContactCaller};
use super::state::HttpState;

/// Query for `GET /api/contacts/check`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct CheckQuery {
    /// Phone in any formatting.
    #[param(example = "(11) 99999-0000")]
    #[serde(default)]
    pub phone: String,
}

/// Duplicate lookup result.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CheckResponse {
    pub duplicate: bool,
    /// The record holding the phone, when `duplicate` is true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing: Option<ContactRecord>,
}

impl From<DuplicateCheck> for CheckResponse {
    fn from(value: DuplicateCheck) -> Self {
        match value {
            DuplicateCheck::Duplicate(existing) => Self {
                duplicate: true,
                existing: Some(existing),
            },
            DuplicateCheck::NotDuplicate => Self {
                duplicate: false,
                existing: None,
            },
        }
    }
}

/// Body for `POST /api/contacts/add`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddContactRequest {
    #[serde(default)]
    #[schema(example = "Alice")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "(11) 99999-0000")]
    pub phone: String,
    #[serde(default)]
    pub course: Option<String>,
    /// Credited consultant for anonymous submissions.
    #[serde(default)]
    pub consultant: Option<String>,
}

impl From<AddContactRequest> for ContactSubmission {
    fn from(value: AddContactRequest) -> Self {
        Self {
            name: value.name,
            phone: value.phone,
            course: value.course,
            consultant_hint: value.consultant,
        }
    }
}

/// Acknowledgement body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct OkResponse {
    #[schema(example = true)]
    pub ok: bool,
}

impl OkResponse {
    pub(crate) fn ok() -> Self {
        Self { ok: true }
    }
}

/// Every stored contact.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContactListResponse {
    pub items: Vec<ContactRecord>,
}

/// Check whether a phone is already registered.
#[utoipa::path(
    get,
    path = "/api/contacts/check",
    params(CheckQuery),
    responses(
        (status = 200, description = "Lookup result", body = CheckResponse),
        (status = 400, description = "Phone missing or without digits", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Role not allowed", body = Error),
        (status = 503, description = "Contact store unavailable", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "checkContact"
)]
#[get("/contacts/check")]
pub async fn check_contact(
    state: web::Data<HttpState>,
    _caller: ContactCaller,
    query: web::Query<CheckQuery>,
) -> ApiResult<web::Json<CheckResponse>> {
    let outcome = state.contacts.check_duplicate(&query.phone).await?;
    Ok(web::Json(outcome.into()))
}

/// Register a contact unless its phone already exists.
#[utoipa::path(
    post,
    path = "/api/contacts/add",
    request_body = AddContactRequest,
    responses(
        (status = 200, description = "Contact stored", body = OkResponse),
        (status = 400, description = "Name or phone missing", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Role not allowed", body = Error),
        (status = 409, description = "Phone already registered; see details.existing", body = Error),
        (status = 503, description = "Contact store unavailable", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "addContact"
)]
#[post("/contacts/add")]
pub async fn add_contact(
    state: web::Data<HttpState>,
    caller: ContactCaller,
    payload: web::Json<AddContactRequest>,
) -> ApiResult<web::Json<OkResponse>> {
    let ContactCaller(actor) = caller;
    state
        .contacts
        .add_contact(payload.into_inner().into(), Some(&actor))
        .await?;
    Ok(web::Json(OkResponse::ok()))
}

/// List every contact. Admin only.
#[utoipa::path(
    get,
    path = "/api/contacts/list",
    responses(
        (status = 200, description = "Contacts in store order", body = ContactListResponse),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Not an admin", body = Error),
        (status = 503, description = "Contact store unavailable", body = Error)
    ),
    tags = ["contacts"],
    operation_id = "listContacts"
)]
#[get("/contacts/list")]
pub async fn list_contacts(
    state: web::Data<HttpState>,
    _caller: AdminCaller,
) -> ApiResult<HttpResponse> {
    let items = state.contacts.list_all().await?;
    Ok(HttpResponse::Ok().json(ContactListResponse { items }))
}

#[cfg(test)]
#[path = "contacts_tests.rs"]
mod tests;
