//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST handler, the request and response bodies
//! they exchange, and the bearer token scheme. Swagger UI serves it in debug
//! builds and `cargo run --bin openapi-dump` prints it for tooling.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::CredentialSources;
use crate::domain::{Actor, ContactRecord, Error, ErrorCode, Role};
use crate::inbound::http::contacts::{
    AddContactRequest, CheckResponse, ContactListResponse, OkResponse,
};
use crate::inbound::http::google::{AuthUrlResponse, OAuthCallbackRequest};
use crate::inbound::http::health::ProbeStatus;
use crate::inbound::http::users::{LoginRequest, RegisterRequest, SessionResponse};

/// Name of the bearer security scheme.
pub const BEARER_SCHEME: &str = "BearerToken";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Contact registry API",
        description = "Duplicate-checked contact registration with token-based access."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::contacts::check_contact,
        crate::inbound::http::contacts::add_contact,
        crate::inbound::http::contacts::list_contacts,
        crate::inbound::http::users::login,
        crate::inbound::http::users::register,
        crate::inbound::http::google::google_status,
        crate::inbound::http::google::google_auth_url,
        crate::inbound::http::google::google_oauth_callback,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ContactRecord,
        Actor,
        Role,
        CredentialSources,
        CheckResponse,
        AddContactRequest,
        OkResponse,
        ContactListResponse,
        LoginRequest,
        RegisterRequest,
        SessionResponse,
        AuthUrlResponse,
        OAuthCallbackRequest,
        ProbeStatus
    )),
    tags(
        (name = "contacts", description = "Contact registration and lookup"),
        (name = "auth", description = "Login and self-registration"),
        (name = "google", description = "Spreadsheet authorization"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
