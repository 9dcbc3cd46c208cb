//! Account API handlers.
//!
//! ```text
//! POST /api/auth/login {"username":"admin","password":"admin123"}
//! POST /api/auth/register {"name":"Dora","username":"dora","password":"dora123"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    Actor, Error, LoginCredentials, LoginValidationError, Registration,
    RegistrationValidationError, Session,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Login request body for `POST /api/auth/login`.
///
/// Example JSON:
/// `{"username":"admin","password":"admin123"}`
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Self-registration body for `POST /api/auth/register`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[schema(example = "Dora Lima")]
    pub name: String,
    #[serde(default)]
    #[schema(example = "dora")]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl TryFrom<RegisterRequest> for Registration {
    type Error = RegistrationValidationError;

    fn try_from(value: RegisterRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.name, &value.username, &value.password)
    }
}

/// Bearer token and the identity it carries.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SessionResponse {
    pub token: String,
    pub user: Actor,
}

impl From<Session> for SessionResponse {
    fn from(value: Session) -> Self {
        Self {
            token: value.token,
            user: value.actor,
        }
    }
}

/// Exchange a username and password for a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 503, description = "User directory unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let session = state.accounts.login(&credentials).await?;
    Ok(web::Json(session.into()))
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    Error::invalid_request(err.to_string())
        .with_details(json!({ "field": err.field(), "code": err.code() }))
}

/// Create a viewer account and sign it in.
///
/// Closed registration is reported before the payload is inspected.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = SessionResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Registration disabled", body = Error),
        (status = 409, description = "Username taken", body = Error),
        (status = 503, description = "User directory unavailable", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    if !state.accounts.registration_open() {
        return Err(Error::forbidden("public registration is disabled"));
    }
    let registration =
        Registration::try_from(payload.into_inner()).map_err(map_registration_validation_error)?;
    let session = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(SessionResponse::from(session)))
}

fn map_registration_validation_error(err: RegistrationValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({ "code": err.code() }))
}
