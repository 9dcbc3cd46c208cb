//! Google Sheets authorization handlers.
//!
//! ```text
//! GET  /api/google/status
//! GET  /api/google/auth-url
//! POST /api/google/oauth/callback {"code":"4/0Ab..."}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{CredentialSources, SheetsAuthorizationError};

use super::ApiResult;
use super::auth::AdminCaller;
use super::contacts::OkResponse;
use super::state::HttpState;

/// Consent URL for the admin to open.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUrlResponse {
    #[schema(example = "https://accounts.google.com/o/oauth2/v2/auth?client_id=...")]
    pub url: String,
}

/// Body for `POST /api/google/oauth/callback`.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct OAuthCallbackRequest {
    /// Authorization code returned by Google.
    #[serde(default)]
    pub code: String,
}

fn map_authorization_error(error: SheetsAuthorizationError) -> Error {
    match error {
        SheetsAuthorizationError::NotConfigured => Error::invalid_request(error.to_string()),
        SheetsAuthorizationError::Exchange { message } => {
            warn!(%message, "OAuth code exchange failed");
            Error::service_unavailable("failed to exchange authorization code")
                .with_details(json!({ "reason": message }))
        }
        SheetsAuthorizationError::Persist { message } => {
            Error::internal(format!("failed to save OAuth token: {message}"))
        }
    }
}

/// Report which spreadsheet credential sources are present.
#[utoipa::path(
    get,
    path = "/api/google/status",
    responses(
        (status = 200, description = "Credential sources", body = CredentialSources),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["google"],
    operation_id = "googleStatus"
)]
#[get("/google/status")]
pub async fn google_status(
    state: web::Data<HttpState>,
    _caller: AdminCaller,
) -> web::Json<CredentialSources> {
    web::Json(state.google.credential_sources())
}

/// Build the OAuth consent URL.
#[utoipa::path(
    get,
    path = "/api/google/auth-url",
    responses(
        (status = 200, description = "Consent URL", body = AuthUrlResponse),
        (status = 400, description = "OAuth client not configured", body = Error),
        (status = 401, description = "Missing or invalid token", body = Error),
        (status = 403, description = "Not an admin", body = Error)
    ),
    tags = ["google"],
    operation_id = "googleAuthUrl"
)]
#[get("/google/auth-url")]
pub async fn google_auth_url(
    state: web::Data<HttpState>,
    _caller: AdminCaller,
) -> ApiResult<web::Json<AuthUrlResponse>> {
    let url = state
        .google
        .authorization_url()
        .map_err(map_authorization_error)?;
    Ok(web::Json(AuthUrlResponse { url }))
}

/// Exchange the consent code and persist the resulting token.
#[utoipa::path(
    post,
    path = "/api/google/oauth/callback",
    request_body = OAuthCallbackRequest,
    responses(
        (status = 200, description = "Token stored", body = OkResponse),
        (status = 400, description = "Code missing or OAuth not configured", body = Error),
        (status = 500, description = "Token could not be saved", body = Error),
        (status = 503, description = "Google rejected the code", body = Error)
    ),
    tags = ["google"],
    operation_id = "googleOAuthCallback",
    security([])
)]
#[post("/google/oauth/callback")]
pub async fn google_oauth_callback(
    state: web::Data<HttpState>,
    payload: web::Json<OAuthCallbackRequest>,
) -> ApiResult<web::Json<OkResponse>> {
    let code = payload.code.trim();
    if code.is_empty() {
        return Err(Error::invalid_request("code is required")
            .with_details(json!({ "field": "code", "code": "missing_code" })));
    }
    state
        .google
        .complete_authorization(code)
        .await
        .map_err(map_authorization_error)?;
    Ok(web::Json(OkResponse::ok()))
}
