//! Google OAuth 2.0 web-server flow for the spreadsheet fallback credential.
//!
//! An admin opens the consent URL, Google redirects back with a code, and the
//! callback exchanges it for a token that includes a refresh token
//! (`access_type=offline` with `prompt=consent`).

use chrono::{DateTime, Duration, Utc};
use reqwest::{Client, Url};
use tracing::info;
use zeroize::Zeroizing;

use crate::config::OAuthClientSettings;

use super::SPREADSHEETS_SCOPE;
use super::SheetsError;
use super::credentials::{GOOGLE_TOKEN_URI, OAuthToken};
use super::dto::TokenResponseDto;
use super::transport::{decode, send};

/// Google's consent endpoint.
pub const GOOGLE_AUTH_URI: &str = "https://accounts.google.com/o/oauth2/v2/auth";

const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

/// OAuth client able to build consent URLs, exchange codes and refresh tokens.
#[derive(Debug, Clone)]
pub struct GoogleOAuth {
    http: Client,
    client_id: String,
    client_secret: Zeroizing<String>,
    redirect_uri: String,
    auth_uri: String,
    token_uri: String,
}

impl GoogleOAuth {
    /// Client for Google's production endpoints.
    pub fn new(
        client: &OAuthClientSettings,
        redirect_uri: impl Into<String>,
        http: Client,
    ) -> Self {
        Self {
            http,
            client_id: client.client_id.clone(),
            client_secret: client.client_secret.clone(),
            redirect_uri: redirect_uri.into(),
            auth_uri: GOOGLE_AUTH_URI.to_owned(),
            token_uri: GOOGLE_TOKEN_URI.to_owned(),
        }
    }

    /// Override the consent and token endpoints.
    #[must_use]
    pub fn with_endpoints(
        mut self,
        auth_uri: impl Into<String>,
        token_uri: impl Into<String>,
    ) -> Self {
        self.auth_uri = auth_uri.into();
        self.token_uri = token_uri.into();
        self
    }

    /// Consent URL requesting offline spreadsheet access.
    ///
    /// # Errors
    /// [`SheetsError::Endpoint`] when the consent endpoint is not a URL.
    pub fn authorization_url(&self) -> Result<Url, SheetsError> {
        Url::parse_with_params(
            &self.auth_uri,
            [
                ("client_id", self.client_id.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("response_type", "code"),
                ("access_type", "offline"),
                ("prompt", "consent"),
                ("scope", SPREADSHEETS_SCOPE),
            ],
        )
        .map_err(|err| SheetsError::endpoint(err.to_string()))
    }

    /// Exchange an authorization code for a token.
    ///
    /// # Errors
    /// Transport, status and decode failures.
    pub async fn exchange_code(
        &self,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<OAuthToken, SheetsError> {
        let response = self
            .token_request(&[
                ("code", code),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("redirect_uri", self.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .await?;
        info!(
            has_refresh_token = response.refresh_token.is_some(),
            "OAuth code exchanged"
        );
        Ok(into_token(response, None, now))
    }

    /// Refresh `token` using its refresh token.
    ///
    /// The refresh token is kept when Google does not rotate it.
    ///
    /// # Errors
    /// [`SheetsError::RefreshUnavailable`] when `token` has no refresh token,
    /// otherwise transport, status and decode failures.
    pub async fn refresh(
        &self,
        token: &OAuthToken,
        now: DateTime<Utc>,
    ) -> Result<OAuthToken, SheetsError> {
        let refresh_token = token
            .refresh_token
            .as_deref()
            .ok_or(SheetsError::RefreshUnavailable)?;
        let response = self
            .token_request(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .await?;
        Ok(into_token(response, token.refresh_token.clone(), now))
    }

    async fn token_request(&self, form: &[(&str, &str)]) -> Result<TokenResponseDto, SheetsError> {
        let body = send(self.http.post(&self.token_uri).form(form)).await?;
        decode(&body, "token")
    }
}

fn into_token(
    response: TokenResponseDto,
    previous_refresh_token: Option<String>,
    now: DateTime<Utc>,
) -> OAuthToken {
    let expires_in = response.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS);
    OAuthToken {
        access_token: response.access_token,
        refresh_token: response.refresh_token.or(previous_refresh_token),
        scope: response.scope,
        token_type: response.token_type,
        expiry_date: Some((now + Duration::seconds(expires_in)).timestamp_millis()),
    }
}
