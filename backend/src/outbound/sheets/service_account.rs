//! Service-account token exchange using a signed JWT bearer assertion.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::Client;
use serde::Serialize;

use super::SPREADSHEETS_SCOPE;
use super::SheetsError;
use super::credentials::ServiceAccountKey;
use super::dto::TokenResponseDto;
use super::transport::{decode, send};

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Access token issued by a token endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    /// Bearer token for the Sheets API.
    pub access_token: String,
    /// Instant after which Google rejects the token.
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

impl<'a> AssertionClaims<'a> {
    fn new(key: &'a ServiceAccountKey, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: &key.client_email,
            scope: SPREADSHEETS_SCOPE,
            aud: &key.token_uri,
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Sign the RS256 assertion for `key` at `now`.
fn sign_assertion(key: &ServiceAccountKey, now: DateTime<Utc>) -> Result<String, SheetsError> {
    let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|err| {
        SheetsError::Signing {
            message: format!("invalid private key: {err}"),
        }
    })?;
    encode(
        &Header::new(Algorithm::RS256),
        &AssertionClaims::new(key, now),
        &signing_key,
    )
    .map_err(|err| SheetsError::Signing {
        message: err.to_string(),
    })
}

/// Exchanges service-account assertions for access tokens.
#[derive(Debug, Clone)]
pub struct ServiceAccountExchange {
    http: Client,
}

impl ServiceAccountExchange {
    /// Exchange over `http`.
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Obtain an access token for `key`.
    ///
    /// # Errors
    /// Signing, transport, status and decode failures.
    pub async fn exchange(
        &self,
        key: &ServiceAccountKey,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, SheetsError> {
        let assertion = sign_assertion(key, now)?;
        let body = send(
            self.http
                .post(&key.token_uri)
                .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())]),
        )
        .await?;
        let response: TokenResponseDto = decode(&body, "token")?;
        Ok(IssuedToken {
            access_token: response.access_token,
            expires_at: now
                + Duration::seconds(response.expires_in.unwrap_or(ASSERTION_LIFETIME_SECS)),
        })
    }
}
