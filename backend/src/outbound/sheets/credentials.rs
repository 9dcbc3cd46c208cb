//! Google credential sources and the ordered chain that picks one.
//!
//! Sources are tried in order: inline service-account JSON, the
//! service-account key file, then (only when an OAuth client is configured)
//! an OAuth token from the environment or the token file. Sources are read on
//! every resolution so a token saved by the OAuth callback is picked up
//! without a restart.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use zeroize::Zeroizing;

use crate::config::GoogleSettings;
use crate::domain::ports::CredentialSources;
use crate::outbound::cap_fs;

use super::SheetsError;

/// Default OAuth 2.0 token endpoint.
pub const GOOGLE_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// Tokens are treated as expired this many seconds before their stated
/// expiry.
pub const EXPIRY_MARGIN_SECS: i64 = 60;

fn default_token_uri() -> String {
    GOOGLE_TOKEN_URI.to_owned()
}

/// The subset of a service-account key file used for token exchange.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct ServiceAccountKey {
    /// Account identity; the assertion issuer.
    pub client_email: String,
    /// PKCS#8 PEM private key.
    pub private_key: String,
    /// Token endpoint; the assertion audience.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

/// Stored OAuth token in the layout written by Google's client libraries.
///
/// `expiry_date` is milliseconds since the Unix epoch.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    /// Short-lived bearer token; may be stale.
    #[serde(default)]
    pub access_token: String,
    /// Long-lived token used to mint new access tokens.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Granted scopes, space separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    /// Expiry in Unix milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<i64>,
}

impl fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthToken")
            .field("has_access_token", &!self.access_token.is_empty())
            .field("has_refresh_token", &self.refresh_token.is_some())
            .field("expiry_date", &self.expiry_date)
            .finish()
    }
}

impl OAuthToken {
    /// Stated expiry, if any.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.expiry_date.and_then(DateTime::from_timestamp_millis)
    }

    /// Whether the access token must be refreshed before use at `now`.
    ///
    /// Tokens without an expiry are used as-is unless a refresh token is
    /// available.
    #[must_use]
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        if self.access_token.is_empty() {
            return true;
        }
        match self.expires_at() {
            Some(expires_at) => expires_at - Duration::seconds(EXPIRY_MARGIN_SECS) <= now,
            None => self.refresh_token.is_some(),
        }
    }
}

/// A usable credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    ServiceAccount(ServiceAccountKey),
    OAuth(OAuthToken),
}

impl Credential {
    /// Stable identity used to key cached access tokens.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::ServiceAccount(key) => format!("service-account:{}", key.client_email),
            Self::OAuth(token) => format!(
                "oauth:{}",
                token
                    .refresh_token
                    .as_deref()
                    .unwrap_or(&token.access_token)
            ),
        }
    }
}

/// One place a credential may come from.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialProvider: Send + Sync {
    /// Human-readable source name for logs.
    fn name(&self) -> &'static str;

    /// The credential, or `None` when this source is not set up.
    ///
    /// # Errors
    /// [`SheetsError::MalformedCredential`] when the source exists but
    /// cannot be used.
    fn load(&self) -> Result<Option<Credential>, SheetsError>;
}

/// Service-account key JSON held in configuration.
pub struct InlineServiceAccount {
    json: Option<Zeroizing<String>>,
}

impl CredentialProvider for InlineServiceAccount {
    fn name(&self) -> &'static str {
        "GOOGLE_SERVICE_ACCOUNT_KEY_JSON"
    }

    fn load(&self) -> Result<Option<Credential>, SheetsError> {
        self.json
            .as_deref()
            .map(|json| parse_service_account(json, self.name()))
            .transpose()
    }
}

/// Service-account key file on disk.
pub struct ServiceAccountFile {
    path: PathBuf,
}

impl CredentialProvider for ServiceAccountFile {
    fn name(&self) -> &'static str {
        "service-account key file"
    }

    fn load(&self) -> Result<Option<Credential>, SheetsError> {
        read_source(&self.path, self.name())?
            .map(|json| parse_service_account(&json, self.name()))
            .transpose()
    }
}

/// OAuth token JSON held in configuration.
pub struct InlineOAuthToken {
    json: Option<Zeroizing<String>>,
}

impl CredentialProvider for InlineOAuthToken {
    fn name(&self) -> &'static str {
        "GOOGLE_OAUTH_TOKEN_JSON"
    }

    fn load(&self) -> Result<Option<Credential>, SheetsError> {
        self.json
            .as_deref()
            .map(|json| parse_oauth_token(json, self.name()))
            .transpose()
    }
}

/// OAuth token file, written by the authorization callback.
#[derive(Debug, Clone)]
pub struct OAuthTokenFile {
    path: PathBuf,
}

impl OAuthTokenFile {
    /// Token file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Persist `token`, creating parent directories.
    ///
    /// # Errors
    /// [`SheetsError::Persist`] when serialisation or the write fails.
    pub fn save(&self, token: &OAuthToken) -> Result<(), SheetsError> {
        let json = serde_json::to_vec_pretty(token).map_err(|err| SheetsError::Persist {
            message: err.to_string(),
        })?;
        cap_fs::write_file(&self.path, &json).map_err(|err| SheetsError::Persist {
            message: format!("{}: {err}", self.path.display()),
        })
    }
}

impl CredentialProvider for OAuthTokenFile {
    fn name(&self) -> &'static str {
        "OAuth token file"
    }

    fn load(&self) -> Result<Option<Credential>, SheetsError> {
        read_source(&self.path, self.name())?
            .map(|json| parse_oauth_token(&json, self.name()))
            .transpose()
    }
}

fn read_source(path: &Path, origin: &'static str) -> Result<Option<String>, SheetsError> {
    cap_fs::read_optional(path).map_err(|err| SheetsError::MalformedCredential {
        origin,
        message: format!("{}: {err}", path.display()),
    })
}

fn parse_service_account(json: &str, origin: &'static str) -> Result<Credential, SheetsError> {
    let key: ServiceAccountKey =
        serde_json::from_str(json).map_err(|err| SheetsError::MalformedCredential {
            origin,
            message: err.to_string(),
        })?;
    Ok(Credential::ServiceAccount(key))
}

fn parse_oauth_token(json: &str, origin: &'static str) -> Result<Credential, SheetsError> {
    let token: OAuthToken =
        serde_json::from_str(json).map_err(|err| SheetsError::MalformedCredential {
            origin,
            message: err.to_string(),
        })?;
    if token.access_token.is_empty() && token.refresh_token.is_none() {
        return Err(SheetsError::MalformedCredential {
            origin,
            message: "token has neither access_token nor refresh_token".to_owned(),
        });
    }
    Ok(Credential::OAuth(token))
}

/// Ordered credential sources; the first present credential wins.
pub struct CredentialChain {
    providers: Vec<Box<dyn CredentialProvider>>,
    hint: String,
}

impl CredentialChain {
    /// Chain over explicit providers.
    pub fn new(providers: Vec<Box<dyn CredentialProvider>>, hint: impl Into<String>) -> Self {
        Self {
            providers,
            hint: hint.into(),
        }
    }

    /// The standard chain for `settings`.
    pub fn from_settings(settings: &GoogleSettings) -> Self {
        let mut providers: Vec<Box<dyn CredentialProvider>> = vec![
            Box::new(InlineServiceAccount {
                json: settings.service_account_key_json.clone(),
            }),
            Box::new(ServiceAccountFile {
                path: settings.service_account_key_file.clone(),
            }),
        ];
        let hint = if settings.oauth_client.is_some() {
            providers.push(Box::new(InlineOAuthToken {
                json: settings.oauth_token_json.clone(),
            }));
            providers.push(Box::new(OAuthTokenFile::new(
                settings.oauth_token_file.clone(),
            )));
            "authorize Google access via OAuth as an admin to generate a token".to_owned()
        } else {
            format!(
                "configure a service account at {} or set GOOGLE_OAUTH_CLIENT_ID/SECRET and authorize",
                settings.service_account_key_file.display()
            )
        };
        Self::new(providers, hint)
    }

    /// First credential available across the chain.
    ///
    /// Malformed sources are logged and skipped.
    ///
    /// # Errors
    /// [`SheetsError::NoCredentials`] when no source yields a credential.
    pub fn resolve(&self) -> Result<Credential, SheetsError> {
        for provider in &self.providers {
            match provider.load() {
                Ok(Some(credential)) => return Ok(credential),
                Ok(None) => {}
                Err(error) => warn!(source = provider.name(), %error, "skipping credential source"),
            }
        }
        Err(SheetsError::NoCredentials {
            hint: self.hint.clone(),
        })
    }
}

/// Probe configuration and the filesystem for credential sources.
#[must_use]
pub fn probe_sources(settings: &GoogleSettings) -> CredentialSources {
    CredentialSources {
        service_account_env: settings.service_account_key_json.is_some(),
        service_account_file: cap_fs::path_exists(&settings.service_account_key_file),
        oauth_configured: settings.oauth_client.is_some(),
        oauth_token_env: settings.oauth_token_json.is_some(),
        oauth_token_file: cap_fs::path_exists(&settings.oauth_token_file),
    }
}

#[cfg(test)]
#[path = "credentials_tests.rs"]
mod tests;
