//! [`SheetsAuthorization`] backed by the OAuth client and the token file.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::config::GoogleSettings;
use crate::domain::ports::{CredentialSources, SheetsAuthorization, SheetsAuthorizationError};

use super::credentials::{OAuthTokenFile, probe_sources};
use super::oauth::GoogleOAuth;

/// Admin-facing credential setup for the spreadsheet store.
pub struct GoogleSheetsAuthorization {
    settings: GoogleSettings,
    oauth: Option<GoogleOAuth>,
    token_file: OAuthTokenFile,
    clock: Arc<dyn Clock>,
}

impl GoogleSheetsAuthorization {
    pub fn new(
        settings: GoogleSettings,
        oauth: Option<GoogleOAuth>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let token_file = OAuthTokenFile::new(settings.oauth_token_file.clone());
        Self {
            settings,
            oauth,
            token_file,
            clock,
        }
    }

    fn oauth(&self) -> Result<&GoogleOAuth, SheetsAuthorizationError> {
        self.oauth
            .as_ref()
            .ok_or_else(SheetsAuthorizationError::not_configured)
    }
}

#[async_trait]
impl SheetsAuthorization for GoogleSheetsAuthorization {
    fn credential_sources(&self) -> CredentialSources {
        probe_sources(&self.settings)
    }

    fn authorization_url(&self) -> Result<String, SheetsAuthorizationError> {
        let url = self
            .oauth()?
            .authorization_url()
            .map_err(|err| SheetsAuthorizationError::exchange(err.to_string()))?;
        Ok(url.into())
    }

    async fn complete_authorization(&self, code: &str) -> Result<(), SheetsAuthorizationError> {
        let token = self
            .oauth()?
            .exchange_code(code, self.clock.utc())
            .await
            .map_err(|err| {
                warn!(error = %err, "OAuth code exchange failed");
                SheetsAuthorizationError::exchange(err.to_string())
            })?;
        self.token_file
            .save(&token)
            .map_err(|err| SheetsAuthorizationError::persist(err.to_string()))?;
        info!(path = %self.settings.oauth_token_file.display(), "OAuth token saved");
        Ok(())
    }
}
