//! Port for the admin-driven Google authorization of the spreadsheet store.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use super::define_port_error;

define_port_error! {
    /// Failures raised while authorizing spreadsheet access.
    pub enum SheetsAuthorizationError {
        /// No OAuth client id and secret are configured.
        NotConfigured => "Google OAuth client is not configured",
        /// Google rejected or failed the code exchange.
        Exchange { message: String } => "failed to exchange authorization code: {message}",
        /// The obtained token could not be saved.
        Persist { message: String } => "failed to save OAuth token: {message}",
    }
}

/// Which spreadsheet credential sources are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSources {
    /// Inline service-account key configured.
    pub service_account_env: bool,
    /// Service-account key file exists.
    pub service_account_file: bool,
    /// OAuth client id and secret configured.
    pub oauth_configured: bool,
    /// Inline OAuth token configured.
    pub oauth_token_env: bool,
    /// OAuth token file exists.
    pub oauth_token_file: bool,
}

/// Credential inspection and the OAuth consent flow.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SheetsAuthorization: Send + Sync {
    /// Probe configuration and files for credential sources.
    fn credential_sources(&self) -> CredentialSources;

    /// Consent URL an admin opens to grant spreadsheet access.
    fn authorization_url(&self) -> Result<String, SheetsAuthorizationError>;

    /// Exchange the code Google returned and store the resulting token.
    async fn complete_authorization(&self, code: &str) -> Result<(), SheetsAuthorizationError>;
}
