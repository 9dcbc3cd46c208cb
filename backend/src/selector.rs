//! Startup factory choosing the contact store backend.
//!
//! Called once from `main`; the chosen store is injected into the services.

use std::sync::Arc;
use std::time::Duration;

use mockable::Clock;
use reqwest::Client;
use tracing::info;

use crate::config::{AppSettings, GoogleSettings};
use crate::domain::ports::{ContactStore, SheetsAuthorization};
use crate::outbound::persistence::{DbPool, DieselContactStore, PoolConfig};
use crate::outbound::sheets::{
    AccessTokenSource, CredentialChain, GoogleOAuth, GoogleSheetsAuthorization,
    ServiceAccountExchange, SheetsClient, SheetsContactStore, SheetsError,
};

/// Timeout applied to every Google API request.
pub const GOOGLE_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

/// Which backend holds contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    /// Relational table reached through `DATABASE_URL`.
    Table,
    /// Google spreadsheet tab.
    Sheet,
}

/// Backend implied by `settings`.
#[must_use]
pub fn store_kind(settings: &AppSettings) -> StoreKind {
    if settings.database.is_some() {
        StoreKind::Table
    } else {
        StoreKind::Sheet
    }
}

/// Failures while wiring adapters.
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    /// The Google HTTP client could not be built.
    #[error(transparent)]
    Sheets(#[from] SheetsError),
}

fn google_http_client() -> Result<Client, SheetsError> {
    Client::builder()
        .timeout(GOOGLE_HTTP_TIMEOUT)
        .build()
        .map_err(|err| SheetsError::transport(err.to_string()))
}

fn google_oauth(settings: &GoogleSettings, http: &Client) -> Option<GoogleOAuth> {
    settings.oauth_client.as_ref().map(|client| {
        GoogleOAuth::new(client, settings.oauth_redirect_uri.clone(), http.clone())
    })
}

/// Build the contact store named by `settings`.
///
/// The table store connects lazily, so an unreachable database surfaces on
/// the first request rather than at startup.
///
/// # Errors
/// [`SelectorError::Sheets`] when the Google HTTP client cannot be built.
pub fn select_contact_store(
    settings: &AppSettings,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn ContactStore>, SelectorError> {
    let kind = store_kind(settings);
    info!(?kind, "contact store selected");
    if let Some(database) = &settings.database {
        let config =
            PoolConfig::new(database.url.as_str()).with_max_size(database.max_connections);
        let pool = DbPool::lazy(&config);
        return Ok(Arc::new(DieselContactStore::new(pool, clock)));
    }

    let google = &settings.google;
    let http = google_http_client()?;
    let tokens = AccessTokenSource::new(
        CredentialChain::from_settings(google),
        ServiceAccountExchange::new(http.clone()),
        google_oauth(google, &http),
        clock.clone(),
    );
    Ok(Arc::new(SheetsContactStore::new(
        SheetsClient::new(GOOGLE_HTTP_TIMEOUT)?,
        Arc::new(tokens),
        google.spreadsheet_id.clone(),
        google.sheet_title.clone(),
        clock,
    )))
}

/// Build the admin-facing Google authorization adapter.
///
/// # Errors
/// [`SelectorError::Sheets`] when the Google HTTP client cannot be built.
pub fn sheets_authorization(
    settings: &GoogleSettings,
    clock: Arc<dyn Clock>,
) -> Result<Arc<dyn SheetsAuthorization>, SelectorError> {
    let http = google_http_client()?;
    Ok(Arc::new(GoogleSheetsAuthorization::new(
        settings.clone(),
        google_oauth(settings, &http),
        clock,
    )))
}
