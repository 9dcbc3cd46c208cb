//! Assemble handler state from settings.

use std::sync::Arc;

use mockable::Clock;
use tracing::{info, warn};

use contact_registry::config::AppSettings;
use contact_registry::domain::ports::{AccessTokens, ContactStore};
use contact_registry::domain::{AccountService, ContactService};
use contact_registry::inbound::http::state::HttpState;
use contact_registry::outbound::tokens::JwtAccessTokens;
use contact_registry::outbound::users::JsonUserDirectory;
use contact_registry::selector::{SelectorError, select_contact_store, sheets_authorization};

/// Services bound to the selected store.
pub struct BuiltState {
    pub http_state: HttpState,
    pub store: Arc<dyn ContactStore>,
}

/// Select the contact store once and wire every service around it.
///
/// # Errors
/// Propagates [`SelectorError`] when an adapter cannot be built.
pub fn build_http_state(
    settings: &AppSettings,
    clock: Arc<dyn Clock>,
) -> Result<BuiltState, SelectorError> {
    let store = select_contact_store(settings, clock.clone())?;

    let contacts = Arc::new(ContactService::new(store.clone()));
    let tokens: Arc<dyn AccessTokens> = Arc::new(JwtAccessTokens::new(
        settings.jwt_secret.as_bytes(),
        clock.clone(),
    ));
    let accounts = Arc::new(
        AccountService::new(
            Arc::new(JsonUserDirectory::load(settings.users_file.clone())),
            tokens.clone(),
            contacts.clone(),
            clock.clone(),
        )
        .with_registration_open(settings.allow_public_registration),
    );
    let google = sheets_authorization(&settings.google, clock)?;
    let http_state = HttpState::new(contacts, accounts, tokens, google)
        .with_public_contacts(settings.allow_public_contacts);
    Ok(BuiltState { http_state, store })
}

/// Prepare the store's layout, logging instead of failing.
///
/// The store stays usable when this fails; requests surface the cause.
pub async fn prepare_store(store: &dyn ContactStore) {
    match store.ensure_layout().await {
        Ok(()) => info!("contact store layout ready"),
        Err(error) => warn!(%error, "contact store layout not prepared"),
    }
}
