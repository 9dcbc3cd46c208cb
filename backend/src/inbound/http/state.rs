//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` so they depend only
//! on domain services and ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AccessTokens, SheetsAuthorization};
use crate::domain::{AccountService, ContactService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub contacts: Arc<ContactService>,
    pub accounts: Arc<AccountService>,
    pub tokens: Arc<dyn AccessTokens>,
    pub google: Arc<dyn SheetsAuthorization>,
    /// Anonymous callers may check and add contacts.
    pub allow_public_contacts: bool,
}

impl HttpState {
    /// Bundle services with public contact access disabled.
    ///
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use contact_registry::domain::{AccountService, ContactService};
    /// use contact_registry::inbound::http::state::HttpState;
    /// use contact_registry::outbound::memory::InMemoryContactStore;
    /// use contact_registry::outbound::tokens::JwtAccessTokens;
    /// use contact_registry::outbound::users::JsonUserDirectory;
    /// use contact_registry::config::GoogleSettings;
    /// use contact_registry::selector::sheets_authorization;
    /// use mockable::DefaultClock;
    ///
    /// # fn google() -> GoogleSettings { unimplemented!() }
    /// let clock = Arc::new(DefaultClock);
    /// let contacts = Arc::new(ContactService::new(Arc::new(InMemoryContactStore::new(clock.clone()))));
    /// let tokens = Arc::new(JwtAccessTokens::new(b"secret", clock.clone()));
    /// let accounts = Arc::new(AccountService::new(
    ///     Arc::new(JsonUserDirectory::load("config/users.json")),
    ///     tokens.clone(),
    ///     contacts.clone(),
    ///     clock.clone(),
    /// ));
    /// let google = sheets_authorization(&google(), clock).expect("adapter");
    /// let state = HttpState::new(contacts, accounts, tokens, google).with_public_contacts(true);
    /// assert!(state.allow_public_contacts);
    /// ```
    pub fn new(
        contacts: Arc<ContactService>,
        accounts: Arc<AccountService>,
        tokens: Arc<dyn AccessTokens>,
        google: Arc<dyn SheetsAuthorization>,
    ) -> Self {
        Self {
            contacts,
            accounts,
            tokens,
            google,
            allow_public_contacts: false,
        }
    }

    /// Toggle anonymous contact access.
    #[must_use]
    pub fn with_public_contacts(mut self, allow: bool) -> Self {
        self.allow_public_contacts = allow;
        self
    }
}
