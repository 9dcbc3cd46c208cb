//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use tempfile::TempDir;

use crate::domain::ports::{AccessTokens, MockSheetsAuthorization};
use crate::domain::{AccountService, Actor, ContactService, Role};
use crate::outbound::memory::InMemoryContactStore;
use crate::outbound::tokens::JwtAccessTokens;
use crate::outbound::users::JsonUserDirectory;
use crate::test_support::fixture_clock;

use super::state::HttpState;

/// Handler state over an in-memory store, seeded users and real tokens.
pub struct Harness {
    pub state: HttpState,
    pub store: Arc<InMemoryContactStore>,
    _users_dir: TempDir,
}

impl Harness {
    /// Harness whose Google adapter is `google`.
    pub fn with_google(google: MockSheetsAuthorization) -> Self {
        Self::build(google, true)
    }

    /// Harness that refuses self-registration.
    pub fn registration_closed() -> Self {
        Self::build(MockSheetsAuthorization::new(), false)
    }

    fn build(google: MockSheetsAuthorization, registration_open: bool) -> Self {
        let clock = fixture_clock();
        let users_dir = tempfile::tempdir().expect("temp dir");
        let store = Arc::new(InMemoryContactStore::new(clock.clone()));
        let contacts = Arc::new(ContactService::new(store.clone()));
        let tokens: Arc<dyn AccessTokens> =
            Arc::new(JwtAccessTokens::new(b"test-secret", clock.clone()));
        let accounts = Arc::new(
            AccountService::new(
                Arc::new(JsonUserDirectory::load(users_dir.path().join("users.json"))),
                tokens.clone(),
                contacts.clone(),
                clock,
            )
            .with_registration_open(registration_open),
        );
        Self {
            state: HttpState::new(contacts, accounts, tokens, Arc::new(google)),
            store,
            _users_dir: users_dir,
        }
    }

    /// Harness with a Google adapter that expects no calls.
    pub fn new() -> Self {
        Self::with_google(MockSheetsAuthorization::new())
    }

    /// Signed bearer header value for an actor with `role`.
    pub fn bearer(&self, username: &str, display_name: &str, role: Role) -> String {
        let token = self
            .state
            .tokens
            .issue(&Actor {
                username: username.to_owned(),
                display_name: display_name.to_owned(),
                role,
            })
            .expect("token issued");
        format!("Bearer {token}")
    }
}
