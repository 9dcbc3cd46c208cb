//! Password login and self-registration.
//!
//! Successful calls return a [`Session`]: a bearer token plus the identity it
//! carries. Registration also writes a credentials row to the contact store;
//! that write is best-effort and never fails the registration.

use std::sync::Arc;

use mockable::Clock;
use serde_json::json;
use tracing::{info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AccessTokenError, AccessTokens, UserAccount, UserDirectory, UserDirectoryError,
};
use crate::domain::{Actor, ContactService, Error, LoginCredentials, Registration, Role};

/// Issued bearer token and its identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Signed bearer token.
    pub token: String,
    /// Identity carried by the token.
    pub actor: Actor,
}

/// Login and registration use-cases.
pub struct AccountService {
    users: Arc<dyn UserDirectory>,
    tokens: Arc<dyn AccessTokens>,
    contacts: Arc<ContactService>,
    clock: Arc<dyn Clock>,
    registration_open: bool,
}

impl AccountService {
    /// Create a service with public registration enabled.
    #[must_use]
    pub fn new(
        users: Arc<dyn UserDirectory>,
        tokens: Arc<dyn AccessTokens>,
        contacts: Arc<ContactService>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users,
            tokens,
            contacts,
            clock,
            registration_open: true,
        }
    }

    /// Enable or disable self-registration.
    #[must_use]
    pub fn with_registration_open(mut self, open: bool) -> Self {
        self.registration_open = open;
        self
    }

    /// Whether self-registration is accepted.
    #[must_use]
    pub fn registration_open(&self) -> bool {
        self.registration_open
    }

    /// Authenticate a username and password.
    ///
    /// # Errors
    /// `unauthorized` for unknown users or wrong passwords,
    /// `service_unavailable` when the directory fails.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<Session, Error> {
        let account = self
            .users
            .find(credentials.username())
            .await
            .map_err(map_directory_error)?
            .filter(|account| account.password.as_str() == credentials.password())
            .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
        self.session_for(account.actor())
    }

    /// Create a viewer account and sign it in.
    ///
    /// # Errors
    /// `forbidden` when registration is disabled, `conflict` when the
    /// username exists, `service_unavailable` when the directory fails.
    pub async fn register(&self, registration: Registration) -> Result<Session, Error> {
        if !self.registration_open {
            return Err(Error::forbidden("public registration is disabled"));
        }
        let account = UserAccount {
            username: registration.username().to_owned(),
            password: Zeroizing::new(registration.password().to_owned()),
            display_name: registration.display_name().to_owned(),
            role: Role::Viewer,
            created_at: Some(self.clock.utc()),
        };
        let actor = account.actor();
        self.users
            .insert(account)
            .await
            .map_err(map_directory_error)?;
        info!(username = %actor.username, "user registered");

        let session = self.session_for(actor)?;
        if let Err(error) = self
            .contacts
            .register_credentials(
                registration.display_name(),
                registration.username(),
                registration.password(),
            )
            .await
        {
            warn!(%error, username = registration.username(), "credentials row not recorded");
        }
        Ok(session)
    }

    fn session_for(&self, actor: Actor) -> Result<Session, Error> {
        let token = self.tokens.issue(&actor).map_err(map_token_error)?;
        Ok(Session { token, actor })
    }
}

fn map_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::AlreadyExists { username } => Error::conflict("user already exists")
            .with_details(json!({ "field": "username", "username": username })),
        UserDirectoryError::Unavailable { message } => {
            Error::service_unavailable("user directory unavailable")
                .with_details(json!({ "reason": message }))
        }
    }
}

fn map_token_error(error: AccessTokenError) -> Error {
    Error::internal(error.to_string())
}
