//! Port for the directory of login accounts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use zeroize::Zeroizing;

use crate::domain::{Actor, Role};

use super::define_port_error;

define_port_error! {
    /// Failures raised by user directory adapters.
    pub enum UserDirectoryError {
        /// The directory could not be read or updated.
        Unavailable { message: String } => "user directory unavailable: {message}",
        /// A user with this name already exists, ignoring case.
        AlreadyExists { username: String } => "user {username} already exists",
    }
}

/// A login account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    /// Login name.
    pub username: String,
    /// Secret compared verbatim at login.
    pub password: Zeroizing<String>,
    /// Human-readable name.
    pub display_name: String,
    /// Access role.
    pub role: Role,
    /// When the account was self-registered; seeded accounts have none.
    pub created_at: Option<DateTime<Utc>>,
}

impl UserAccount {
    /// Identity carried in access tokens for this account.
    #[must_use]
    pub fn actor(&self) -> Actor {
        Actor {
            username: self.username.clone(),
            display_name: self.display_name.clone(),
            role: self.role,
        }
    }
}

/// Lookup and registration of login accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Account whose username matches exactly.
    async fn find(&self, username: &str) -> Result<Option<UserAccount>, UserDirectoryError>;

    /// Add a new account, rejecting case-insensitive duplicates.
    async fn insert(&self, account: UserAccount) -> Result<(), UserDirectoryError>;
}
