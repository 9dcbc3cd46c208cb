//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod access_tokens;
mod contact_store;
mod sheets_authorization;
mod user_directory;

#[cfg(test)]
pub use access_tokens::MockAccessTokens;
pub use access_tokens::{AccessTokenError, AccessTokens};
#[cfg(test)]
pub use contact_store::MockContactStore;
pub use contact_store::{ContactStore, ContactStoreError};
#[cfg(test)]
pub use sheets_authorization::MockSheetsAuthorization;
pub use sheets_authorization::{
    CredentialSources, SheetsAuthorization, SheetsAuthorizationError,
};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserAccount, UserDirectory, UserDirectoryError};
