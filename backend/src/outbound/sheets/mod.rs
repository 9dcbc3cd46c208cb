//! Google Sheets adapter for the contact store.
//!
//! Layers, bottom up: `client` speaks the values API, `credentials` locates a
//! service-account key or OAuth token, `service_account` and `oauth` turn
//! those into access tokens, `access` caches them, and `store` implements
//! the contact store port on top. `authorization` drives the admin consent
//! flow that produces OAuth tokens.

mod access;
mod authorization;
mod client;
mod credentials;
mod dto;
mod error;
mod oauth;
mod service_account;
mod store;
mod transport;

pub use access::AccessTokenSource;
pub use authorization::GoogleSheetsAuthorization;
pub use client::{SHEETS_API_BASE, SheetsClient, a1_range};
pub use credentials::{
    Credential, CredentialChain, CredentialProvider, GOOGLE_TOKEN_URI, OAuthToken, OAuthTokenFile,
    ServiceAccountKey, probe_sources,
};
pub use error::SheetsError;
pub use oauth::{GOOGLE_AUTH_URI, GoogleOAuth};
pub use service_account::{IssuedToken, ServiceAccountExchange};
pub use store::SheetsContactStore;

/// Read-write access to spreadsheets.
pub const SPREADSHEETS_SCOPE: &str = "https://www.googleapis.com/auth/spreadsheets";
