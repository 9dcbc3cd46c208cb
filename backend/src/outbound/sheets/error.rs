//! Failures raised by the spreadsheet adapters.

use crate::domain::ports::ContactStoreError;

/// Errors from the Sheets client, credential chain and OAuth flows.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SheetsError {
    /// `GOOGLE_SHEETS_SPREADSHEET_ID` is not set.
    #[error("GOOGLE_SHEETS_SPREADSHEET_ID is not configured")]
    MissingSpreadsheetId,
    /// Every credential source was absent or unusable.
    #[error("no credentials available: {hint}")]
    NoCredentials { hint: String },
    /// A credential source exists but cannot be parsed.
    #[error("credential source {origin} is malformed: {message}")]
    MalformedCredential {
        origin: &'static str,
        message: String,
    },
    /// The OAuth client id or secret is missing.
    #[error("Google OAuth client is not configured")]
    OAuthNotConfigured,
    /// The stored OAuth token expired and cannot be refreshed.
    #[error("OAuth token expired and has no refresh token; authorize again")]
    RefreshUnavailable,
    /// An endpoint URL could not be built.
    #[error("invalid endpoint: {message}")]
    Endpoint { message: String },
    /// The request did not complete in time.
    #[error("request timed out: {message}")]
    Timeout { message: String },
    /// The request failed before a response arrived.
    #[error("transport failure: {message}")]
    Transport { message: String },
    /// Google answered with a non-success status.
    #[error("Google API error {status}: {message}")]
    Status { status: u16, message: String },
    /// A response body could not be decoded.
    #[error("undecodable response: {message}")]
    Decode { message: String },
    /// A service-account assertion could not be signed.
    #[error("assertion signing failed: {message}")]
    Signing { message: String },
    /// A token could not be written to disk.
    #[error("failed to persist OAuth token: {message}")]
    Persist { message: String },
}

impl SheetsError {
    /// Build a [`SheetsError::Decode`].
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Build a [`SheetsError::Transport`].
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Build a [`SheetsError::Endpoint`].
    pub fn endpoint(message: impl Into<String>) -> Self {
        Self::Endpoint {
            message: message.into(),
        }
    }
}

impl From<SheetsError> for ContactStoreError {
    fn from(value: SheetsError) -> Self {
        Self::unavailable(value.to_string())
    }
}
