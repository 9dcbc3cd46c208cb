//! Port for issuing and verifying bearer access tokens.

use crate::domain::Actor;

use super::define_port_error;

define_port_error! {
    /// Failures raised by access token codecs.
    pub enum AccessTokenError {
        /// The token is malformed, forged, or expired.
        Invalid { message: String } => "invalid access token: {message}",
        /// A token could not be produced.
        Signing { message: String } => "access token signing failed: {message}",
    }
}

/// Stateless bearer token codec.
#[cfg_attr(test, mockall::automock)]
pub trait AccessTokens: Send + Sync {
    /// Issue a token carrying `actor`.
    ///
    /// # Errors
    /// Returns [`AccessTokenError::Signing`] when the codec cannot sign.
    fn issue(&self, actor: &Actor) -> Result<String, AccessTokenError>;

    /// Recover the actor carried by `token`.
    ///
    /// # Errors
    /// Returns [`AccessTokenError::Invalid`] for bad or expired tokens.
    fn verify(&self, token: &str) -> Result<Actor, AccessTokenError>;
}
