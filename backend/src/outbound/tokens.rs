//! HS256 bearer tokens carrying the caller's identity.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{AccessTokenError, AccessTokens};
use crate::domain::{Actor, Role};

/// Lifetime of issued tokens.
pub const TOKEN_LIFETIME_HOURS: i64 = 12;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    username: String,
    name: String,
    role: Role,
    iat: i64,
    exp: i64,
}

/// [`AccessTokens`] signed with a shared secret.
///
/// Expiry is checked against the injected clock rather than system time.
pub struct JwtAccessTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    clock: Arc<dyn Clock>,
}

impl JwtAccessTokens {
    /// HS256 tokens signed with `secret`, expiring against `clock`.
    pub fn new(secret: &[u8], clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            clock,
        }
    }
}

impl AccessTokens for JwtAccessTokens {
    fn issue(&self, actor: &Actor) -> Result<String, AccessTokenError> {
        let now = self.clock.utc();
        let claims = Claims {
            username: actor.username.clone(),
            name: actor.display_name.clone(),
            role: actor.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|err| AccessTokenError::signing(err.to_string()))
    }

    fn verify(&self, token: &str) -> Result<Actor, AccessTokenError> {
        let claims = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| AccessTokenError::invalid(err.to_string()))?
            .claims;
        if claims.exp <= self.clock.utc().timestamp() {
            return Err(AccessTokenError::invalid("token expired"));
        }
        Ok(Actor {
            username: claims.username,
            display_name: claims.name,
            role: claims.role,
        })
    }
}
