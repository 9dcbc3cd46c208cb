//! Bearer-token extractors enforcing the access policies.
//!
//! Handlers name the policy they need by taking [`ContactCaller`] or
//! [`AdminCaller`] as an argument; rejection happens before the handler
//! body runs.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::{Ready, ready};
use tracing::debug;

use crate::domain::{Actor, Error, Role};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Token carried in `Authorization: Bearer <token>`, if any.
pub fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn http_state(req: &HttpRequest) -> Result<&HttpState, Error> {
    req.app_data::<web::Data<HttpState>>()
        .map(|data| data.get_ref())
        .ok_or_else(|| Error::internal("HTTP state is not registered"))
}

fn authenticated(state: &HttpState, req: &HttpRequest) -> Result<Actor, Error> {
    let token = bearer_token(req).ok_or_else(|| Error::unauthorized("missing bearer token"))?;
    state.tokens.verify(token).map_err(|error| {
        debug!(%error, "bearer token rejected");
        Error::unauthorized("invalid bearer token")
    })
}

/// Caller allowed to check and add contacts.
///
/// With public contact access enabled, a missing or invalid token yields the
/// public actor. Otherwise the token must be valid and carry a contact role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactCaller(pub Actor);

impl ContactCaller {
    fn resolve(req: &HttpRequest) -> Result<Self, Error> {
        let state = http_state(req)?;
        if state.allow_public_contacts {
            let actor = authenticated(state, req).unwrap_or_else(|_| Actor::public());
            return Ok(Self(actor));
        }
        let actor = authenticated(state, req)?;
        if !actor.role.can_register_contacts() {
            return Err(Error::forbidden("permission denied"));
        }
        Ok(Self(actor))
    }
}

impl FromRequest for ContactCaller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::resolve(req))
    }
}

/// Authenticated caller holding the admin role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCaller(pub Actor);

impl AdminCaller {
    fn resolve(req: &HttpRequest) -> Result<Self, Error> {
        let actor = authenticated(http_state(req)?, req)?;
        if actor.role != Role::Admin {
            return Err(Error::forbidden("permission denied"));
        }
        Ok(Self(actor))
    }
}

impl FromRequest for AdminCaller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::resolve(req))
    }
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
