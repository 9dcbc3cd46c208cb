//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod contacts;
pub mod error;
pub mod google;
pub mod health;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;

/// Register every `/api` handler on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use contact_registry::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api").configure(configure_api));
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(contacts::check_contact)
        .service(contacts::add_contact)
        .service(contacts::list_contacts)
        .service(users::login)
        .service(users::register)
        .service(google::google_status)
        .service(google::google_auth_url)
        .service(google::google_oauth_callback);
}
