//! Contact registry backend library.
//!
//! The domain owns duplicate detection and access rules; adapters under
//! [`outbound`] bind it to a spreadsheet or a relational table, and
//! [`inbound::http`] exposes it over REST.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod selector;
#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
