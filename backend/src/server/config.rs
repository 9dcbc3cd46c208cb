//! HTTP server configuration object.

use std::net::{Ipv4Addr, SocketAddr};

use contact_registry::config::AppSettings;

/// Settings consumed when building the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }

    /// Listen on every interface at the configured port.
    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        Self::new(SocketAddr::from((Ipv4Addr::UNSPECIFIED, settings.port)))
    }

    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
