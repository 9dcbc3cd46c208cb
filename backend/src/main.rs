//! Backend entry-point: reads settings, binds the contact store once and
//! serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use contact_registry::config::AppSettings;
use contact_registry::inbound::http::health::HealthState;
use server::{BuiltState, ServerConfig, build_http_state, create_server, prepare_store};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::from_process_env().map_err(std::io::Error::other)?;
    let BuiltState { http_state, store } =
        build_http_state(&settings, Arc::new(DefaultClock)).map_err(std::io::Error::other)?;
    prepare_store(store.as_ref()).await;

    let config = ServerConfig::from_settings(&settings);
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), http_state, &config)?;
    health_state.mark_ready();
    info!(addr = %config.bind_addr(), "listening");
    server.await
}
