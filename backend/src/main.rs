//! Backend entry-point: loads settings, wires the POI pipeline and serves HTTP.

mod server;

use std::io;

use actix_web::web;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use poi_backend::inbound::http::health::HealthState;
use poi_backend::outbound::persistence::{DbPool, PoolConfig};
use ortho_config::OrthoConfig;
use poi_backend::settings::ServiceSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::load_from_iter(std::env::args_os())
        .map_err(|e| io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid bind host: {e}")))?;

    let mut config = ServerConfig::new(bind_addr).with_upload_policy(settings.upload_policy());
    if let Some(url) = settings.database_url() {
        let pool = DbPool::new(PoolConfig::new(url).with_max_size(settings.pool_max_size()))
            .await
            .map_err(|e| io::Error::other(format!("failed to create database pool: {e}")))?;
        config = config.with_db_pool(pool);
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "POI service listening");
    server.await
}
