//! Relay entry-point: loads configuration, wires adapters, and serves HTTP.

mod server;

use actix_web::web;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use point_relay::inbound::http::health::HealthState;
use point_relay::settings::RelaySettings;
use server::{ServerConfig, build_points_processing, create_server};

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

    let settings = RelaySettings::from_env().map_err(|e| {
        error!(error = %e, "invalid configuration");
        std::io::Error::other(e)
    })?;
    let points = build_points_processing(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(settings.bind_addr(), points);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::make_metrics()?));

    let server = create_server(health_state, config)?;
    info!(bind_addr = %settings.bind_addr(), "point relay listening");
    server.await
}
