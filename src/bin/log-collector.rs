//! Standalone log collector.
//!
//! Listens on `LOG_RELAY_HOST:LOG_RELAY_PORT` (default `0.0.0.0:3000`) and
//! prints every event posted to `/logs` on stdout.

use log_relay::config::CollectorConfig;
use log_relay::init::init_tracing;
use log_relay::server::CollectorServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing("info");

    let server = CollectorServer::new(CollectorConfig::from_env());
    tracing::info!("Log collector starting, press Ctrl+C to stop");

    server.run().await
}
