//! CLI for the rezd resolution server.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use rezd_core::config;
use rezd_core::fetcher::DeliveryClient;

use crate::routes::{self, AppState};

/// rezd: batch image-resolution server.
#[derive(Debug, Parser)]
#[command(name = "rezd")]
#[command(about = "Resolve pixel dimensions for batches of remote assets", long_about = None)]
pub struct Cli {
    /// Port to listen on (all interfaces). Overrides the config file.
    #[arg(long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Maximum concurrent in-flight fetches per batch. Overrides the config file.
    #[arg(long, value_name = "N")]
    pub max_in_flight: Option<usize>,

    /// Wall-clock deadline for a whole batch, in seconds. Overrides the config file.
    #[arg(long, value_name = "SECS")]
    pub batch_deadline: Option<u64>,
}

pub async fn run_from_args() -> Result<()> {
    serve(Cli::parse()).await
}

async fn serve(cli: Cli) -> Result<()> {
    let mut cfg = config::load_or_init()?;
    if let Some(port) = cli.port {
        cfg.listen_port = port;
    }
    if let Some(n) = cli.max_in_flight {
        cfg.max_in_flight = n;
    }
    if let Some(secs) = cli.batch_deadline {
        cfg.batch_deadline_secs = Some(secs);
    }

    let client = DeliveryClient::new(
        &cfg.delivery,
        Duration::from_secs(cfg.fetch_timeout_secs),
    )?;
    let state = Arc::new(AppState {
        fetch: Arc::new(client),
        max_in_flight: cfg.max_in_flight,
        batch_deadline: cfg.batch_deadline_secs.map(Duration::from_secs),
    });

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], cfg.listen_port));
    tracing::info!(%addr, max_in_flight = cfg.max_in_flight, "rezd listening");
    warp::serve(routes::routes(state)).run(addr).await;
    Ok(())
}
