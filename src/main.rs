//! Tournament Gateway
//!
//! HTTP front for the tournament resource, delegating all state to the DAO service.
//!
//! # Architecture Overview
//!
//! ```text
//!                     ┌──────────────────────────────────────────────────────┐
//!                     │                  TOURNAMENT GATEWAY                  │
//!                     │                                                      │
//!   Client Request    │  ┌──────────┐   ┌───────────┐   ┌────────────────┐   │
//!   ──────────────────┼─▶│  http    │──▶│ security  │──▶│   routing      │   │
//!                     │  │ server   │   │ auth gate │   │ descriptor     │   │
//!                     │  └──────────┘   └───────────┘   └───────┬────────┘   │
//!                     │                                         │            │
//!                     │                                         ▼            │
//!   Client Response   │  ┌──────────┐                   ┌────────────────┐   │
//!   ◀─────────────────┼──│  relay   │◀──────────────────│   dao client   │◀──┼── DAO
//!                     │  └──────────┘                   └────────────────┘   │   Service
//!                     │                                                      │
//!                     │  config · observability · lifecycle                  │
//!                     └──────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use tournament_gateway::config::{load_config, GatewayConfig};
use tournament_gateway::lifecycle::{build_server, Shutdown};
use tournament_gateway::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "tournament-gateway")]
#[command(about = "Routes tournament requests to the DAO service", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init_logging(&config.observability.log_level);
    tracing::info!("tournament-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        dao = %config.dao.base_url,
        config_file = ?cli.config,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = build_server(config)?;

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    shutdown.trigger_on_signal();

    server.run(listener, stop).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
