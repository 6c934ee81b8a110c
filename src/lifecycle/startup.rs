//! Startup orchestration.
//!
//! # Responsibilities
//! - Build and validate the route table
//! - Create the DAO client and seed the session store
//! - Assemble the HTTP server
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listeners are bound by the caller, after this succeeds

use std::sync::Arc;

use thiserror::Error;

use crate::config::GatewayConfig;
use crate::dao::{DaoError, HttpDaoClient};
use crate::http::HttpServer;
use crate::routing::{RouteTable, RouteTableError};
use crate::security::MemorySessionStore;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("route table: {0}")]
    Routes(#[from] RouteTableError),

    #[error("DAO client: {0}")]
    Dao(#[from] DaoError),
}

/// Build the gateway for the tournament routes from a validated config.
pub fn build_server(config: GatewayConfig) -> Result<HttpServer, StartupError> {
    let routes = RouteTable::tournaments()?;
    let dao = HttpDaoClient::new(&config.dao)?;
    let sessions = MemorySessionStore::from_config(&config.auth.sessions);

    tracing::info!(
        routes = routes.len(),
        sessions = sessions.len(),
        dao = %config.dao.base_url,
        timeout_secs = config.dao.timeout_secs,
        "Gateway assembled"
    );

    Ok(HttpServer::new(config, &routes, Arc::new(dao), Arc::new(sessions)))
}
