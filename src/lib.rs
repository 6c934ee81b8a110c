//! Tournament gateway library.
//!
//! Routes tournament requests to the DAO service: an auth gate on the
//! routes that change state, then a declared translation from the inbound
//! request to one downstream call, then a relay of the result.

pub mod config;
pub mod dao;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod security;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RouteTable;
