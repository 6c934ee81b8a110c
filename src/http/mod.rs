//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, route registration)
//!     → request.rs (request ID, body decoding, InboundRequest)
//!     → [security gate, DAO call]
//!     → response.rs (relay downstream result)
//!     → Send to client
//! ```

pub mod health;
pub mod request;
pub mod response;
pub mod server;
pub mod views;

pub use request::{InboundRequest, MakeRequestUuid, X_REQUEST_ID};
pub use response::{relay, GatewayError};
pub use server::{AppState, HttpServer};
