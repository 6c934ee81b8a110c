//! DAO service integration.
//!
//! # Data Flow
//! ```text
//! RouteDescriptor + InboundRequest (+ Identity)
//!     → call.rs (DownstreamCall: target, payload, caller)
//!     → client.rs (HTTP call, timeout)
//!     → types.rs (DaoResponse | DaoError)
//!     → http/response.rs (relay)
//! ```

pub mod call;
pub mod client;
pub mod types;

pub use call::DownstreamCall;
pub use client::{DaoClient, HttpDaoClient};
pub use types::{DaoError, DaoPayload, DaoResponse, DaoResult};
