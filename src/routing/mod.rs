//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path)
//!     → router.rs (route lookup)
//!     → matcher.rs (bind path parameters)
//!     → Return: matched RouteDescriptor + params, or NoMatch
//!
//! Dispatch preparation:
//!     RouteDescriptor.action
//!     → template.rs (substitute params into the DAO target)
//!     → descriptor.rs (declared payload fields, relay policy)
//! ```
//!
//! # Design Decisions
//! - Routes built and validated at startup, immutable at runtime
//! - The table is passed to the HTTP server explicitly, never global
//! - Deterministic: same input always matches same route
//! - Most specific match wins

pub mod descriptor;
pub mod matcher;
pub mod router;
pub mod template;

pub use descriptor::{
    DaoRoute, FieldMapping, FieldSource, Operation, RouteAction, RouteDescriptor, ShellView,
    SuccessRelay, Subtitle,
};
pub use matcher::{PathParams, PatternError, RoutePattern};
pub use router::{RouteTable, RouteTableError};
pub use template::{TargetTemplate, TemplateError};
