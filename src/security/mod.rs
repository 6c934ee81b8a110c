//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request
//!     → access_control.rs (inject_identity: token → Identity extension)
//!     → [handler] AuthGate::authenticate (gated routes need an Identity)
//!     → headers.rs (hardening headers on the way out)
//! ```
//!
//! # Design Decisions
//! - Identity injection never rejects; only the per-route gate does
//! - Sessions are owned elsewhere; session.rs is the lookup seam
//! - Rejection happens before any downstream call is built

pub mod access_control;
pub mod headers;
pub mod session;

pub use access_control::{inject_identity, AuthGate, IdentityState, Rejection};
pub use session::{Identity, MemorySessionStore, SessionStore};
