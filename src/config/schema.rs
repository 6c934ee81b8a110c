//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the tournament gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream DAO service settings.
    pub dao: DaoConfig,

    /// Session and login settings.
    pub auth: AuthConfig,

    /// Request hardening.
    pub security: SecurityConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// DAO service connection settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DaoConfig {
    /// Base URL every downstream target path is appended to.
    pub base_url: String,

    /// Upper bound for a single downstream call, in seconds.
    pub timeout_secs: u64,

    /// Header carrying the caller's username on authenticated calls.
    pub identity_header: String,
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 10,
            identity_header: "x-caller-username".to_string(),
        }
    }
}

/// Session resolution and login redirect settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Where unauthenticated browsers are sent. `None` answers 401 everywhere.
    pub login_path: Option<String>,

    /// Name of the cookie holding the session token.
    pub session_cookie: String,

    /// Sessions known at startup.
    pub sessions: Vec<SessionConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            login_path: Some("/login".to_string()),
            session_cookie: "session".to_string(),
            sessions: Vec::new(),
        }
    }
}

/// A session token bound to a username.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    pub token: String,
    pub username: String,
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Maximum inbound body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            max_body_size: 64 * 1024,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
