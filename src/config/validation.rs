//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, body limit > 0)
//! - Check that addresses and URLs parse
//! - Detect duplicate session tokens
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("dao.base_url '{0}' is not an absolute http URL")]
    DaoBaseUrl(String),

    #[error("dao.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("dao.identity_header '{0}' is not a valid header name")]
    IdentityHeader(String),

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,

    #[error("auth.login_path '{0}' must start with '/'")]
    LoginPath(String),

    #[error("auth.sessions[{0}] has an empty token or username")]
    EmptySession(usize),

    #[error("auth.sessions[{0}] reuses a token already bound to another session")]
    DuplicateToken(usize),
}

/// Check a parsed configuration, collecting every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    match Url::parse(&config.dao.base_url) {
        Ok(url) if url.scheme() == "http" && url.has_host() => {}
        _ => errors.push(ValidationError::DaoBaseUrl(config.dao.base_url.clone())),
    }

    if config.dao.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if axum::http::HeaderName::from_bytes(config.dao.identity_header.as_bytes()).is_err() {
        errors.push(ValidationError::IdentityHeader(config.dao.identity_header.clone()));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if let Some(path) = &config.auth.login_path {
        if !path.starts_with('/') {
            errors.push(ValidationError::LoginPath(path.clone()));
        }
    }

    let mut tokens = HashSet::new();
    for (i, session) in config.auth.sessions.iter().enumerate() {
        if session.token.is_empty() || session.username.is_empty() {
            errors.push(ValidationError::EmptySession(i));
            continue;
        }
        if !tokens.insert(session.token.as_str()) {
            errors.push(ValidationError::DuplicateToken(i));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
