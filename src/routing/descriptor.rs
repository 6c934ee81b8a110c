//! Route descriptors: the static definition of one inbound endpoint.

use axum::http::{Method, StatusCode};

use crate::routing::matcher::{PatternError, RoutePattern};
use crate::routing::template::{TargetTemplate, TemplateError};

/// Whether a DAO route fetches a representation or submits a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

/// Where a forwarded payload field takes its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldSource {
    /// A named field of the inbound body.
    Body(String),
    /// The authenticated caller's username.
    Username,
}

/// One field of the downstream payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Field name as the DAO service expects it.
    pub name: String,
    pub source: FieldSource,
}

impl FieldMapping {
    pub fn body(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Body(field.into()),
        }
    }

    pub fn username(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: FieldSource::Username,
        }
    }
}

/// How a successful downstream result becomes the outgoing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuccessRelay {
    /// Downstream status and body, unchanged.
    Passthrough,
    /// Fixed status, downstream body unchanged.
    Status(StatusCode),
}

/// A route served by calling the DAO service.
#[derive(Debug, Clone)]
pub struct DaoRoute {
    pub target: TargetTemplate,
    pub operation: Operation,
    pub fields: Vec<FieldMapping>,
    pub success: SuccessRelay,
}

impl DaoRoute {
    /// Plain fetch of the target; success relays as 200.
    pub fn read(target: &str) -> Result<Self, TemplateError> {
        Ok(Self {
            target: TargetTemplate::parse(target)?,
            operation: Operation::Read,
            fields: Vec::new(),
            success: SuccessRelay::Status(StatusCode::OK),
        })
    }

    /// Submission of the declared fields; success passes through.
    pub fn write(target: &str, fields: Vec<FieldMapping>) -> Result<Self, TemplateError> {
        Ok(Self {
            target: TargetTemplate::parse(target)?,
            operation: Operation::Write,
            fields,
            success: SuccessRelay::Passthrough,
        })
    }

    pub fn on_success(mut self, success: SuccessRelay) -> Self {
        self.success = success;
        self
    }
}

/// Subtitle shown by an HTML shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subtitle {
    None,
    Static(String),
    /// Value of the named path parameter.
    Param(String),
}

/// An HTML shell that boots a client-side script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellView {
    pub src_loc: String,
    pub subtitle: Subtitle,
}

impl ShellView {
    pub fn new(src_loc: impl Into<String>) -> Self {
        Self {
            src_loc: src_loc.into(),
            subtitle: Subtitle::None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: Subtitle) -> Self {
        self.subtitle = subtitle;
        self
    }
}

#[derive(Debug, Clone)]
pub enum RouteAction {
    Shell(ShellView),
    Dao(DaoRoute),
}

/// Static definition of how one HTTP endpoint is served.
#[derive(Debug, Clone)]
pub struct RouteDescriptor {
    /// Route identifier for logging/metrics.
    pub name: String,
    pub method: Method,
    pub pattern: RoutePattern,
    pub auth_required: bool,
    pub action: RouteAction,
}

impl RouteDescriptor {
    pub fn new(
        name: impl Into<String>,
        method: Method,
        pattern: &str,
        action: RouteAction,
    ) -> Result<Self, PatternError> {
        Ok(Self {
            name: name.into(),
            method,
            pattern: RoutePattern::parse(pattern)?,
            auth_required: false,
            action,
        })
    }

    pub fn shell(
        name: impl Into<String>,
        pattern: &str,
        view: ShellView,
    ) -> Result<Self, PatternError> {
        Self::new(name, Method::GET, pattern, RouteAction::Shell(view))
    }

    pub fn dao(
        name: impl Into<String>,
        method: Method,
        pattern: &str,
        route: DaoRoute,
    ) -> Result<Self, PatternError> {
        Self::new(name, method, pattern, RouteAction::Dao(route))
    }

    /// Gate this route behind an authenticated identity.
    pub fn requires_auth(mut self) -> Self {
        self.auth_required = true;
        self
    }

    pub fn dao_route(&self) -> Option<&DaoRoute> {
        match &self.action {
            RouteAction::Dao(route) => Some(route),
            RouteAction::Shell(_) => None,
        }
    }
}
