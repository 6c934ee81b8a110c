//! Route table and lookup.
//!
//! # Responsibilities
//! - Store route descriptors
//! - Reject inconsistent descriptors at startup
//! - Look up the descriptor for a method and path
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan (acceptable for a handful of routes)
//! - Literal segments beat parameters, so `/tournament/create` is never
//!   read as a tournament named "create"
//! - Explicit NoMatch rather than silent default

use std::collections::HashSet;
use std::sync::Arc;

use axum::http::Method;
use thiserror::Error;

use crate::routing::descriptor::{
    DaoRoute, FieldMapping, FieldSource, Operation, RouteAction, RouteDescriptor, ShellView,
    Subtitle,
};
use crate::routing::matcher::{PathParams, PatternError};
use crate::routing::template::TemplateError;

/// Problems detected while assembling a route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteTableError {
    #[error(transparent)]
    Pattern(#[from] PatternError),

    #[error(transparent)]
    Template(#[from] TemplateError),

    #[error("route {method} {pattern} is declared more than once")]
    Duplicate { method: Method, pattern: String },

    #[error("route '{route}' targets placeholder '{name}' that its path does not bind")]
    UnboundPlaceholder { route: String, name: String },

    #[error("route '{route}' shows subtitle parameter '{name}' that its path does not bind")]
    UnboundSubtitle { route: String, name: String },

    #[error("route '{route}' is a read but declares payload fields")]
    ReadWithPayload { route: String },

    #[error("route '{route}' uses {method} for a {operation:?} operation")]
    MethodMismatch {
        route: String,
        method: Method,
        operation: Operation,
    },

    #[error("route '{route}' forwards field '{name}' more than once")]
    DuplicateField { route: String, name: String },

    #[error("route '{route}' maps field '{name}' from an empty body field name")]
    EmptyField { route: String, name: String },

    #[error("route '{route}' forwards the caller's username but does not require authentication")]
    UsernameWithoutAuth { route: String },
}

/// Immutable table of route descriptors.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Arc<RouteDescriptor>>,
}

impl RouteTable {
    /// Build a table, validating every descriptor.
    pub fn new(routes: Vec<RouteDescriptor>) -> Result<Self, RouteTableError> {
        let mut seen = HashSet::new();
        for route in &routes {
            if !seen.insert((route.method.clone(), route.pattern.as_str().to_string())) {
                return Err(RouteTableError::Duplicate {
                    method: route.method.clone(),
                    pattern: route.pattern.as_str().to_string(),
                });
            }
            validate_route(route)?;
        }

        Ok(Self {
            routes: routes.into_iter().map(Arc::new).collect(),
        })
    }

    /// The tournament resource's routes.
    pub fn tournaments() -> Result<Self, RouteTableError> {
        Self::new(vec![
            RouteDescriptor::shell(
                "tournament_list",
                "/tournaments",
                ShellView::new("/tournamentList.js"),
            )?,
            RouteDescriptor::dao(
                "tournament_list_content",
                Method::GET,
                "/tournaments/content",
                DaoRoute::read("/tournament/")?,
            )?,
            RouteDescriptor::shell(
                "tournament_create_form",
                "/tournament/create",
                ShellView::new("/tournamentCreate.js")
                    .with_subtitle(Subtitle::Static("Add a Tournament".into())),
            )?
            .requires_auth(),
            RouteDescriptor::dao(
                "tournament_create",
                Method::POST,
                "/tournament/create",
                DaoRoute::write(
                    "/tournament",
                    vec![
                        FieldMapping::body("inputTournamentName", "name"),
                        FieldMapping::body("inputTournamentDate", "date"),
                    ],
                )?,
            )?
            .requires_auth(),
            RouteDescriptor::shell(
                "tournament_info",
                "/tournament/{tournament}",
                ShellView::new("/tournamentInfo.js")
                    .with_subtitle(Subtitle::Param("tournament".into())),
            )?,
            RouteDescriptor::dao(
                "tournament_register",
                Method::POST,
                "/tournament/{tournament}",
                DaoRoute::write(
                    "/tournament/{tournament}/register",
                    vec![FieldMapping::username("inputUserName")],
                )?,
            )?
            .requires_auth(),
            RouteDescriptor::dao(
                "tournament_content",
                Method::GET,
                "/tournament/{tournament}/content",
                DaoRoute::read("/tournament/{tournament}")?,
            )?,
        ])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<RouteDescriptor>> {
        self.routes.iter()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the most specific route for a method and path.
    pub fn find(&self, method: &Method, path: &str) -> Option<(Arc<RouteDescriptor>, PathParams)> {
        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .filter_map(|route| route.pattern.capture(path).map(|params| (route, params)))
            .max_by_key(|(route, _)| route.pattern.specificity())
            .map(|(route, params)| (route.clone(), params))
    }
}

fn validate_route(route: &RouteDescriptor) -> Result<(), RouteTableError> {
    match &route.action {
        RouteAction::Shell(view) => {
            if route.method != Method::GET {
                return Err(RouteTableError::MethodMismatch {
                    route: route.name.clone(),
                    method: route.method.clone(),
                    operation: Operation::Read,
                });
            }
            if let Subtitle::Param(name) = &view.subtitle {
                if !route.pattern.binds(name) {
                    return Err(RouteTableError::UnboundSubtitle {
                        route: route.name.clone(),
                        name: name.clone(),
                    });
                }
            }
        }
        RouteAction::Dao(dao) => validate_dao_route(route, dao)?,
    }
    Ok(())
}

fn validate_dao_route(route: &RouteDescriptor, dao: &DaoRoute) -> Result<(), RouteTableError> {
    for name in dao.target.placeholders() {
        if !route.pattern.binds(name) {
            return Err(RouteTableError::UnboundPlaceholder {
                route: route.name.clone(),
                name: name.to_string(),
            });
        }
    }

    let method_fits = match dao.operation {
        Operation::Read => route.method == Method::GET,
        Operation::Write => route.method != Method::GET && route.method != Method::HEAD,
    };
    if !method_fits {
        return Err(RouteTableError::MethodMismatch {
            route: route.name.clone(),
            method: route.method.clone(),
            operation: dao.operation,
        });
    }

    if dao.operation == Operation::Read && !dao.fields.is_empty() {
        return Err(RouteTableError::ReadWithPayload {
            route: route.name.clone(),
        });
    }

    let mut names = HashSet::new();
    for field in &dao.fields {
        if !names.insert(field.name.as_str()) {
            return Err(RouteTableError::DuplicateField {
                route: route.name.clone(),
                name: field.name.clone(),
            });
        }
        match &field.source {
            FieldSource::Body(source) if source.is_empty() => {
                return Err(RouteTableError::EmptyField {
                    route: route.name.clone(),
                    name: field.name.clone(),
                });
            }
            FieldSource::Username if !route.auth_required => {
                return Err(RouteTableError::UsernameWithoutAuth {
                    route: route.name.clone(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}
