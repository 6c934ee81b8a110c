//! Downstream target templates.
//!
//! A template is a DAO resource path with `{name}` placeholders, e.g.
//! `/tournament/{tournament}/register`. Resolution substitutes bound path
//! parameters literally and in order. Values are checked against a fixed
//! segment alphabet first so a crafted parameter cannot steer the call to a
//! different downstream resource.

use thiserror::Error;

use crate::routing::matcher::{is_identifier, PathParams};

/// Errors raised while parsing or resolving a target template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("target template '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    #[error("target template '{0}' has an unterminated or malformed placeholder")]
    MalformedPlaceholder(String),

    #[error("path parameter '{0}' is not bound")]
    Unbound(String),

    #[error("path parameter '{name}' contains characters outside [A-Za-z0-9._-]")]
    InvalidParam { name: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text(String),
    Placeholder(String),
}

/// A parsed downstream target path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetTemplate {
    raw: String,
    parts: Vec<Part>,
}

impl TargetTemplate {
    pub fn parse(raw: &str) -> Result<Self, TemplateError> {
        if !raw.starts_with('/') {
            return Err(TemplateError::MissingLeadingSlash(raw.to_string()));
        }

        let malformed = || TemplateError::MalformedPlaceholder(raw.to_string());
        let mut parts = Vec::new();
        let mut rest = raw;
        while let Some(open) = rest.find('{') {
            let (text, tail) = rest.split_at(open);
            if text.contains('}') {
                return Err(malformed());
            }
            if !text.is_empty() {
                parts.push(Part::Text(text.to_string()));
            }
            let close = tail.find('}').ok_or_else(malformed)?;
            let name = &tail[1..close];
            if !is_identifier(name) {
                return Err(malformed());
            }
            parts.push(Part::Placeholder(name.to_string()));
            rest = &tail[close + 1..];
        }
        if rest.contains('}') {
            return Err(malformed());
        }
        if !rest.is_empty() {
            parts.push(Part::Text(rest.to_string()));
        }

        Ok(Self {
            raw: raw.to_string(),
            parts,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Placeholder names in template order.
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.parts.iter().filter_map(|p| match p {
            Part::Placeholder(name) => Some(name.as_str()),
            Part::Text(_) => None,
        })
    }

    /// Substitute every placeholder from `params`.
    pub fn resolve(&self, params: &PathParams) -> Result<String, TemplateError> {
        let mut target = String::with_capacity(self.raw.len());
        for part in &self.parts {
            match part {
                Part::Text(text) => target.push_str(text),
                Part::Placeholder(name) => {
                    let value = params
                        .get(name)
                        .ok_or_else(|| TemplateError::Unbound(name.clone()))?;
                    if !is_safe_segment(value) {
                        return Err(TemplateError::InvalidParam {
                            name: name.clone(),
                            value: value.clone(),
                        });
                    }
                    target.push_str(value);
                }
            }
        }
        Ok(target)
    }
}

/// Allowed alphabet for a substituted path parameter.
pub fn is_safe_segment(value: &str) -> bool {
    !value.is_empty()
        && value
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.'))
        && !value.bytes().all(|b| b == b'.')
}
