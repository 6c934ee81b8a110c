//! Path pattern matching.
//!
//! # Responsibilities
//! - Parse inbound path patterns (`/tournament/{tournament}/content`)
//! - Bind named parameters from a concrete request path
//! - Report how specific a pattern is so literal routes win over parameters
//!
//! # Design Decisions
//! - Parameters occupy a whole segment, never part of one
//! - Path matching is case-sensitive
//! - No regex to guarantee O(n) matching
//! - Pattern syntax is the one axum registers, so the same string serves both

use std::collections::BTreeMap;

use thiserror::Error;

/// Parameter values bound from a request path, keyed by parameter name.
pub type PathParams = BTreeMap<String, String>;

/// Errors raised while parsing a path pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern '{0}' must start with '/'")]
    MissingLeadingSlash(String),

    #[error("pattern '{0}' contains an empty segment")]
    EmptySegment(String),

    #[error("pattern '{pattern}' has a malformed parameter segment '{segment}'")]
    MalformedParam { pattern: String, segment: String },

    #[error("pattern '{pattern}' declares parameter '{name}' twice")]
    DuplicateParam { pattern: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A parsed inbound path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    /// Parse a pattern such as `/tournament/{tournament}`.
    pub fn parse(raw: &str) -> Result<Self, PatternError> {
        let rest = raw
            .strip_prefix('/')
            .ok_or_else(|| PatternError::MissingLeadingSlash(raw.to_string()))?;

        let mut segments = Vec::new();
        if !rest.is_empty() {
            for part in rest.split('/') {
                if part.is_empty() {
                    return Err(PatternError::EmptySegment(raw.to_string()));
                }
                let segment = match parse_placeholder(part) {
                    Some(Ok(name)) => {
                        if segments.contains(&Segment::Param(name.to_string())) {
                            return Err(PatternError::DuplicateParam {
                                pattern: raw.to_string(),
                                name: name.to_string(),
                            });
                        }
                        Segment::Param(name.to_string())
                    }
                    Some(Err(())) => {
                        return Err(PatternError::MalformedParam {
                            pattern: raw.to_string(),
                            segment: part.to_string(),
                        })
                    }
                    None => Segment::Literal(part.to_string()),
                };
                segments.push(segment);
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
        })
    }

    /// The pattern text, in the form axum registers.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Names of the parameters this pattern binds, in path order.
    pub fn params(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Param(name) => Some(name.as_str()),
            Segment::Literal(_) => None,
        })
    }

    /// Returns true if the pattern binds a parameter with this name.
    pub fn binds(&self, name: &str) -> bool {
        self.params().any(|p| p == name)
    }

    /// Number of literal segments; higher means more specific.
    pub fn specificity(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count()
    }

    /// Match a request path, binding parameter values verbatim.
    pub fn capture(&self, path: &str) -> Option<PathParams> {
        let rest = path.strip_prefix('/')?;
        let parts: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };

        if parts.len() != self.segments.len() {
            return None;
        }

        let mut params = PathParams::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

/// `Some(Ok(name))` for `{name}`, `Some(Err(()))` for a broken placeholder,
/// `None` for plain text.
pub(crate) fn parse_placeholder(part: &str) -> Option<Result<&str, ()>> {
    if !part.contains('{') && !part.contains('}') {
        return None;
    }
    let name = part
        .strip_prefix('{')
        .and_then(|p| p.strip_suffix('}'))
        .filter(|name| is_identifier(name));
    Some(name.ok_or(()))
}

pub(crate) fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
