//! Path pattern compilation and matching.
//!
//! # Responsibilities
//! - Parse declarative patterns such as `/tasks/:id/complete`
//! - Match a request path against a compiled pattern
//! - Extract named parameters
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A `:name` segment binds exactly one non-empty segment
//! - Trailing slashes are significant (`/tasks/` does not match `/tasks`)

use std::collections::BTreeMap;
use thiserror::Error;

/// Named path parameters extracted from a match.
pub type PathParams = BTreeMap<String, String>;

/// Errors raised while compiling a pattern.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatternError {
    #[error("pattern must start with '/': {0}")]
    MissingLeadingSlash(String),

    #[error("empty parameter name in pattern: {0}")]
    EmptyParam(String),

    #[error("duplicate parameter '{name}' in pattern: {pattern}")]
    DuplicateParam { pattern: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route path pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile `pattern` into a matcher.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let Some(rest) = pattern.strip_prefix('/') else {
            return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
        };

        let mut segments = Vec::new();
        for part in rest.split('/') {
            match part.strip_prefix(':') {
                Some("") => return Err(PatternError::EmptyParam(pattern.to_string())),
                Some(name) => {
                    if segments.contains(&Segment::Param(name.to_string())) {
                        return Err(PatternError::DuplicateParam {
                            pattern: pattern.to_string(),
                            name: name.to_string(),
                        });
                    }
                    segments.push(Segment::Param(name.to_string()));
                }
                None => segments.push(Segment::Literal(part.to_string())),
            }
        }

        Ok(Self {
            raw: pattern.to_string(),
            segments,
        })
    }

    /// The pattern as declared.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match `path` (without query string) in full, returning bound parameters.
    pub fn matches(&self, path: &str) -> Option<PathParams> {
        let rest = path.strip_prefix('/')?;
        let mut parts = rest.split('/');
        let mut params = PathParams::new();

        for segment in &self.segments {
            let part = parts.next()?;
            match segment {
                Segment::Literal(literal) if literal == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }

        // Leftover segments mean the path is longer than the pattern.
        if parts.next().is_some() {
            return None;
        }
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_pattern() {
        let pattern = PathPattern::parse("/tasks").unwrap();
        assert_eq!(pattern.matches("/tasks"), Some(PathParams::new()));
        assert_eq!(pattern.matches("/tasks/"), None);
        assert_eq!(pattern.matches("/Tasks"), None);
        assert_eq!(pattern.matches("/tasksX"), None);
        assert_eq!(pattern.matches("tasks"), None);
    }

    #[test]
    fn test_param_binding() {
        let pattern = PathPattern::parse("/tasks/:id/complete").unwrap();

        let params = pattern.matches("/tasks/123/complete").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("123"));

        assert_eq!(pattern.matches("/tasks/123"), None);
        assert_eq!(pattern.matches("/tasks/123/completeX"), None);
        assert_eq!(pattern.matches("/tasks/123/complete/more"), None);
        assert_eq!(pattern.matches("/tasks//complete"), None);
    }

    #[test]
    fn test_multiple_params() {
        let pattern = PathPattern::parse("/lists/:list/tasks/:task").unwrap();
        let params = pattern.matches("/lists/a/tasks/b").unwrap();
        assert_eq!(params.get("list").map(String::as_str), Some("a"));
        assert_eq!(params.get("task").map(String::as_str), Some("b"));
    }

    #[test]
    fn test_invalid_patterns() {
        assert_eq!(
            PathPattern::parse("tasks"),
            Err(PatternError::MissingLeadingSlash("tasks".into()))
        );
        assert_eq!(
            PathPattern::parse("/tasks/:"),
            Err(PatternError::EmptyParam("/tasks/:".into()))
        );
        assert!(matches!(
            PathPattern::parse("/a/:id/b/:id"),
            Err(PatternError::DuplicateParam { .. })
        ));
    }
}
