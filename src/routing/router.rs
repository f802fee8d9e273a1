//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store compiled routes in declaration order
//! - Look up the matching route for a method and raw path
//! - Decode the query string
//! - Return matched route or explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over routes of the request method (route tables are small)
//! - Explicit NoRouteMatched rather than silent default

use std::collections::BTreeMap;

use axum::http::Method;
use thiserror::Error;

use super::matcher::{PathParams, PathPattern, PatternError};

/// Decoded query string parameters. Repeated keys keep the last value.
pub type QueryParams = BTreeMap<String, String>;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoutingError {
    #[error("no route matched {method} {path}")]
    NoRouteMatched { method: Method, path: String },
}

/// One entry of the route table.
#[derive(Debug, Clone)]
pub struct Route<H> {
    pub method: Method,
    pub pattern: PathPattern,
    pub handler: H,
}

/// A successful lookup.
#[derive(Debug)]
pub struct RouteMatch<'a, H> {
    pub handler: &'a H,
    pub pattern: &'a PathPattern,
    pub params: PathParams,
    pub query: QueryParams,
}

/// Ordered route table.
#[derive(Debug, Clone)]
pub struct Router<H> {
    routes: Vec<Route<H>>,
}

impl<H> Default for Router<H> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<H> Router<H> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Earlier routes take precedence.
    pub fn route(mut self, method: Method, pattern: &str, handler: H) -> Result<Self, PatternError> {
        let pattern = PathPattern::parse(pattern)?;
        self.routes.push(Route {
            method,
            pattern,
            handler,
        });
        Ok(self)
    }

    /// Find the first route matching `method` and the path part of `raw_path`.
    pub fn match_request(&self, method: &Method, raw_path: &str) -> Result<RouteMatch<'_, H>, RoutingError> {
        let (path, query) = split_path(raw_path);

        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                route.pattern.matches(path).map(|params| RouteMatch {
                    handler: &route.handler,
                    pattern: &route.pattern,
                    params,
                    query: parse_query(query),
                })
            })
            .ok_or_else(|| RoutingError::NoRouteMatched {
                method: method.clone(),
                path: path.to_string(),
            })
    }
}

fn split_path(raw_path: &str) -> (&str, &str) {
    match raw_path.split_once('?') {
        Some((path, query)) => (path, query),
        None => (raw_path, ""),
    }
}

fn parse_query(query: &str) -> QueryParams {
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}
