//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming (method, raw path)
//!     → router.rs (split path/query, filter by method)
//!     → matcher.rs (evaluate compiled path patterns in order)
//!     → Return: RouteMatch { handler, params, query } or NoRouteMatched
//!
//! Route Compilation (at startup):
//!     (method, "/tasks/:id", handler)[]
//!     → PathPattern::parse (literal + named parameter segments)
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex: patterns compile to a segment list compared one by one
//! - Full match only, never prefix
//! - First match wins (declaration order)

pub mod matcher;
pub mod router;

pub use matcher::{PathParams, PathPattern, PatternError};
pub use router::{QueryParams, Route, RouteMatch, Router, RoutingError};
