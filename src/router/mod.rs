//! # Router Module
//!
//! Path matching, route resolution and reverse routing.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling URI templates (`/users/{id}`, `/files/{path*}`,
//!   `/items/{id<[0-9]+>}`) into anchored regex patterns
//! - Holding the registered routes in a [`RouteTable`] that can be changed while
//!   requests are being dispatched
//! - Matching incoming requests to exactly one route and extracting the
//!   placeholder values
//! - Building URIs back from a handler and parameters (reverse routing)
//!
//! ## Architecture
//!
//! 1. **Compilation**: at registration each template is compiled once by
//!    [`CompiledPattern::compile`]. Literal segments are escaped, placeholders
//!    become capture groups.
//!
//! 2. **Publication**: every change produces a new immutable [`RouteSnapshot`]
//!    (routes sorted by [`PrecedenceKey`], a `RegexSet` over them, and a
//!    handler index) that is swapped in atomically.
//!
//! 3. **Matching**: a request is tested against the snapshot's `RegexSet`; the
//!    first match in precedence order whose method agrees wins.
//!
//! ## Example
//!
//! ```rust
//! use http::Method;
//! use routekit::route::{HandlerRef, RouteBuilder};
//! use routekit::router::{MatchResult, RouteTable};
//!
//! let table = RouteTable::new();
//! table.register(RouteBuilder::route(Method::GET).on("/pets/{id}").to("Pets", "show")?)?;
//!
//! match table.match_route(&Method::GET, "/pets/42")? {
//!     MatchResult::Matched(m) => assert_eq!(m.get_path_param("id"), Some("42")),
//!     other => panic!("unexpected {other:?}"),
//! }
//!
//! let uri = table.reverse_route_for(&HandlerRef::new("Pets", "show"), [("id", 7)])?;
//! assert_eq!(uri, "/pets/7");
//! # Ok::<(), routekit::RouterError>(())
//! ```

mod compare;
mod core;
mod matcher;
mod pattern;
mod reverse;
mod table;

pub use compare::{compare_paths, compare_patterns, compare_routes};
pub(crate) use matcher::parse_method;
pub use self::core::{
    CompiledRoute, MatchResult, ParamVec, PrecedenceKey, RequestInfo, RouteId, RouteMatch,
    MAX_INLINE_PARAMS,
};
pub use pattern::{CompiledPattern, PlaceholderSpec, Segment};
pub use table::{RouteSnapshot, RouteTable};
