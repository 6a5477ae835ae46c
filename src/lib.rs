//! # routekit
//!
//! **routekit** is a URI router: it compiles declared route templates into a
//! matchable table, resolves incoming `(method, path)` pairs to exactly one
//! handler with the extracted placeholder values, and builds URIs back from a
//! handler and parameters.
//!
//! ## Overview
//!
//! - **[`route`]** - the declared side: [`route::RouteTemplate`], [`route::RouteBuilder`],
//!   [`route::HandlerRef`], [`route::MediaType`]
//! - **[`router`]** - the pattern compiler, the copy-on-write [`router::RouteTable`],
//!   the matcher and reverse routing
//! - **[`manifest`]** - loading route templates from YAML, JSON or TOML files
//! - **[`hot_reload`]** - swapping a controller's routes when its manifest changes
//! - **[`runtime_config`]** - environment driven router settings
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - the `routekit` command line tool
//!
//! ### Request Handling Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Ctrl as Controller
//!     participant Table as RouteTable
//!     participant Engine as HTTP engine
//!     participant View as Template / link builder
//!
//!     Ctrl->>Table: register_all(templates)
//!     Table->>Table: compile, check conflicts,<br/>publish snapshot
//!     Engine->>Table: match_route(GET, "/pets/42")
//!     Table-->>Engine: Matched(route, {id: "42"})
//!     Engine->>Table: match_route(POST, "/pets/42")
//!     Table-->>Engine: MethodNotAllowed [GET]
//!     View->>Table: reverse_route_for(Pets#show, {id: 7})
//!     Table-->>View: "/pets/7"
//!     Ctrl->>Table: unregister_controller("Pets")
//! ```
//!
//! ## Template Syntax
//!
//! | Form             | Meaning                                          |
//! |------------------|--------------------------------------------------|
//! | `/users`         | literal, case-sensitive                          |
//! | `/users/{id}`    | one path segment (no `/`)                        |
//! | `/n/{id<[0-9]+>}`| segment constrained by a regex                   |
//! | `/files/{path*}` | rest of the path including `/`, last segment only|
//!
//! A trailing slash is part of the route: `/foo` and `/foo/` are different routes.
//!
//! ## Quick Start
//!
//! ```rust
//! use http::Method;
//! use routekit::{MatchResult, RouteBuilder, RouteTable};
//!
//! let table = RouteTable::new();
//! table.register(RouteBuilder::route(Method::GET).on("/foo/bar").to("Foo", "bar")?)?;
//! table.register(RouteBuilder::route(Method::GET).on("/foo/{id}").to("Foo", "show")?)?;
//!
//! let m = table.match_route(&Method::GET, "/foo/bar")?.into_match().unwrap();
//! assert_eq!(m.handler().action(), "bar");
//!
//! assert!(matches!(
//!     table.match_route(&Method::POST, "/foo/bar")?,
//!     MatchResult::MethodNotAllowed { .. }
//! ));
//! # Ok::<(), routekit::RouterError>(())
//! ```

pub mod cli;
pub mod error;
pub mod hot_reload;
pub mod logging;
pub mod manifest;
pub mod route;
pub mod router;
pub mod runtime_config;

pub use error::RouterError;
pub use manifest::{load_manifest, parse_manifest, ManifestFormat};
pub use route::{HandlerRef, MediaType, RouteBuilder, RouteTemplate};
pub use router::{CompiledRoute, MatchResult, RequestInfo, RouteMatch, RouteTable};
pub use runtime_config::RouterConfig;
