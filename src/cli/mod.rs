//! # CLI Module
//!
//! The `routekit` command line tool: inspect a route manifest, try a request
//! against it, or build a URI for a handler.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! List the routes declared in a manifest, in registration order or, with
//! `--sorted`, in path order:
//!
//! ```bash
//! routekit routes --manifest routes.yaml --sorted
//! ```
//!
//! ### `match`
//!
//! Resolve a request and print the selected handler and its parameters. Exits
//! with status 1 when the request does not match.
//!
//! ```bash
//! routekit match --manifest routes.yaml GET /pets/42
//! routekit match --manifest routes.yaml POST /pets --content-type application/json
//! ```
//!
//! ### `reverse`
//!
//! Build the URI of a handler from `name=value` parameters:
//!
//! ```bash
//! routekit reverse --manifest routes.yaml Pets show id=42 format=full
//! ```
//!
//! `--json` switches any command's output to JSON.

mod commands;


pub use commands::{parse_param, run, run_cli, Cli, Commands};
