//! # Route Module
//!
//! The declared side of routing: what collaborators hand to the router.
//!
//! - [`RouteTemplate`] - method, raw URI template, media-type constraints and the
//!   [`HandlerRef`] that serves it
//! - [`RouteBuilder`] - fluent construction of templates
//! - [`MediaType`] - `type/subtype` values used for `accepts`/`produces` and for
//!   content negotiation
//!
//! Templates are plain values. Discovery (annotations, code generation, manifest
//! files) happens outside the router and ends in a call to
//! [`crate::router::RouteTable::register`].

mod media;
mod template;

pub use media::MediaType;
pub(crate) use media::disjoint;
pub use template::{with_prefix, HandlerRef, RouteBuilder, RouteTemplate};
