//! Error types surfaced by route registration, reverse routing and dispatch.
//!
//! Dispatch non-matches (`NoMatchingPath`, `MethodNotAllowed`, ...) are **not**
//! errors: they are variants of [`crate::router::MatchResult`]. The variants here
//! are either developer-facing registration feedback or caller misuse.

use thiserror::Error;

/// Errors returned by the router core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
    /// The URI template could not be compiled.
    ///
    /// Raised for malformed placeholder syntax, duplicate placeholder names,
    /// a greedy placeholder that is not the last segment, or an embedded
    /// constraint regex that does not compile.
    #[error("invalid route template '{template}': {reason}")]
    InvalidRouteTemplate {
        /// The raw template as declared
        template: String,
        /// Human readable cause
        reason: String,
    },

    /// A route with the same method and raw URI (and overlapping media types)
    /// is already registered. The existing route is kept.
    #[error("{method} {uri} is already registered by {existing}")]
    DuplicateRoute {
        /// HTTP method of the rejected route
        method: String,
        /// Raw URI of the rejected route
        uri: String,
        /// Handler owning the existing route
        existing: String,
    },

    /// No route is registered for the handler passed to reverse routing.
    #[error("no route registered for handler {handler}")]
    NoSuchRoute {
        /// `controller#action` of the requested handler
        handler: String,
    },

    /// Reverse routing was asked to build a URI without a value for a placeholder.
    #[error("missing value for placeholder '{parameter}' of handler {handler}")]
    MissingParameter {
        /// `controller#action` of the requested handler
        handler: String,
        /// Name of the placeholder without a value
        parameter: String,
    },

    /// Structurally invalid input (programming error on the caller side).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl RouterError {
    pub(crate) fn invalid_template(template: &str, reason: impl Into<String>) -> Self {
        RouterError::InvalidRouteTemplate {
            template: template.to_string(),
            reason: reason.into(),
        }
    }
}
