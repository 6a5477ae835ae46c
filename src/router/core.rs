//! Router core types shared by the table, the matcher and reverse routing.

use http::{Method, StatusCode};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use super::pattern::CompiledPattern;
use crate::error::RouterError;
use crate::route::{HandlerRef, RouteTemplate};

/// Maximum number of path parameters before heap allocation.
/// Most routes have at most a handful of placeholders (e.g. `/users/{id}/posts/{postId}`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Stack-allocated parameter storage for the dispatch path.
///
/// Names are `Arc<str>` shared with the compiled route; values are per-request.
pub type ParamVec = SmallVec<[(Arc<str>, String); MAX_INLINE_PARAMS]>;

static NEXT_ROUTE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a registered route.
///
/// Ids are handed out in increasing order, so comparing two ids tells which
/// route was registered first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(u64);

impl RouteId {
    pub(crate) fn next() -> Self {
        Self(NEXT_ROUTE_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

impl Display for RouteId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "route-{}", self.0)
    }
}

/// Ordering value used to pick one winner among routes matching the same path.
///
/// More literal segments win; on a tie the earlier registration wins. The
/// derived order puts the winner first (`Ordering::Less`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PrecedenceKey {
    literal_segments: usize,
    registration: RouteId,
}

impl PrecedenceKey {
    #[must_use]
    pub fn literal_segments(&self) -> usize {
        self.literal_segments
    }
}

impl Ord for PrecedenceKey {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .literal_segments
            .cmp(&self.literal_segments)
            .then(self.registration.cmp(&other.registration))
    }
}

impl PartialOrd for PrecedenceKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A registered route: its template plus the compiled pattern.
///
/// Owned by the [`super::RouteTable`]; callers only ever see it behind an `Arc`
/// taken from a published snapshot, so it is never observed half-removed.
#[derive(Debug)]
pub struct CompiledRoute {
    id: RouteId,
    template: RouteTemplate,
    pattern: CompiledPattern,
}

impl CompiledRoute {
    pub(crate) fn compile(template: RouteTemplate) -> Result<Self, RouterError> {
        let pattern = CompiledPattern::compile(template.uri())?;
        Ok(Self {
            id: RouteId::next(),
            template,
            pattern,
        })
    }

    #[must_use]
    pub fn id(&self) -> RouteId {
        self.id
    }

    #[must_use]
    pub fn template(&self) -> &RouteTemplate {
        &self.template
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        self.template.method()
    }

    #[must_use]
    pub fn uri(&self) -> &str {
        self.template.uri()
    }

    #[must_use]
    pub fn handler(&self) -> &HandlerRef {
        self.template.handler()
    }

    #[must_use]
    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    #[must_use]
    pub fn precedence_key(&self) -> PrecedenceKey {
        PrecedenceKey {
            literal_segments: self.pattern.literal_segments(),
            registration: self.id,
        }
    }
}

impl Display for CompiledRoute {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.template, f)
    }
}

/// Result of successfully matching a request path to a route.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// The winning route
    pub route: Arc<CompiledRoute>,
    /// Placeholder values in declaration order, percent-decoded, never type-converted
    pub path_params: ParamVec,
}

impl RouteMatch {
    #[must_use]
    pub fn handler(&self) -> &HandlerRef {
        self.route.handler()
    }

    /// Get a path parameter by placeholder name.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Convert path_params to a HashMap.
    /// Note: This allocates - use get_path_param() in hot paths instead
    #[must_use]
    pub fn path_params_map(&self) -> HashMap<String, String> {
        self.path_params
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }
}

/// Outcome of dispatching a (method, path) pair.
///
/// Every variant except [`MatchResult::Matched`] is a routine non-match that the
/// HTTP engine must answer, not an error.
#[derive(Debug, Clone)]
pub enum MatchResult {
    /// A route was selected.
    Matched(RouteMatch),
    /// Some route matches the path, none with the requested method.
    MethodNotAllowed {
        /// Methods of the routes matching the path, in precedence order
        allowed: Vec<Method>,
    },
    /// No route pattern matches the path.
    NoMatchingPath,
    /// Content negotiation only: no route accepts the request content type.
    UnsupportedMediaType,
    /// Content negotiation only: no route produces a type the client accepts.
    NotAcceptable,
}

impl MatchResult {
    #[must_use]
    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched(_))
    }

    #[must_use]
    pub fn as_match(&self) -> Option<&RouteMatch> {
        match self {
            MatchResult::Matched(m) => Some(m),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_match(self) -> Option<RouteMatch> {
        match self {
            MatchResult::Matched(m) => Some(m),
            _ => None,
        }
    }

    /// The HTTP status the engine should answer with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            MatchResult::Matched(_) => StatusCode::OK,
            MatchResult::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            MatchResult::NoMatchingPath => StatusCode::NOT_FOUND,
            MatchResult::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            MatchResult::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
        }
    }
}

/// Request attributes used by content negotiation.
#[derive(Debug, Clone, Copy)]
pub struct RequestInfo<'a> {
    pub method: &'a Method,
    pub path: &'a str,
    /// Value of the `Content-Type` header, if any
    pub content_type: Option<&'a str>,
    /// Value of the `Accept` header, if any
    pub accept: Option<&'a str>,
}

impl<'a> RequestInfo<'a> {
    #[must_use]
    pub fn new(method: &'a Method, path: &'a str) -> Self {
        Self {
            method,
            path,
            content_type: None,
            accept: None,
        }
    }

    #[must_use]
    pub fn content_type(mut self, content_type: &'a str) -> Self {
        self.content_type = Some(content_type);
        self
    }

    #[must_use]
    pub fn accept(mut self, accept: &'a str) -> Self {
        self.accept = Some(accept);
        self
    }
}
