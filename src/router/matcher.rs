//! Matcher: resolve a (method, path) pair against one snapshot.
//!
//! All patterns are tested in precedence order (more literal segments first,
//! then registration order). The first route whose pattern and method both
//! match wins. If patterns match but no method does the outcome is
//! `MethodNotAllowed`; if nothing matches the path it is `NoMatchingPath`.

use http::Method;
use std::sync::Arc;

use super::core::{CompiledRoute, MatchResult, RequestInfo, RouteMatch};
use super::table::RouteSnapshot;
use crate::error::RouterError;
use crate::route::MediaType;

pub(crate) fn parse_method(method: &str) -> Result<Method, RouterError> {
    if method.trim().is_empty() {
        return Err(RouterError::InvalidArgument("empty HTTP method".to_string()));
    }
    Method::from_bytes(method.as_bytes())
        .map_err(|_| RouterError::InvalidArgument(format!("invalid HTTP method '{method}'")))
}

fn validate_path(path: &str) -> Result<(), RouterError> {
    if path.is_empty() {
        return Err(RouterError::InvalidArgument("empty request path".to_string()));
    }
    if !path.starts_with('/') {
        return Err(RouterError::InvalidArgument(format!(
            "request path '{path}' must start with '/'"
        )));
    }
    Ok(())
}

/// How well a route's `accepts` list covers the request content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Acceptance {
    Exact,
    Wildcard,
    Rejected,
}

fn acceptance(route: &CompiledRoute, content_type: Option<&MediaType>) -> Acceptance {
    let accepts = route.template().accepts();
    let Some(content_type) = content_type else {
        return Acceptance::Exact;
    };
    if accepts.is_empty() {
        return Acceptance::Exact;
    }
    let mut best = Acceptance::Rejected;
    for declared in accepts.iter().filter(|d| d.includes(content_type)) {
        if !declared.has_wildcard() {
            return Acceptance::Exact;
        }
        best = Acceptance::Wildcard;
    }
    best
}

fn produces_acceptable(route: &CompiledRoute, accept: &[MediaType]) -> bool {
    let produces = route.template().produces();
    produces.is_empty()
        || accept.is_empty()
        || produces
            .iter()
            .any(|p| accept.iter().any(|wanted| wanted.includes(p)))
}

impl RouteSnapshot {
    /// Routes whose pattern matches `path`, in precedence order.
    fn candidates<'s>(&'s self, path: &'s str) -> Box<dyn Iterator<Item = &'s Arc<CompiledRoute>> + 's> {
        match &self.set {
            Some(set) => Box::new(
                set.matches(path)
                    .into_iter()
                    .map(move |idx| &self.by_precedence[idx]),
            ),
            None => Box::new(
                self.by_precedence
                    .iter()
                    .filter(move |r| r.pattern().is_match(path)),
            ),
        }
    }

    /// Resolve `(method, path)`.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidArgument`] for an empty or relative path.
    pub fn match_route(&self, method: &Method, path: &str) -> Result<MatchResult, RouterError> {
        validate_path(path)?;

        let mut allowed: Vec<Method> = Vec::new();
        for route in self.candidates(path) {
            if route.method() == method {
                return Ok(bind(route, path));
            }
            if !allowed.contains(route.method()) {
                allowed.push(route.method().clone());
            }
        }

        if allowed.is_empty() {
            Ok(MatchResult::NoMatchingPath)
        } else {
            Ok(MatchResult::MethodNotAllowed { allowed })
        }
    }

    /// Resolve a request, using `Content-Type` against each route's `accepts`
    /// and `Accept` against its `produces`.
    ///
    /// Routes accepting the content type exactly are preferred over routes
    /// accepting it through a wildcard; within each group precedence order holds.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidArgument`] for an empty or relative path.
    pub fn match_request(&self, request: &RequestInfo<'_>) -> Result<MatchResult, RouterError> {
        validate_path(request.path)?;

        let mut allowed: Vec<Method> = Vec::new();
        let mut same_method: Vec<&Arc<CompiledRoute>> = Vec::new();
        for route in self.candidates(request.path) {
            if route.method() == request.method {
                same_method.push(route);
            } else if !allowed.contains(route.method()) {
                allowed.push(route.method().clone());
            }
        }

        if same_method.is_empty() {
            return Ok(if allowed.is_empty() {
                MatchResult::NoMatchingPath
            } else {
                MatchResult::MethodNotAllowed { allowed }
            });
        }

        // An unparseable Content-Type is treated like an absent one.
        let content_type = request
            .content_type
            .and_then(|ct| ct.parse::<MediaType>().ok());
        let mut accepting: Vec<(Acceptance, &Arc<CompiledRoute>)> = same_method
            .into_iter()
            .map(|r| (acceptance(r, content_type.as_ref()), r))
            .filter(|(a, _)| *a != Acceptance::Rejected)
            .collect();
        if accepting.is_empty() {
            return Ok(MatchResult::UnsupportedMediaType);
        }
        accepting.sort_by_key(|(a, _)| *a);

        let accept = request.accept.map(MediaType::parse_list).unwrap_or_default();
        match accepting
            .into_iter()
            .find(|(_, r)| produces_acceptable(r, &accept))
        {
            Some((_, route)) => Ok(bind(route, request.path)),
            None => Ok(MatchResult::NotAcceptable),
        }
    }
}

fn bind(route: &Arc<CompiledRoute>, path: &str) -> MatchResult {
    let path_params = route.pattern().extract(path).unwrap_or_default();
    MatchResult::Matched(RouteMatch {
        route: Arc::clone(route),
        path_params,
    })
}
