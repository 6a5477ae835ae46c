//! Reverse routing: build a URI from a handler and named parameters.
//!
//! Placeholder values are percent-encoded. Single-segment placeholders encode
//! `/` too; greedy placeholders keep it as a separator. Parameters that do not
//! name a placeholder become the query string, in the order given.

use std::fmt::Display;
use std::sync::Arc;

use super::core::CompiledRoute;
use super::pattern::Segment;
use super::table::RouteSnapshot;
use crate::error::RouterError;
use crate::route::HandlerRef;

impl RouteSnapshot {
    /// Build a URI for `handler`.
    ///
    /// When the handler has several routes, the first one (registration order)
    /// whose placeholders are all supplied is used.
    ///
    /// # Errors
    ///
    /// [`RouterError::NoSuchRoute`] if no route is registered for `handler`,
    /// [`RouterError::MissingParameter`] if no route can be filled from `params`
    /// (reported against the handler's first route).
    pub fn reverse_route_for<I, K, V>(
        &self,
        handler: &HandlerRef,
        params: I,
    ) -> Result<String, RouterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Display,
    {
        let params: Vec<(String, String)> = params
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.to_string()))
            .collect();

        let routes = self.routes_for(handler);
        let first = routes.first().ok_or_else(|| RouterError::NoSuchRoute {
            handler: handler.to_string(),
        })?;

        match routes.iter().find(|r| missing_placeholder(r, &params).is_none()) {
            Some(route) => Ok(expand(route, &params)),
            None => Err(RouterError::MissingParameter {
                handler: handler.to_string(),
                parameter: missing_placeholder(first, &params)
                    .unwrap_or_default()
                    .to_string(),
            }),
        }
    }
}

fn lookup<'p>(params: &'p [(String, String)], name: &str) -> Option<&'p str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn missing_placeholder<'r>(route: &'r CompiledRoute, params: &[(String, String)]) -> Option<&'r str> {
    route
        .pattern()
        .placeholder_names()
        .find(|name| lookup(params, name).is_none())
}

fn expand(route: &Arc<CompiledRoute>, params: &[(String, String)]) -> String {
    let pattern = route.pattern();
    let mut uri = String::with_capacity(route.uri().len() + 16);

    for segment in pattern.segments() {
        uri.push('/');
        match segment {
            Segment::Literal(text) => uri.push_str(text),
            Segment::Placeholder(idx) => {
                let spec = &pattern.placeholders()[*idx];
                let value = lookup(params, spec.name()).unwrap_or_default();
                if spec.is_greedy() {
                    let encoded: Vec<_> = value.split('/').map(urlencoding::encode).collect();
                    uri.push_str(&encoded.join("/"));
                } else {
                    uri.push_str(&urlencoding::encode(value));
                }
            }
        }
    }

    let query: Vec<String> = params
        .iter()
        .filter(|(k, _)| !pattern.placeholder_names().any(|name| name == k.as_str()))
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect();
    if !query.is_empty() {
        uri.push('?');
        uri.push_str(&query.join("&"));
    }
    uri
}
