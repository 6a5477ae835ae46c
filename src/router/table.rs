//! Route table: copy-on-write snapshots of the registered routes.
//!
//! Writers (controllers activating or deactivating, hot reload) serialise on a
//! mutex, build a brand new [`RouteSnapshot`] and publish it with a single
//! `ArcSwap::store`. Readers (dispatch, reverse routing, listings) load the
//! current snapshot without locking and keep using it for the whole operation,
//! so they never observe a route that is half added or half removed.

use arc_swap::ArcSwap;
use http::Method;
use parking_lot::Mutex;
use regex::RegexSet;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::compare::compare_routes;
use super::core::{CompiledRoute, MatchResult, RequestInfo};
use crate::error::RouterError;
use crate::route::{disjoint, HandlerRef, RouteTemplate};
use crate::runtime_config::RouterConfig;

/// Immutable view of the table at one point in time.
#[derive(Debug, Default)]
pub struct RouteSnapshot {
    /// Registration order
    pub(super) routes: Vec<Arc<CompiledRoute>>,
    /// Precedence order (winner first)
    pub(super) by_precedence: Vec<Arc<CompiledRoute>>,
    /// One regex per entry of `by_precedence`; `None` when the set is too large to build
    pub(super) set: Option<RegexSet>,
    /// Reverse-routing index, each list in registration order
    pub(super) by_handler: HashMap<HandlerRef, Vec<Arc<CompiledRoute>>>,
}

impl RouteSnapshot {
    fn new(routes: Vec<Arc<CompiledRoute>>) -> Self {
        let mut by_precedence = routes.clone();
        by_precedence.sort_by_key(|r| r.precedence_key());

        let set = if by_precedence.is_empty() {
            None
        } else {
            match RegexSet::new(by_precedence.iter().map(|r| r.pattern().regex().as_str())) {
                Ok(set) => Some(set),
                Err(e) => {
                    warn!(
                        routes_count = by_precedence.len(),
                        error = %e,
                        "Route regex set could not be built, falling back to linear matching"
                    );
                    None
                }
            }
        };

        let mut by_handler: HashMap<HandlerRef, Vec<Arc<CompiledRoute>>> = HashMap::new();
        for route in &routes {
            by_handler
                .entry(route.handler().clone())
                .or_default()
                .push(Arc::clone(route));
        }

        Self {
            routes,
            by_precedence,
            set,
            by_handler,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Arc<CompiledRoute>] {
        &self.routes
    }

    /// Routes in match precedence order.
    #[must_use]
    pub fn routes_by_precedence(&self) -> &[Arc<CompiledRoute>] {
        &self.by_precedence
    }

    /// Routes registered for `handler`, in registration order.
    #[must_use]
    pub fn routes_for(&self, handler: &HandlerRef) -> &[Arc<CompiledRoute>] {
        self.by_handler.get(handler).map_or(&[], Vec::as_slice)
    }
}

/// The set of all registered routes.
///
/// Share it behind an `Arc` between the registration side and the HTTP engine;
/// every method takes `&self`.
pub struct RouteTable {
    current: ArcSwap<RouteSnapshot>,
    writer: Mutex<()>,
    config: RouterConfig,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.len())
            .field("config", &self.config)
            .finish()
    }
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(RouterConfig::default())
    }

    #[must_use]
    pub fn with_config(config: RouterConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(RouteSnapshot::default()),
            writer: Mutex::new(()),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// The currently published snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Arc<RouteSnapshot> {
        self.current.load_full()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.current.load().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.current.load().is_empty()
    }

    /// Compile and insert one route.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidRouteTemplate`] if the URI does not compile,
    /// [`RouterError::DuplicateRoute`] if the same method and raw URI are already
    /// registered with overlapping media types. The table is unchanged on error.
    pub fn register(&self, template: RouteTemplate) -> Result<Arc<CompiledRoute>, RouterError> {
        let route = Arc::new(compile_logged(template)?);

        let _guard = self.writer.lock();
        let current = self.current.load_full();
        ensure_no_conflict(&current.routes, &route)?;

        let mut routes = current.routes.clone();
        routes.push(Arc::clone(&route));
        self.publish(routes);

        info!(
            route_id = %route.id(),
            method = %route.method(),
            uri = %route.uri(),
            handler = %route.handler(),
            "Route registered"
        );
        Ok(route)
    }

    /// Register a batch of routes atomically: either all of them or none.
    ///
    /// This is the controller activation path: a controller declaring one bad
    /// or conflicting route gets none of its routes registered.
    ///
    /// # Errors
    ///
    /// The first compile or conflict error; the table is unchanged.
    pub fn register_all<I>(&self, templates: I) -> Result<Vec<Arc<CompiledRoute>>, RouterError>
    where
        I: IntoIterator<Item = RouteTemplate>,
    {
        let added = compile_all(templates)?;

        let _guard = self.writer.lock();
        let current = self.current.load_full();
        let mut routes = current.routes.clone();
        for route in &added {
            ensure_no_conflict(&routes, route)?;
            routes.push(Arc::clone(route));
        }
        self.publish(routes);

        info!(routes_count = added.len(), "Routes registered");
        Ok(added)
    }

    /// Atomically replace every route of `controller` with `templates`.
    ///
    /// Used by hot reload. On error the previous routes stay active.
    ///
    /// # Errors
    ///
    /// The first compile or conflict error; the table is unchanged.
    pub fn replace_controller<I>(
        &self,
        controller: &str,
        templates: I,
    ) -> Result<Vec<Arc<CompiledRoute>>, RouterError>
    where
        I: IntoIterator<Item = RouteTemplate>,
    {
        let added = compile_all(templates)?;

        let _guard = self.writer.lock();
        let current = self.current.load_full();
        let mut routes: Vec<Arc<CompiledRoute>> = current
            .routes
            .iter()
            .filter(|r| r.handler().controller() != controller)
            .cloned()
            .collect();
        let removed = current.routes.len() - routes.len();
        for route in &added {
            ensure_no_conflict(&routes, route)?;
            routes.push(Arc::clone(route));
        }
        self.publish(routes);

        info!(
            controller = %controller,
            removed,
            added = added.len(),
            "Controller routes replaced"
        );
        Ok(added)
    }

    /// Remove a route by identity. Returns `false` if it was already absent.
    pub fn unregister(&self, route: &CompiledRoute) -> bool {
        let _guard = self.writer.lock();
        let current = self.current.load_full();
        if !current.routes.iter().any(|r| r.id() == route.id()) {
            debug!(route_id = %route.id(), "Route already unregistered");
            return false;
        }
        let routes = current
            .routes
            .iter()
            .filter(|r| r.id() != route.id())
            .cloned()
            .collect();
        self.publish(routes);

        info!(
            route_id = %route.id(),
            method = %route.method(),
            uri = %route.uri(),
            "Route unregistered"
        );
        true
    }

    /// Remove every route served by `controller`; returns how many were removed.
    pub fn unregister_controller(&self, controller: &str) -> usize {
        let _guard = self.writer.lock();
        let current = self.current.load_full();
        let routes: Vec<_> = current
            .routes
            .iter()
            .filter(|r| r.handler().controller() != controller)
            .cloned()
            .collect();
        let removed = current.routes.len() - routes.len();
        if removed > 0 {
            self.publish(routes);
        }
        info!(controller = %controller, removed, "Controller routes unregistered");
        removed
    }

    /// Remove all routes.
    pub fn clear(&self) {
        let _guard = self.writer.lock();
        self.current.store(Arc::new(RouteSnapshot::default()));
        info!("Routing table cleared");
    }

    /// Snapshot of all routes in registration order.
    #[must_use]
    pub fn all_routes(&self) -> Vec<Arc<CompiledRoute>> {
        self.current.load().routes.clone()
    }

    /// Snapshot of all routes in path-comparator order, for listings and
    /// documentation pages.
    #[must_use]
    pub fn sorted_routes(&self) -> Vec<Arc<CompiledRoute>> {
        let mut routes = self.all_routes();
        routes.sort_by(|a, b| compare_routes(a, b));
        routes
    }

    /// Resolve `(method, path)` against the current snapshot.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidArgument`] for an empty or relative path.
    pub fn match_route(&self, method: &Method, path: &str) -> Result<MatchResult, RouterError> {
        debug!(method = %method, path = %path, "Route match attempt");
        let start = std::time::Instant::now();
        let result = self.current.load().match_route(method, path)?;
        self.log_outcome(method, path, &result, start.elapsed());
        Ok(result)
    }

    /// Like [`RouteTable::match_route`] with the method given as text.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidArgument`] for an empty or malformed method or an
    /// empty or relative path.
    pub fn match_str(&self, method: &str, path: &str) -> Result<MatchResult, RouterError> {
        let method = super::matcher::parse_method(method)?;
        self.match_route(&method, path)
    }

    /// Resolve a request including content negotiation.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidArgument`] for an empty or relative path.
    pub fn match_request(&self, request: &RequestInfo<'_>) -> Result<MatchResult, RouterError> {
        debug!(
            method = %request.method,
            path = %request.path,
            content_type = ?request.content_type,
            accept = ?request.accept,
            "Route match attempt"
        );
        let start = std::time::Instant::now();
        let result = self.current.load().match_request(request)?;
        self.log_outcome(request.method, request.path, &result, start.elapsed());
        Ok(result)
    }

    /// Build a URI for `handler` from named parameters.
    ///
    /// # Errors
    ///
    /// [`RouterError::NoSuchRoute`] or [`RouterError::MissingParameter`].
    pub fn reverse_route_for<I, K, V>(
        &self,
        handler: &HandlerRef,
        params: I,
    ) -> Result<String, RouterError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: std::fmt::Display,
    {
        self.current.load().reverse_route_for(handler, params)
    }

    fn publish(&self, routes: Vec<Arc<CompiledRoute>>) {
        let snapshot = RouteSnapshot::new(routes);
        debug!(routes_count = snapshot.len(), "Publishing routing table snapshot");
        self.current.store(Arc::new(snapshot));
    }

    fn log_outcome(
        &self,
        method: &Method,
        path: &str,
        result: &MatchResult,
        elapsed: std::time::Duration,
    ) {
        let duration_us = elapsed.as_micros();
        match result {
            MatchResult::Matched(m) => {
                if elapsed > self.config.slow_match_threshold {
                    warn!(
                        method = %method,
                        path = %path,
                        handler = %m.handler(),
                        route_pattern = %m.route.uri(),
                        duration_us,
                        "Slow route matching detected"
                    );
                } else if self.config.log_matches {
                    info!(
                        method = %method,
                        path = %path,
                        handler = %m.handler(),
                        route_pattern = %m.route.uri(),
                        path_params = ?m.path_params,
                        duration_us,
                        "Route matched"
                    );
                } else {
                    debug!(
                        method = %method,
                        path = %path,
                        handler = %m.handler(),
                        route_pattern = %m.route.uri(),
                        duration_us,
                        "Route matched"
                    );
                }
            }
            other => {
                debug!(
                    method = %method,
                    path = %path,
                    status = other.status().as_u16(),
                    duration_us,
                    "No route matched"
                );
            }
        }
    }
}

fn compile_logged(template: RouteTemplate) -> Result<CompiledRoute, RouterError> {
    CompiledRoute::compile(template).inspect_err(|e| {
        warn!(error = %e, "Route rejected");
    })
}

fn compile_all<I>(templates: I) -> Result<Vec<Arc<CompiledRoute>>, RouterError>
where
    I: IntoIterator<Item = RouteTemplate>,
{
    templates
        .into_iter()
        .map(|t| compile_logged(t).map(Arc::new))
        .collect()
}

/// Same method and raw URI conflict unless the accepted or produced media types
/// are both declared and disjoint.
fn ensure_no_conflict(
    existing: &[Arc<CompiledRoute>],
    candidate: &CompiledRoute,
) -> Result<(), RouterError> {
    let clash = existing.iter().find(|r| {
        r.method() == candidate.method()
            && r.uri() == candidate.uri()
            && !disjoint(r.template().accepts(), candidate.template().accepts())
            && !disjoint(r.template().produces(), candidate.template().produces())
    });
    match clash {
        Some(r) => {
            warn!(
                method = %candidate.method(),
                uri = %candidate.uri(),
                existing = %r.handler(),
                rejected = %candidate.handler(),
                "Duplicate route rejected"
            );
            Err(RouterError::DuplicateRoute {
                method: candidate.method().to_string(),
                uri: candidate.uri().to_string(),
                existing: r.handler().to_string(),
            })
        }
        None => Ok(()),
    }
}
