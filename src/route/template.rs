use http::Method;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

use super::media::MediaType;
use crate::error::RouterError;

/// Opaque reference to the code that handles a route: a controller identity
/// plus the name of one of its actions.
///
/// The router never interprets either part; it only compares them.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerRef {
    controller: Arc<str>,
    action: Arc<str>,
}

impl HandlerRef {
    #[must_use]
    pub fn new(controller: impl AsRef<str>, action: impl AsRef<str>) -> Self {
        Self {
            controller: Arc::from(controller.as_ref()),
            action: Arc::from(action.as_ref()),
        }
    }

    #[must_use]
    pub fn controller(&self) -> &str {
        &self.controller
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }
}

impl Display for HandlerRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}#{}", self.controller, self.action)
    }
}

/// The declared, uncompiled form of a route.
///
/// Built with [`RouteBuilder`] by whoever owns the handler (a controller or a
/// resource publisher) and handed to [`crate::router::RouteTable::register`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteTemplate {
    method: Method,
    uri: String,
    accepts: Vec<MediaType>,
    produces: Vec<MediaType>,
    handler: HandlerRef,
}

impl RouteTemplate {
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// The raw URI template, placeholders included.
    #[must_use]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Request content types this route consumes; empty means any.
    #[must_use]
    pub fn accepts(&self) -> &[MediaType] {
        &self.accepts
    }

    /// Response content types this route produces; empty means unspecified.
    #[must_use]
    pub fn produces(&self) -> &[MediaType] {
        &self.produces
    }

    #[must_use]
    pub fn handler(&self) -> &HandlerRef {
        &self.handler
    }
}

impl Display for RouteTemplate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} => {}", self.method, self.uri, self.handler)?;
        if !self.accepts.is_empty() {
            write!(f, " - accepting: {}", join(&self.accepts))?;
        }
        if !self.produces.is_empty() {
            write!(f, " - producing: {}", join(&self.produces))?;
        }
        Ok(())
    }
}

fn join(types: &[MediaType]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fluent builder for [`RouteTemplate`].
///
/// ```
/// use http::Method;
/// use routekit::route::RouteBuilder;
///
/// let route = RouteBuilder::route(Method::GET)
///     .on("/users/{id}")
///     .producing("application/json")
///     .to("UserController", "show")
///     .unwrap();
/// assert_eq!(route.uri(), "/users/{id}");
/// ```
#[derive(Debug, Clone)]
pub struct RouteBuilder {
    method: Method,
    uri: String,
    accepts: Vec<String>,
    produces: Vec<String>,
}

impl RouteBuilder {
    #[must_use]
    pub fn route(method: Method) -> Self {
        Self {
            method,
            uri: String::new(),
            accepts: Vec::new(),
            produces: Vec::new(),
        }
    }

    /// Sets the URI template. A missing leading `/` is added.
    #[must_use]
    pub fn on(mut self, uri: impl AsRef<str>) -> Self {
        let uri = uri.as_ref();
        self.uri = if uri.starts_with('/') {
            uri.to_string()
        } else {
            format!("/{uri}")
        };
        self
    }

    #[must_use]
    pub fn accepting(mut self, media_type: impl Into<String>) -> Self {
        self.accepts.push(media_type.into());
        self
    }

    #[must_use]
    pub fn producing(mut self, media_type: impl Into<String>) -> Self {
        self.produces.push(media_type.into());
        self
    }

    /// Finish the template, targeting `controller#action`.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidRouteTemplate`] when no URI was set, a media type does
    /// not parse, or a produced media type contains a wildcard.
    pub fn to(
        self,
        controller: impl AsRef<str>,
        action: impl AsRef<str>,
    ) -> Result<RouteTemplate, RouterError> {
        if self.uri.is_empty() {
            return Err(RouterError::invalid_template("", "route has no URI"));
        }
        let accepts = parse_types(&self.uri, &self.accepts)?;
        let produces = parse_types(&self.uri, &self.produces)?;
        if let Some(wild) = produces.iter().find(|t| t.has_wildcard()) {
            return Err(RouterError::invalid_template(
                &self.uri,
                format!("a route cannot produce a wildcard media type: {wild}"),
            ));
        }
        Ok(RouteTemplate {
            method: self.method,
            uri: self.uri,
            accepts,
            produces,
            handler: HandlerRef::new(controller, action),
        })
    }
}

fn parse_types(uri: &str, raw: &[String]) -> Result<Vec<MediaType>, RouterError> {
    let mut types: Vec<MediaType> = Vec::with_capacity(raw.len());
    for s in raw {
        let parsed = s
            .parse::<MediaType>()
            .map_err(|e| RouterError::invalid_template(uri, e.to_string()))?;
        if !types.contains(&parsed) {
            types.push(parsed);
        }
    }
    Ok(types)
}

/// Join a controller-level path prefix and a route URI with exactly one `/`.
///
/// `with_prefix("/api", "users")` and `with_prefix("/api/", "/users")` both yield
/// `/api/users`. An empty prefix leaves the URI untouched.
#[must_use]
pub fn with_prefix(prefix: &str, uri: &str) -> String {
    if prefix.is_empty() {
        return uri.to_string();
    }
    match (prefix.ends_with('/'), uri.starts_with('/')) {
        (true, true) => format!("{}{}", prefix, &uri[1..]),
        (false, false) => format!("{prefix}/{uri}"),
        _ => format!("{prefix}{uri}"),
    }
}
