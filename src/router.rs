//! Radix-tree request router.
//!
//! One tree per HTTP method, O(path-length) lookup. Middleware registered
//! with [`Router::with`] wraps the whole dispatch, including the not-found
//! and method-not-allowed outcomes; middleware passed to [`Router::on_with`]
//! wraps a single route.

use std::collections::HashMap;

use bytes::Bytes;
use http::{Method, StatusCode};
use matchit::Router as MatchitRouter;

use crate::context::Context;
use crate::error::Error;
use crate::handler::{Handler, Next};
use crate::middleware::{Middleware, compose};
use crate::response::{IntoResponse, Response};

/// The application router.
///
/// Build it once at startup and pass it to [`Server::serve`](crate::Server::serve).
/// Every builder method returns `self` so registrations chain naturally.
///
/// ```rust,no_run
/// # use weave::{Context, Error, Router, middleware};
/// # async fn get_user(_: Context) -> Result<&'static str, Error> { Ok("") }
/// # async fn create_user(_: Context) -> Result<&'static str, Error> { Ok("") }
/// # fn auth() -> middleware::Middleware { middleware::Middleware::identity() }
/// Router::new()
///     .with(middleware::trace())
///     .get("/users/{id}", get_user)
///     .on_with(http::Method::POST, "/users", create_user, auth());
/// ```
pub struct Router {
    routes: HashMap<Method, MatchitRouter<Next>>,
    layers: Vec<Middleware>,
    stack: Middleware,
}

impl Router {
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            layers: Vec::new(),
            stack: Middleware::identity(),
        }
    }

    /// Registers router-wide middleware. Earlier calls wrap later ones.
    pub fn with(mut self, middleware: Middleware) -> Self {
        self.layers.push(middleware);
        self.stack = compose(self.layers.iter().cloned());
        self
    }

    /// Registers a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `ctx.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid route pattern or is already registered
    /// for `method`.
    pub fn on(self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.add(method, path, Next::new(handler))
    }

    /// Like [`on`](Router::on), with `middleware` wrapping only this route.
    ///
    /// Pass a [`compose`]d middleware to attach several.
    pub fn on_with(
        self,
        method: Method,
        path: &str,
        handler: impl Handler,
        middleware: Middleware,
    ) -> Self {
        let next = middleware.apply(Next::new(handler));
        self.add(method, path, next)
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::GET, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::POST, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::PUT, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::DELETE, path, handler)
    }

    fn add(mut self, method: Method, path: &str, next: Next) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, next)
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    /// Dispatches one buffered request through the middleware stack and the
    /// matching route, and renders the outcome.
    ///
    /// This is what the server calls per request. It is public so the whole
    /// application can be exercised in-process.
    pub async fn handle(&self, req: http::Request<Bytes>) -> Response {
        let (parts, body) = req.into_parts();
        let (endpoint, params) = self.resolve(&parts.method, parts.uri.path());
        let ctx = Context::from_parts(parts, body, params);

        match self.stack.apply(endpoint).run(ctx).await {
            Ok(res) => res,
            Err(e) => e.into_response(),
        }
    }

    fn resolve(&self, method: &Method, path: &str) -> (Next, HashMap<String, String>) {
        if let Some(found) = self.lookup(method, path) {
            return found;
        }
        let status = if self.allowed_elsewhere(method, path) {
            StatusCode::METHOD_NOT_ALLOWED
        } else {
            StatusCode::NOT_FOUND
        };
        (fallback(status), HashMap::new())
    }

    fn lookup(&self, method: &Method, path: &str) -> Option<(Next, HashMap<String, String>)> {
        let tree = self.routes.get(method)?;
        let matched = tree.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((matched.value.clone(), params))
    }

    fn allowed_elsewhere(&self, method: &Method, path: &str) -> bool {
        self.routes.iter()
            .any(|(m, tree)| m != method && tree.at(path).is_ok())
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

/// Terminal handler for requests that match no route.
fn fallback(status: StatusCode) -> Next {
    Next::new(move |_ctx: Context| async move {
        let message = status.canonical_reason().unwrap_or("unmatched request");
        Err::<Response, _>(Error::http(status, message.to_lowercase()))
    })
}
