//! The per-request context passed down a handler chain.

use std::collections::HashMap;

use bytes::Bytes;
use http::{HeaderMap, Method, Uri, request::Parts};

/// Everything a handler knows about the request it is serving.
///
/// A `Context` is moved, not shared: each middleware receives it by value,
/// may change it, and hands it on to `next`. Values stored with
/// [`set`](Context::set) are visible to everything further down the chain.
///
/// ```rust
/// use bytes::Bytes;
/// use weave::Context;
///
/// #[derive(Clone)]
/// struct UserId(u64);
///
/// let mut ctx = Context::new(http::Request::new(Bytes::new()));
/// ctx.set(UserId(7));
/// assert_eq!(ctx.get::<UserId>().map(|u| u.0), Some(7));
/// ```
pub struct Context {
    parts: Parts,
    body: Bytes,
    params: HashMap<String, String>,
}

impl Context {
    /// Builds a context from an already-buffered request.
    ///
    /// The server does this for every incoming request; tests can do it to
    /// drive a [`Next`](crate::Next) directly.
    pub fn new(req: http::Request<Bytes>) -> Self {
        let (parts, body) = req.into_parts();
        Self { parts, body, params: HashMap::new() }
    }

    pub(crate) fn from_parts(parts: Parts, body: Bytes, params: HashMap<String, String>) -> Self {
        Self { parts, body, params }
    }

    pub fn method(&self) -> &Method { &self.parts.method }
    pub fn uri(&self) -> &Uri { &self.parts.uri }
    pub fn path(&self) -> &str { self.parts.uri.path() }
    pub fn headers(&self) -> &HeaderMap { &self.parts.headers }
    pub fn body(&self) -> &Bytes { &self.body }

    /// Header lookup. Names are case-insensitive; non-UTF-8 values read as `None`.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/users/{id}`, `ctx.param("id")` on `/users/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the request-scoped value of type `T`, if one was set.
    pub fn get<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.parts.extensions.get::<T>()
    }

    /// Mutable access to the request-scoped value of type `T`.
    pub fn get_mut<T: Send + Sync + 'static>(&mut self) -> Option<&mut T> {
        self.parts.extensions.get_mut::<T>()
    }

    /// Stores a request-scoped value, replacing (and returning) any previous
    /// value of the same type.
    pub fn set<T: Clone + Send + Sync + 'static>(&mut self, value: T) -> Option<T> {
        self.parts.extensions.insert(value)
    }

    /// Removes and returns the request-scoped value of type `T`.
    pub fn take<T: Send + Sync + 'static>(&mut self) -> Option<T> {
        self.parts.extensions.remove::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(uri: &str) -> http::Request<Bytes> {
        http::Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("X-Request-Id", "abc-123")
            .body(Bytes::from_static(b"payload"))
            .unwrap()
    }

    #[test]
    fn exposes_request_parts() {
        let ctx = Context::new(request("/orders/9?expand=items"));
        assert_eq!(ctx.method(), Method::POST);
        assert_eq!(ctx.path(), "/orders/9");
        assert_eq!(ctx.uri().query(), Some("expand=items"));
        assert_eq!(ctx.header("x-request-id"), Some("abc-123"));
        assert_eq!(ctx.body().as_ref(), b"payload");
        assert_eq!(ctx.param("id"), None);
    }

    #[test]
    fn values_are_typed_and_replaceable() {
        #[derive(Clone, Debug, PartialEq)]
        struct Tenant(&'static str);

        let mut ctx = Context::new(request("/"));
        assert!(ctx.get::<Tenant>().is_none());

        assert_eq!(ctx.set(Tenant("acme")), None);
        assert_eq!(ctx.set(Tenant("globex")), Some(Tenant("acme")));

        if let Some(t) = ctx.get_mut::<Tenant>() {
            t.0 = "initech";
        }
        assert_eq!(ctx.take::<Tenant>(), Some(Tenant("initech")));
        assert!(ctx.get::<Tenant>().is_none());
    }

    #[test]
    fn params_come_from_routing() {
        let (parts, body) = request("/users/42").into_parts();
        let params = HashMap::from([("id".to_owned(), "42".to_owned())]);
        let ctx = Context::from_parts(parts, body, params);
        assert_eq!(ctx.param("id"), Some("42"));
    }
}
