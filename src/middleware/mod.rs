//! Middleware layer.
//!
//! A [`Middleware`] is a function from one handler to another: it receives
//! the [`Next`] it wraps and returns a new `Next` that does something before
//! and/or after calling it. That is the whole abstraction; everything else
//! here is built from it.
//!
//! - [`from_fn`]: write a middleware as `async fn(Context, Next)`.
//! - [`compose`]: fold many middleware into one, first = outermost.
//! - [`trace`]: per-request span with method, path, status and latency.
//!
//! ```rust
//! use weave::middleware::{self, Middleware};
//! use weave::{Context, Error, Next};
//!
//! fn require_token() -> Middleware {
//!     middleware::from_fn(|ctx: Context, next: Next| async move {
//!         if ctx.header("authorization").is_none() {
//!             return Err(Error::http(http::StatusCode::UNAUTHORIZED, "missing token"));
//!         }
//!         next.run(ctx).await
//!     })
//! }
//!
//! let api = middleware::compose([middleware::trace(), require_token()]);
//! ```

use std::future::Future;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;
use crate::handler::Next;
use crate::response::Response;

mod compose;
mod trace;

pub use compose::compose;
pub use trace::trace;

/// A transformation from the next handler to a handler.
///
/// Cloning is cheap (`Arc`). A middleware holds no per-request state; it
/// closes over whatever it captured when it was built.
#[derive(Clone)]
pub struct Middleware(Arc<dyn Fn(Next) -> Next + Send + Sync + 'static>);

impl Middleware {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Next) -> Next + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// The middleware that returns its handler unchanged.
    pub fn identity() -> Self {
        Self::new(|next| next)
    }

    /// Wraps `next`, returning the handler this middleware produces.
    pub fn apply(&self, next: Next) -> Next {
        (self.0)(next)
    }
}

impl std::fmt::Debug for Middleware {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Middleware(..)")
    }
}

/// Builds a middleware from an `async fn(Context, Next)`.
///
/// The function decides whether and when to call `next.run(ctx)`. Returning
/// early (with a response or an error) short-circuits everything inside it.
pub fn from_fn<F, Fut>(f: F) -> Middleware
where
    F: Fn(Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response, Error>> + Send + 'static,
{
    let f = Arc::new(f);
    Middleware::new(move |next: Next| {
        let f = Arc::clone(&f);
        Next::new(move |ctx: Context| f(ctx, next.clone()))
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;

    fn ctx() -> Context {
        Context::new(http::Request::new(Bytes::new()))
    }

    async fn ok(_ctx: Context) -> Result<&'static str, Error> {
        Ok("ok")
    }

    #[tokio::test]
    async fn identity_is_transparent() {
        let res = Middleware::identity().apply(Next::new(ok)).run(ctx()).await.unwrap();
        assert_eq!(res.body().as_ref(), b"ok");
    }

    #[tokio::test]
    async fn from_fn_can_short_circuit() {
        let deny = from_fn(|_ctx: Context, _next: Next| async move {
            Err::<Response, _>(Error::http(StatusCode::FORBIDDEN, "denied"))
        });
        let err = deny.apply(Next::new(ok)).run(ctx()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn from_fn_can_rewrite_the_response() {
        let stamp = from_fn(|ctx: Context, next: Next| async move {
            next.run(ctx).await.map(|mut res| {
                res.headers_mut().insert("x-stamped", http::HeaderValue::from_static("yes"));
                res
            })
        });
        let res = stamp.apply(Next::new(ok)).run(ctx()).await.unwrap();
        assert_eq!(res.headers()["x-stamped"], "yes");
        assert_eq!(res.body().as_ref(), b"ok");
    }
}
