//! Handler trait and type erasure.
//!
//! # How handlers are stored
//!
//! Routes, middleware and the composer all need to hold handlers of
//! *different* concrete types behind one type. That type is [`Next`]: an
//! `Arc` around a trait object, so cloning it is one atomic increment.
//!
//! ```text
//! async fn hello(ctx: Context) -> Result<&'static str, Error> { … }
//!        ↓ router.on(Method::GET, "/", hello)
//! hello.into_next()                           ← Handler blanket impl
//!        ↓
//! Next(Arc::new(FnHandler(hello)))            ← stored, shared, cloned
//!        ↓
//! next.run(ctx)  at request time              ← one virtual call
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;
use crate::response::{IntoResponse, Response};

/// A heap-allocated, type-erased handler outcome.
pub type BoxFuture = Pin<Box<dyn Future<Output = Result<Response, Error>> + Send + 'static>>;

trait ErasedHandler {
    fn call(&self, ctx: Context) -> BoxFuture;
}

// ── Next ──────────────────────────────────────────────────────────────────────

/// A type-erased handler: what a middleware wraps and calls onward.
///
/// Every route handler becomes a `Next` on registration, and every
/// middleware turns one `Next` into another. Invoking it with
/// [`run`](Next::run) yields the outcome of the whole chain below it.
#[derive(Clone)]
pub struct Next(Arc<dyn ErasedHandler + Send + Sync + 'static>);

impl Next {
    pub fn new(handler: impl Handler) -> Self {
        handler.into_next()
    }

    /// Invokes the handler. The returned future owns everything it needs.
    pub fn run(&self, ctx: Context) -> BoxFuture {
        self.0.call(ctx)
    }
}

impl std::fmt::Debug for Next {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Next(..)")
    }
}

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// Automatically satisfied for any function or closure of the shape:
///
/// ```text
/// async fn name(ctx: Context) -> Result<impl IntoResponse, Error>
/// ```
///
/// The trait is sealed: only the blanket impl below can satisfy it.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_next(self) -> Next;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Context) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn into_next(self) -> Next {
        Next(Arc::new(FnHandler(self)))
    }
}

struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Context) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R, Error>> + Send + 'static,
    R: IntoResponse + Send + 'static,
{
    fn call(&self, ctx: Context) -> BoxFuture {
        let fut = (self.0)(ctx);
        Box::pin(async move { fut.await.map(IntoResponse::into_response) })
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;

    fn ctx() -> Context {
        Context::new(http::Request::new(Bytes::new()))
    }

    async fn hello(_ctx: Context) -> Result<&'static str, Error> {
        Ok("hello")
    }

    async fn teapot(_ctx: Context) -> Result<Response, Error> {
        Err(Error::http(StatusCode::IM_A_TEAPOT, "short and stout"))
    }

    #[tokio::test]
    async fn async_fn_becomes_next() {
        let res = Next::new(hello).run(ctx()).await.unwrap();
        assert_eq!(res.body().as_ref(), b"hello");
    }

    #[tokio::test]
    async fn errors_come_back_untouched() {
        let err = Next::new(teapot).run(ctx()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::IM_A_TEAPOT);
        assert_eq!(err.to_string(), "418 I'm a teapot: short and stout");
    }

    #[tokio::test]
    async fn closures_capture_state() {
        let greeting = String::from("hi there");
        let next = Next::new(move |_ctx: Context| {
            let greeting = greeting.clone();
            async move { Ok::<_, Error>(greeting) }
        });
        let clone = next.clone();
        assert_eq!(next.run(ctx()).await.unwrap().body().as_ref(), b"hi there");
        assert_eq!(clone.run(ctx()).await.unwrap().body().as_ref(), b"hi there");
    }
}
