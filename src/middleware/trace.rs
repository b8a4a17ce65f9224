//! Request tracing middleware.

use std::time::Instant;

use tracing::Instrument;

use super::{Middleware, from_fn};
use crate::context::Context;
use crate::handler::Next;

/// One `request` span per request, carrying method and path.
///
/// On completion logs the status and latency at `info`; a failed outcome is
/// logged at `warn`. The outcome itself is returned exactly as received.
pub fn trace() -> Middleware {
    from_fn(|ctx: Context, next: Next| async move {
        let span = tracing::info_span!("request", method = %ctx.method(), path = %ctx.path());
        let start = Instant::now();

        let outcome = next.run(ctx).instrument(span.clone()).await;

        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
        span.in_scope(|| match &outcome {
            Ok(res) => tracing::info!(status = res.status_code().as_u16(), latency_ms, "request completed"),
            Err(e) => tracing::warn!(status = e.status().as_u16(), latency_ms, error = %e, "request failed"),
        });
        outcome
    })
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use http::StatusCode;

    use super::*;
    use crate::{Error, Response};

    fn ctx() -> Context {
        let req = http::Request::builder()
            .method(http::Method::DELETE)
            .uri("/users/7")
            .body(Bytes::new())
            .unwrap();
        Context::new(req)
    }

    fn init_tracing() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    }

    #[tokio::test]
    async fn passes_success_through() {
        init_tracing();
        let h = Next::new(|_ctx: Context| async { Ok::<_, Error>(StatusCode::NO_CONTENT) });
        let res = trace().apply(h).run(ctx()).await.unwrap();
        assert_eq!(res.status_code(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn passes_errors_through() {
        init_tracing();
        let h = Next::new(|_ctx: Context| async {
            Err::<Response, _>(Error::http(StatusCode::NOT_FOUND, "no such user"))
        });
        let err = trace().apply(h).run(ctx()).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "404 Not Found: no such user");
    }
}
