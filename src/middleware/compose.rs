//! Middleware composition.

use std::sync::Arc;

use super::Middleware;

/// Composes `middlewares` into a single middleware.
///
/// The first element is the outermost: it runs first on the way in and last
/// on the way out. Applying the result to a handler `h` gives exactly
/// `m[0].apply(m[1].apply(… m[n-1].apply(h) …))`. An empty sequence yields a
/// middleware that returns `h` untouched.
///
/// Nothing is added to the chain. Errors, short-circuits and context changes
/// made by the elements flow through as if they had been nested by hand.
///
/// ```rust
/// use weave::middleware::{self, compose};
///
/// let stack = compose([middleware::trace(), middleware::Middleware::identity()]);
/// let empty = compose([]);
/// ```
pub fn compose<I>(middlewares: I) -> Middleware
where
    I: IntoIterator<Item = Middleware>,
{
    let chain: Arc<[Middleware]> = middlewares.into_iter().collect();
    tracing::debug!(len = chain.len(), "composing middleware");

    Middleware::new(move |next| {
        chain.iter().rev().fold(next, |inner, m| m.apply(inner))
    })
}
