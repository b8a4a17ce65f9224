//! # weave
//!
//! A minimal async HTTP framework built around one idea: middleware is a
//! function from the next handler to a handler, and any number of them can
//! be folded into one with [`middleware::compose`].
//!
//! ## Handlers and middleware
//!
//! A handler is `async fn(Context) -> Result<impl IntoResponse, Error>`.
//! A [`Middleware`](middleware::Middleware) turns one [`Next`] into another.
//! `compose([a, b, c])` behaves exactly like `a` wrapping `b` wrapping `c`:
//! `a` runs first on the way in and last on the way out, and an `Err` from
//! any of them comes back to the caller untouched.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use http::StatusCode;
//! use weave::middleware::{self, compose};
//! use weave::{Context, Error, Next, Router, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     let admin = compose([middleware::trace(), require_admin()]);
//!
//!     let app = Router::new()
//!         .get("/users/{id}", get_user)
//!         .on_with(http::Method::DELETE, "/users/{id}", delete_user, admin);
//!
//!     Server::bind("0.0.0.0:3000")?.serve(app).await
//! }
//!
//! fn require_admin() -> middleware::Middleware {
//!     middleware::from_fn(|ctx: Context, next: Next| async move {
//!         match ctx.header("x-role") {
//!             Some("admin") => next.run(ctx).await,
//!             _ => Err(Error::http(StatusCode::FORBIDDEN, "admins only")),
//!         }
//!     })
//! }
//!
//! async fn get_user(ctx: Context) -> Result<String, Error> {
//!     Ok(format!(r#"{{"id":"{}"}}"#, ctx.param("id").unwrap_or("unknown")))
//! }
//!
//! async fn delete_user(_ctx: Context) -> Result<StatusCode, Error> {
//!     Ok(StatusCode::NO_CONTENT)
//! }
//! ```

mod context;
mod error;
mod handler;
mod response;
mod router;
mod server;

pub mod middleware;

pub use context::Context;
pub use error::Error;
pub use handler::{BoxFuture, Handler, Next};
pub use response::{IntoResponse, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
