//! Minimal weave example: composed middleware around a few JSON endpoints.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl -X DELETE http://localhost:3000/users/42                  # 403
//!   curl -X DELETE -H 'x-role: admin' http://localhost:3000/users/42

use http::{Method, StatusCode};
use weave::middleware::{self, Middleware, compose};
use weave::{Context, Error, Next, Response, Router, Server};

#[derive(Clone)]
struct RequestId(String);

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt::init();

    let app = Router::new()
        .with(compose([middleware::trace(), request_id()]))
        .get("/users/{id}", get_user)
        .post("/users", create_user)
        .on_with(Method::DELETE, "/users/{id}", delete_user, require_admin());

    Server::bind("0.0.0.0:3000")?.serve(app).await
}

/// Tags every request and echoes the id back as a response header.
fn request_id() -> Middleware {
    middleware::from_fn(|mut ctx: Context, next: Next| async move {
        let id = ctx.header("x-request-id").unwrap_or("generated").to_owned();
        ctx.set(RequestId(id.clone()));
        next.run(ctx).await.map(|mut res| {
            if let Ok(value) = http::HeaderValue::from_str(&id) {
                res.headers_mut().insert("x-request-id", value);
            }
            res
        })
    })
}

fn require_admin() -> Middleware {
    middleware::from_fn(|ctx: Context, next: Next| async move {
        match ctx.header("x-role") {
            Some("admin") => next.run(ctx).await,
            _ => Err(Error::http(StatusCode::FORBIDDEN, "admins only")),
        }
    })
}

// GET /users/{id}
async fn get_user(ctx: Context) -> Result<Response, Error> {
    let id = ctx.param("id").unwrap_or("unknown");
    let request_id = ctx.get::<RequestId>().map_or("-", |r| r.0.as_str());
    Ok(Response::json(format!(r#"{{"id":"{id}","name":"alice","request":"{request_id}"}}"#)))
}

// POST /users
async fn create_user(ctx: Context) -> Result<Response, Error> {
    if ctx.body().is_empty() {
        return Err(Error::http(StatusCode::BAD_REQUEST, "empty body"));
    }
    Ok(Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(r#"{"id":"99","name":"new_user"}"#))
}

// DELETE /users/{id} → 204 No Content
async fn delete_user(_ctx: Context) -> Result<StatusCode, Error> {
    Ok(StatusCode::NO_CONTENT)
}
