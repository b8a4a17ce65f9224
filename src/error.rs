//! Unified error type.

use http::StatusCode;

/// The failure half of a handler outcome.
///
/// Handlers and middleware return `Err(Error)` to stop the chain. Nothing in
/// the chain rewrites it; [`Router::handle`](crate::Router::handle) is the
/// only place an `Error` is turned into a [`Response`](crate::Response).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A handler-signalled HTTP failure. Rendered with its own status.
    #[error("{status}: {message}")]
    Http { status: StatusCode, message: String },

    #[error("invalid socket address `{0}`")]
    InvalidAddress(String),

    #[error("failed to read request body: {0}")]
    Body(#[source] hyper::Error),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for [`Error::Http`].
    ///
    /// ```rust
    /// use weave::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::http(StatusCode::UNAUTHORIZED, "missing token");
    /// assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    /// ```
    pub fn http(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Http { status, message: message.into() }
    }

    /// The status this error is rendered with at the edge of the chain.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Http { status, .. } => *status,
            Self::Body(_) => StatusCode::BAD_REQUEST,
            Self::InvalidAddress(_) | Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_keeps_status_and_message() {
        let err = Error::http(StatusCode::FORBIDDEN, "nope");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "403 Forbidden: nope");
    }

    #[test]
    fn infrastructure_errors_map_to_500() {
        let err = Error::from(std::io::Error::other("boom"));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.to_string().starts_with("io: "));
    }
}
