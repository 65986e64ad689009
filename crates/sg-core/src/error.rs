//! Unified error type for snapgrid.
//!
//! All crates funnel their failures into [`Error`], which carries enough context
//! for API handlers to derive an HTTP status code via [`Error::http_status`].

/// Unified error type covering all failure modes in snapgrid.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The media host was unreachable or returned a bad response.
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// The cache store is not available for an operation that requires it.
    #[error("Cache not available")]
    CacheUnavailable,

    /// A cache store operation failed.
    #[error("Cache error: {0}")]
    Cache(String),

    /// A snapshot could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration or input failed validation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// An I/O operation failed.
    #[error("IO error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Catch-all for unexpected internal errors.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Map this error to an appropriate HTTP status code.
    pub fn http_status(&self) -> u16 {
        match self {
            Error::Upstream(_) => 500,
            Error::CacheUnavailable => 400,
            Error::Cache(_) => 500,
            Error::Serialization(_) => 500,
            Error::Validation(_) => 400,
            Error::Io { .. } => 500,
            Error::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code for API error bodies.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Upstream(_) => "upstream_error",
            Error::CacheUnavailable => "cache_unavailable",
            Error::Cache(_) => "cache_error",
            Error::Serialization(_) => "serialization_error",
            Error::Validation(_) => "validation_error",
            Error::Io { .. } => "io_error",
            Error::Internal(_) => "internal_error",
        }
    }

    /// Convenience constructor for [`Error::Upstream`].
    pub fn upstream(msg: impl Into<String>) -> Self {
        Error::Upstream(msg.into())
    }

    /// Convenience constructor for [`Error::Cache`].
    pub fn cache(msg: impl Into<String>) -> Self {
        Error::Cache(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_display() {
        let err = Error::upstream("connection refused");
        assert_eq!(err.to_string(), "Upstream error: connection refused");
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.code(), "upstream_error");
    }

    #[test]
    fn cache_unavailable_is_bad_request() {
        let err = Error::CacheUnavailable;
        assert_eq!(err.to_string(), "Cache not available");
        assert_eq!(err.http_status(), 400);
        assert_eq!(err.code(), "cache_unavailable");
    }

    #[test]
    fn cache_display() {
        let err = Error::cache("timed out");
        assert_eq!(err.to_string(), "Cache error: timed out");
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn validation_display() {
        let err = Error::Validation("port is required".into());
        assert_eq!(err.to_string(), "Validation error: port is required");
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn io_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err = Error::from(io_err);
        assert!(matches!(err, Error::Io { .. }));
        assert_eq!(err.http_status(), 500);
    }

    #[test]
    fn serde_json_error_converts() {
        let parse_err = serde_json::from_str::<Vec<u32>>("not json").unwrap_err();
        let err = Error::from(parse_err);
        assert!(matches!(err, Error::Serialization(_)));
        assert_eq!(err.code(), "serialization_error");
    }

    #[test]
    fn internal_display() {
        let err = Error::Internal("unexpected state".into());
        assert_eq!(err.to_string(), "Internal error: unexpected state");
        assert_eq!(err.http_status(), 500);
    }
}
