//! Error types for the request path
//!
//! Only transport-level failures surface as Rust errors. HTTP error
//! statuses (including the 401s the coordinator could not recover from)
//! are returned as ordinary responses for the caller to inspect — the
//! client passes non-auth errors through untouched.

/// Errors from issuing a request.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out: {0}")]
    Timeout(String),
}

/// Result alias for request operations.
pub type Result<T> = std::result::Result<T, Error>;
