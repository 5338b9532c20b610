//! Error types for session operations

/// Errors from session refresh operations.
///
/// `Rejected` and `Malformed` both mean the session cannot be renewed;
/// they stay distinct so logs show whether the server refused the refresh
/// or answered with something the client could not interpret.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("refresh rejected by server ({status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("malformed refresh response: {0}")]
    Malformed(String),
}

/// Result alias for session operations.
pub type Result<T> = std::result::Result<T, Error>;
