//! Identity payload and API envelope types
//!
//! The backend wraps every JSON body in `{success, message, data}`. The
//! refresh endpoint puts the renewed user profile in `data`; a `success`
//! flag without a usable `data` payload is treated as malformed rather
//! than silently producing an empty identity.

use serde::{Deserialize, Serialize};

/// The signed-in user as reported by the backend.
///
/// `joined_at` is the backend's RFC 3339 timestamp, kept as a string —
/// the client never does date arithmetic on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub fullname: String,
    pub email: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(rename = "joinedAt", default)]
    pub joined_at: String,
}

/// Standard response envelope used by every backend endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiEnvelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}
