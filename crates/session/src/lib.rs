//! Session and identity handling for the asset manager API
//!
//! Holds the current user identity and performs the one privileged call
//! that exchanges an expired session for a renewed one. This crate is a
//! standalone library with no dependency on the request path — it can be
//! tested and used independently.
//!
//! Session flow:
//! 1. A request fails with 401 somewhere in the client layer
//! 2. The refresh coordinator calls `refresh::refresh_session()` once
//! 3. On success the renewed identity is stored via `SessionStore::set_identity()`
//! 4. On failure the coordinator calls `SessionStore::clear()` and the user
//!    is sent back to sign-in

pub mod error;
pub mod identity;
pub mod refresh;
pub mod store;

pub use error::{Error, Result};
pub use identity::{ApiEnvelope, UserProfile};
pub use refresh::refresh_session;
pub use store::{IdentitySink, SessionStore};
