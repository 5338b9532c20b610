//! Authenticated API client with single-flight session refresh
//!
//! Wraps an HTTP transport so that an expired session is renewed
//! transparently: the first request to fail with 401 triggers exactly one
//! refresh call, every other request failing meanwhile queues up as a
//! waiter, and once the refresh resolves all waiters replay their original
//! request exactly once. If the refresh itself fails, the session is
//! cleared and the user is redirected to sign-in.
//!
//! Request lifecycle:
//! 1. Caller issues a request through `ApiClient`
//! 2. Transport returns 401 → client asks `RefreshCoordinator` to ensure
//!    a fresh session
//! 3. Coordinator runs one refresh cycle (or parks the caller behind the
//!    cycle already in flight)
//! 4. `Replay` → the original request is reissued once; `Reauthenticate`
//!    → the original 401 is returned and the session is torn down

pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod navigation;
pub mod transport;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use coordinator::{HttpRefresher, RefreshCoordinator, RefreshOutcome, SessionRefresher};
pub use error::{Error, Result};
pub use navigation::{Navigator, TracingNavigator};
pub use transport::{HttpTransport, RequestAttempt, Transport, TransportResponse};
