//! Navigation seam
//!
//! The client layer needs exactly one navigation primitive: sending the
//! user to the sign-in surface when the session cannot be renewed. The
//! trait keeps the refresh coordinator decoupled from whatever drives the
//! actual UI routing; tests substitute a recording implementation.

use tracing::info;

/// Redirect primitive consumed by the refresh coordinator.
///
/// Invoked only on irrecoverable refresh failure.
pub trait Navigator: Send + Sync {
    fn redirect_to(&self, path: &str);
}

/// Navigator that records the intent in the log stream.
///
/// The embedding application observes the redirect through its own
/// routing layer; this implementation is the default for contexts where
/// no router is wired in.
#[derive(Debug, Default)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn redirect_to(&self, path: &str) {
        info!(%path, "redirecting for re-authentication");
    }
}
