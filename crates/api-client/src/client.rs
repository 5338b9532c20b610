//! Authenticated client
//!
//! Public entry point for the request path. Issues every call through the
//! transport; success and non-auth errors pass through untouched. A 401
//! on an un-retried attempt goes to the refresh coordinator, which either
//! green-lights one replay or declares the session void — in which case
//! the original 401 is returned and the teardown (clear + redirect) has
//! already happened inside the coordinator.

use std::sync::Arc;

use reqwest::Method;
use session::SessionStore;
use tracing::debug;

use crate::config::ClientConfig;
use crate::coordinator::{HttpRefresher, RefreshCoordinator, RefreshOutcome, SessionRefresher};
use crate::error::Result;
use crate::navigation::{Navigator, TracingNavigator};
use crate::transport::{HttpTransport, RequestAttempt, Transport, TransportResponse};

/// HTTP client with transparent single-flight session refresh.
///
/// One instance per signed-in surface. Cheap to share via `Arc`; all
/// methods take `&self`.
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    coordinator: RefreshCoordinator,
    session: Arc<SessionStore>,
}

impl ApiClient {
    /// Build a production client from config.
    ///
    /// The transport and the refresh invoker share one reqwest client so
    /// the refresh call rides on the same cookie jar and the same
    /// client-level timeout as every request.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config)?;
        let refresher = HttpRefresher::new(transport.client().clone(), config.base_url.clone());
        Ok(Self::with_parts(
            Arc::new(transport),
            Arc::new(refresher),
            Arc::new(SessionStore::new()),
            Arc::new(TracingNavigator),
            &config.signin_path,
        ))
    }

    /// Assemble a client from explicit collaborators (used by tests and by
    /// embedders that bring their own router or transport).
    pub fn with_parts(
        transport: Arc<dyn Transport>,
        refresher: Arc<dyn SessionRefresher>,
        session: Arc<SessionStore>,
        navigator: Arc<dyn Navigator>,
        signin_path: &str,
    ) -> Self {
        let coordinator =
            RefreshCoordinator::new(refresher, session.clone(), navigator, signin_path);
        Self {
            transport,
            coordinator,
            session,
        }
    }

    /// The session store backing this client.
    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub async fn get(&self, path: &str) -> Result<TransportResponse> {
        self.request(RequestAttempt::new(Method::GET, path)).await
    }

    pub async fn post(&self, path: &str, body: serde_json::Value) -> Result<TransportResponse> {
        self.request(RequestAttempt::new(Method::POST, path).with_body(body))
            .await
    }

    pub async fn put(&self, path: &str, body: serde_json::Value) -> Result<TransportResponse> {
        self.request(RequestAttempt::new(Method::PUT, path).with_body(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<TransportResponse> {
        self.request(RequestAttempt::new(Method::DELETE, path))
            .await
    }

    /// Issue an attempt, recovering from one transient session expiry.
    ///
    /// At most one refresh cycle and one replay happen per logical
    /// request; a replay that comes back 401 again is returned as-is.
    pub async fn request(&self, attempt: RequestAttempt) -> Result<TransportResponse> {
        let response = self.transport.send(&attempt).await?;

        if !response.is_unauthenticated() || attempt.retried() {
            return Ok(response);
        }

        match self.coordinator.ensure_fresh_session(&attempt).await {
            RefreshOutcome::Replay => {
                debug!(path = %attempt.path, "session renewed, replaying request");
                self.transport.send(&attempt.into_retried()).await
            }
            RefreshOutcome::Reauthenticate => Ok(response),
        }
    }
}
